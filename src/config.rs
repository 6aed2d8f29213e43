//! Serializable client configuration, for hosts that keep settings in JSON.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HttpError;

/// Default delay between progress polls on the download paths (about one frame).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 16;

/// Settings consumed by [`HttpConnectBuilder::from_config`](crate::client::HttpConnectBuilder::from_config).
///
/// ```json
/// { "timeout_secs": 30, "poll_interval_ms": 16, "headers": { "X-Game": "demo" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Transport timeout. `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
    pub poll_interval_ms: u64,
    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            headers: BTreeMap::new(),
        }
    }
}

impl ConnectConfig {
    pub fn from_json(json: &str) -> Result<Self, HttpError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
