//! Error types: the failure value handed to error callbacks, and
//! construction-time errors from the builder and config layers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common response codes, for comparisons against [`HttpErrorResponse::code`].
pub mod codes {
    pub const OK: i64 = 200;
    pub const INTERNAL_SERVER_ERROR: i64 = 500;
    pub const BAD_GATEWAY: i64 = 502;
    pub const SERVER_UNAVAILABLE: i64 = 503;
    pub const GATEWAY_TIMEOUT: i64 = 504;
}

/// Failure information for a single request.
///
/// `code` is the HTTP status of the response, or `0` when no response was
/// received (connection refused, DNS failure, aborted transfer). `text` is the
/// response body decoded as UTF-8 and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("request failed with code {code}: {text}")]
pub struct HttpErrorResponse {
    code: i64,
    text: String,
}

impl HttpErrorResponse {
    pub fn new(code: i64, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    /// The response code reported by the transport.
    pub fn code(&self) -> i64 {
        self.code
    }

    /// The JSON or text body returned with the failure.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Errors raised while building a client, never while running a request.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("No transport configured (enable the `http` feature or supply one)")]
    NoTransport,
}
