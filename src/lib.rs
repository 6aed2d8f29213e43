//! # http-connect
//!
//! Task-driven HTTP request helpers: GET/POST/PUT/DELETE with optional token
//! auth, JSON upload, text or byte responses and download progress, each
//! reporting through a completion callback or an error callback.
//!
//! ## Architecture
//!
//! 1. **HTTP**: `RequestDescriptor`, transfer state (`InFlight` /
//!    `TransferReporter`) and the `Transport` seam with a reqwest implementation
//! 2. **Helper**: `HttpConnect`, one future per operation
//! 3. **Host**: `Host` contexts that start helper futures in the background
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use http_connect::prelude::*;
//!
//! let connect = HttpConnect::new()?;
//! let handle = tokio::runtime::Handle::current();
//!
//! handle.start(connect.request(
//!     "Login",
//!     "https://api.example.com/login",
//!     RequestMethod::Post,
//!     r#"{"user":"ada"}"#,
//!     Callbacks::on_complete(|body: String| println!("{body}"))
//!         .on_error(|err| eprintln!("{} {}", err.code(), err.text())),
//! ));
//! ```

/// Error types.
pub mod error;

/// Serializable client configuration.
pub mod config;

/// Request descriptors, transfer state and transports.
pub mod http;

/// Callback records.
pub mod callbacks;

/// `HttpConnect`: the primary entry point.
pub mod client;

/// Host execution contexts.
pub mod host;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    pub use crate::callbacks::{Callbacks, DownloadCallbacks, ResponseBody};
    pub use crate::client::{HttpConnect, HttpConnectBuilder};
    pub use crate::config::ConnectConfig;
    pub use crate::error::{codes, HttpError, HttpErrorResponse};
    pub use crate::host::Host;
    pub use crate::http::{RequestMethod, RequestResult, Transport};
    #[cfg(feature = "http")]
    pub use crate::http::ReqwestTransport;
}
