//! HTTP layer: request descriptors, transfer state and transports.

pub mod request;
pub mod transfer;
pub mod transport;

pub use request::{RequestDescriptor, RequestMethod, JSON_CONTENT_TYPE};
pub use transfer::{InFlight, RequestResult, TransferReporter, TransferState};
pub use transport::Transport;
#[cfg(feature = "http")]
pub use transport::ReqwestTransport;
