//! Callback records passed to every helper operation.

use bytes::Bytes;

use crate::error::HttpErrorResponse;

pub type CompleteHandler<T> = Box<dyn FnOnce(T) + Send>;
pub type ErrorHandler = Box<dyn FnOnce(HttpErrorResponse) + Send>;
pub type ProgressHandler = Box<dyn FnMut(f32) + Send>;

/// How a successful response body is handed to the completion callback.
///
/// `String` receives the body as (lossy) UTF-8 text; `Vec<u8>` and `Bytes`
/// receive the raw bytes.
pub trait ResponseBody: Sized + Send + 'static {
    fn from_body(body: Bytes) -> Self;

    /// Text to log on receipt, if this representation is textual.
    fn log_text(&self) -> Option<&str> {
        None
    }
}

impl ResponseBody for String {
    fn from_body(body: Bytes) -> Self {
        String::from_utf8_lossy(&body).into_owned()
    }

    fn log_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl ResponseBody for Vec<u8> {
    fn from_body(body: Bytes) -> Self {
        body.to_vec()
    }
}

impl ResponseBody for Bytes {
    fn from_body(body: Bytes) -> Self {
        body
    }
}

/// Completion and optional error handler for the single-step operations.
pub struct Callbacks<T> {
    pub(crate) on_complete: CompleteHandler<T>,
    pub(crate) on_error: Option<ErrorHandler>,
}

impl<T: ResponseBody> Callbacks<T> {
    pub fn on_complete(f: impl FnOnce(T) + Send + 'static) -> Self {
        Self {
            on_complete: Box::new(f),
            on_error: None,
        }
    }

    pub fn on_error(mut self, f: impl FnOnce(HttpErrorResponse) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

/// Handlers for the polling download operations.
pub struct DownloadCallbacks {
    pub(crate) on_download_complete: CompleteHandler<Bytes>,
    pub(crate) on_error: Option<ErrorHandler>,
    pub(crate) on_downloading: Option<ProgressHandler>,
}

impl DownloadCallbacks {
    pub fn on_download_complete(f: impl FnOnce(Bytes) + Send + 'static) -> Self {
        Self {
            on_download_complete: Box::new(f),
            on_error: None,
            on_downloading: None,
        }
    }

    pub fn on_error(mut self, f: impl FnOnce(HttpErrorResponse) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Called once per poll tick with the current progress in `[0, 1]`.
    pub fn on_downloading(mut self, f: impl FnMut(f32) + Send + 'static) -> Self {
        self.on_downloading = Some(Box::new(f));
        self
    }
}
