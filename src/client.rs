//! `HttpConnect`, the request helper, and its builder.
//!
//! Every operation returns a `Send + 'static` future. Nothing happens until it
//! is awaited or started on a [`Host`](crate::host::Host); once running it
//! invokes exactly one of its completion / error callbacks when the request
//! reaches a terminal state.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::callbacks::{Callbacks, DownloadCallbacks, ErrorHandler, ResponseBody};
use crate::config::{ConnectConfig, DEFAULT_POLL_INTERVAL_MS};
use crate::error::{HttpError, HttpErrorResponse};
use crate::http::request::{RequestDescriptor, RequestMethod};
use crate::http::transfer::{RequestResult, TransferState};
use crate::http::transport::Transport;

/// Stateless request helper. Clones share the same transport.
#[derive(Clone)]
pub struct HttpConnect {
    transport: Arc<dyn Transport>,
    /// Added to every request descriptor, after the built-in headers.
    default_headers: Arc<[(String, String)]>,
    poll_interval: Duration,
}

impl fmt::Debug for HttpConnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConnect")
            .field("default_headers", &self.default_headers)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl HttpConnect {
    /// Helper over the default reqwest transport.
    #[cfg(feature = "http")]
    pub fn new() -> Result<Self, HttpError> {
        Self::builder().build()
    }

    pub fn builder() -> HttpConnectBuilder {
        HttpConnectBuilder::default()
    }

    /// Helper over a caller-supplied transport with default settings.
    pub fn with_transport(transport: impl Transport) -> Self {
        Self {
            transport: Arc::new(transport),
            default_headers: Arc::from(Vec::new()),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    // ── JSON payload ─────────────────────────────────────────────────────

    /// Send `json` with `method` and hand the response body to `on_complete`.
    pub fn request<T: ResponseBody>(
        &self,
        name: impl Into<String>,
        url: impl Into<String>,
        method: RequestMethod,
        json: impl Into<String>,
        callbacks: Callbacks<T>,
    ) -> impl Future<Output = ()> + Send + 'static {
        let request = RequestDescriptor::new(url, method).json(json);
        self.clone().exchange(name.into(), request, callbacks)
    }

    /// Like [`request`](Self::request), with `Authorization: Token <token>`.
    pub fn request_auth<T: ResponseBody>(
        &self,
        name: impl Into<String>,
        url: impl Into<String>,
        method: RequestMethod,
        json: impl Into<String>,
        token: impl Into<String>,
        callbacks: Callbacks<T>,
    ) -> impl Future<Output = ()> + Send + 'static {
        let request = RequestDescriptor::new(url, method)
            .json(json)
            .auth_token(token);
        self.clone().exchange(name.into(), request, callbacks)
    }

    /// Send `json` and poll the transfer, reporting progress every tick.
    pub fn request_download(
        &self,
        name: impl Into<String>,
        url: impl Into<String>,
        method: RequestMethod,
        json: impl Into<String>,
        callbacks: DownloadCallbacks,
    ) -> impl Future<Output = ()> + Send + 'static {
        let request = RequestDescriptor::new(url, method).json(json);
        self.clone().download(name.into(), request, callbacks)
    }

    // ── No payload ───────────────────────────────────────────────────────

    pub fn get<T: ResponseBody>(
        &self,
        name: impl Into<String>,
        url: impl Into<String>,
        callbacks: Callbacks<T>,
    ) -> impl Future<Output = ()> + Send + 'static {
        let request = RequestDescriptor::new(url, RequestMethod::Get);
        self.clone().exchange(name.into(), request, callbacks)
    }

    pub fn get_auth<T: ResponseBody>(
        &self,
        name: impl Into<String>,
        url: impl Into<String>,
        token: impl Into<String>,
        callbacks: Callbacks<T>,
    ) -> impl Future<Output = ()> + Send + 'static {
        let request = RequestDescriptor::new(url, RequestMethod::Get).auth_token(token);
        self.clone().exchange(name.into(), request, callbacks)
    }

    pub fn get_download(
        &self,
        name: impl Into<String>,
        url: impl Into<String>,
        callbacks: DownloadCallbacks,
    ) -> impl Future<Output = ()> + Send + 'static {
        let request = RequestDescriptor::new(url, RequestMethod::Get);
        self.clone().download(name.into(), request, callbacks)
    }

    // ── Internal tasks ───────────────────────────────────────────────────

    fn with_default_headers(&self, request: RequestDescriptor) -> RequestDescriptor {
        self.default_headers
            .iter()
            .fold(request, |request, (name, value)| {
                request.header(name.as_str(), value.as_str())
            })
    }

    async fn exchange<T: ResponseBody>(
        self,
        name: String,
        request: RequestDescriptor,
        callbacks: Callbacks<T>,
    ) {
        let request = self.with_default_headers(request);
        log_start(&name, &request);

        let mut in_flight = self.transport.send(request);
        let state = in_flight.finished().await;

        if state.result.is_error() {
            report_failure(&name, state, callbacks.on_error);
            return;
        }

        let body = T::from_body(state.body);
        match body.log_text() {
            Some(text) => tracing::info!(request = %name, response = %text, "response received"),
            None => tracing::info!(request = %name, "data received"),
        }
        (callbacks.on_complete)(body);
    }

    async fn download(self, name: String, request: RequestDescriptor, callbacks: DownloadCallbacks) {
        let DownloadCallbacks {
            on_download_complete,
            on_error,
            mut on_downloading,
        } = callbacks;

        let request = self.with_default_headers(request);
        log_start(&name, &request);

        let in_flight = self.transport.send(request);
        while in_flight.result() == RequestResult::InProgress {
            let progress = in_flight.progress();
            tracing::debug!(request = %name, progress, "download progress");
            if let Some(on_downloading) = on_downloading.as_mut() {
                on_downloading(progress);
            }
            futures_timer::Delay::new(self.poll_interval).await;
        }

        let state = in_flight.state();
        if state.result.is_error() {
            report_failure(&name, state, on_error);
            return;
        }

        tracing::info!(request = %name, bytes = state.body.len(), "download complete");
        on_download_complete(state.body);
    }
}

fn log_start(name: &str, request: &RequestDescriptor) {
    match request.body_text() {
        Some(json) => tracing::info!(
            request = %name,
            method = %request.method(),
            url = %request.url(),
            json = %json,
            "http request"
        ),
        None => tracing::info!(
            request = %name,
            method = %request.method(),
            url = %request.url(),
            "http request"
        ),
    }
}

fn report_failure(name: &str, state: TransferState, on_error: Option<ErrorHandler>) {
    tracing::error!(
        request = %name,
        code = state.response_code,
        error = state.error.as_deref().unwrap_or("unknown error"),
        "request failed"
    );

    let text = state.text();
    if !text.is_empty() {
        tracing::info!(request = %name, response = %text, "error response");
    }

    if let Some(on_error) = on_error {
        on_error(HttpErrorResponse::new(state.response_code, text));
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct HttpConnectBuilder {
    timeout: Option<Duration>,
    default_headers: Vec<(String, String)>,
    poll_interval: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for HttpConnectBuilder {
    fn default() -> Self {
        Self {
            timeout: None,
            default_headers: Vec::new(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            transport: None,
        }
    }
}

impl HttpConnectBuilder {
    pub fn from_config(config: &ConnectConfig) -> Self {
        let mut builder = Self::default().poll_interval(config.poll_interval());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        for (name, value) in &config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    /// Transport timeout. Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Header sent with every request, whichever transport carries it.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Delay between progress polls on the download paths.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<HttpConnect, HttpError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(self.timeout, &self.default_headers)?,
        };
        Ok(HttpConnect {
            transport,
            default_headers: self.default_headers.into(),
            poll_interval: self.poll_interval,
        })
    }
}

#[cfg(feature = "http")]
fn default_transport(
    timeout: Option<Duration>,
    headers: &[(String, String)],
) -> Result<Arc<dyn Transport>, HttpError> {
    // Headers travel on each descriptor; only validate them here.
    for (name, value) in headers {
        crate::http::transport::parse_header(name, value)?;
    }
    let transport = crate::http::transport::ReqwestTransport::new(timeout, &[])?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "http"))]
fn default_transport(
    _timeout: Option<Duration>,
    _headers: &[(String, String)],
) -> Result<Arc<dyn Transport>, HttpError> {
    Err(HttpError::NoTransport)
}
