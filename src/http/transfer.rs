//! Transfer state shared between a transport and the helper awaiting it.
//!
//! A transport owns a [`TransferReporter`] and pushes state changes into it;
//! the helper holds the matching [`InFlight`] and either awaits the terminal
//! state or samples it once per poll tick.

use bytes::Bytes;
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// Outcome of a request as seen by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestResult {
    #[default]
    InProgress,
    Success,
    /// No usable response: connect failure, DNS failure, interrupted transfer, abort.
    ConnectionError,
    /// The server answered with an error status.
    ProtocolError,
    /// The response arrived but could not be processed.
    DataProcessingError,
}

impl RequestResult {
    /// A request failed iff it is neither successful nor still running.
    pub fn is_error(&self) -> bool {
        !matches!(self, RequestResult::Success | RequestResult::InProgress)
    }

    pub fn is_done(&self) -> bool {
        !matches!(self, RequestResult::InProgress)
    }
}

/// Snapshot of a request's progress and, once terminal, its response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferState {
    pub result: RequestResult,
    /// Download progress in `[0, 1]`.
    pub progress: f32,
    /// HTTP status, `0` until a response arrives.
    pub response_code: i64,
    pub body: Bytes,
    /// Transport error detail for failed requests.
    pub error: Option<String>,
}

impl TransferState {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Receiving side of a transfer.
///
/// Dropping it aborts the transport task registered with
/// [`InFlight::abort_on_drop`], so dropping a helper future cancels its request.
#[derive(Debug)]
pub struct InFlight {
    state: watch::Receiver<TransferState>,
    abort: Option<AbortHandle>,
}

impl InFlight {
    /// Create a connected reporter / in-flight pair in the `InProgress` state.
    pub fn channel() -> (TransferReporter, InFlight) {
        let (tx, rx) = watch::channel(TransferState::default());
        (
            TransferReporter { state: tx },
            InFlight {
                state: rx,
                abort: None,
            },
        )
    }

    pub fn abort_on_drop(mut self, handle: AbortHandle) -> Self {
        self.abort = Some(handle);
        self
    }

    pub fn state(&self) -> TransferState {
        self.state.borrow().clone()
    }

    pub fn result(&self) -> RequestResult {
        self.state.borrow().result
    }

    pub fn progress(&self) -> f32 {
        self.state.borrow().progress
    }

    /// Wait until the transfer reaches a terminal state.
    ///
    /// Never resolves while the transfer stays `InProgress`.
    pub async fn finished(&mut self) -> TransferState {
        let finished = self
            .state
            .wait_for(|state| state.result.is_done())
            .await
            .map(|state| TransferState::clone(&state));
        match finished {
            Ok(state) => state,
            // Sender gone; the reporter always leaves a terminal state behind.
            Err(_) => self.state.borrow().clone(),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(handle) = self.abort.take() {
            handle.abort();
        }
    }
}

/// Sending side of a transfer, owned by the transport.
///
/// Only the first terminal report counts. Dropping a reporter before a
/// terminal report marks the request as an aborted `ConnectionError`.
#[derive(Debug)]
pub struct TransferReporter {
    state: watch::Sender<TransferState>,
}

impl TransferReporter {
    /// Report download progress; clamped to `[0, 1]`, NaN reads as `0`.
    pub fn progress(&self, fraction: f32) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.state.send_if_modified(|state| {
            if state.result.is_done() || state.progress == fraction {
                return false;
            }
            state.progress = fraction;
            true
        });
    }

    pub fn succeed(&self, response_code: i64, body: Bytes) {
        self.finish(TransferState {
            result: RequestResult::Success,
            progress: 1.0,
            response_code,
            body,
            error: None,
        });
    }

    /// Report a terminal failure. `result` should be one of the error results;
    /// passing `Success` or `InProgress` is treated as `ConnectionError`.
    pub fn fail(
        &self,
        result: RequestResult,
        response_code: i64,
        body: Bytes,
        error: impl Into<String>,
    ) {
        let result = if result.is_error() {
            result
        } else {
            RequestResult::ConnectionError
        };
        let progress = self.state.borrow().progress;
        self.finish(TransferState {
            result,
            progress,
            response_code,
            body,
            error: Some(error.into()),
        });
    }

    fn finish(&self, terminal: TransferState) {
        self.state.send_if_modified(|state| {
            if state.result.is_done() {
                return false;
            }
            *state = terminal;
            true
        });
    }
}

impl Drop for TransferReporter {
    fn drop(&mut self) {
        let (code, body) = {
            let state = self.state.borrow();
            (state.response_code, state.body.clone())
        };
        self.fail(RequestResult::ConnectionError, code, body, "request aborted");
    }
}
