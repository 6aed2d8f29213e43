//! Scripted transport and callback recorders shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http_connect::prelude::*;
use http_connect::http::{InFlight, RequestDescriptor, TransferReporter};

/// How a scripted request plays out.
#[derive(Debug, Clone)]
pub enum Script {
    Succeed { code: i64, body: &'static [u8] },
    Fail {
        result: RequestResult,
        code: i64,
        body: &'static [u8],
        error: &'static str,
    },
    /// Never reaches a terminal state.
    Hang,
    /// Report each progress value, one every `step`, then play out `then`.
    Progress {
        steps: Vec<f32>,
        step: Duration,
        then: Box<Script>,
    },
}

impl Script {
    pub fn ok(body: &'static str) -> Self {
        Script::Succeed {
            code: 200,
            body: body.as_bytes(),
        }
    }

    pub fn status(code: i64, body: &'static str) -> Self {
        Script::Fail {
            result: RequestResult::ProtocolError,
            code,
            body: body.as_bytes(),
            error: "protocol error",
        }
    }
}

/// Plays out a [`Script`] for every request and records what was sent.
#[derive(Clone)]
pub struct ScriptedTransport {
    script: Script,
    pub sent: Arc<Mutex<Vec<RequestDescriptor>>>,
    /// Reporters of hanging requests, kept alive so they never abort.
    parked: Arc<Mutex<Vec<TransferReporter>>>,
}

impl ScriptedTransport {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            sent: Arc::new(Mutex::new(Vec::new())),
            parked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sent(&self) -> Vec<RequestDescriptor> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: RequestDescriptor) -> InFlight {
        self.sent.lock().unwrap().push(request);
        let (reporter, in_flight) = InFlight::channel();
        match &self.script {
            Script::Hang => self.parked.lock().unwrap().push(reporter),
            Script::Progress { .. } => {
                let script = self.script.clone();
                tokio::spawn(async move { play(script, reporter).await });
            }
            terminal => finish(terminal, &reporter),
        }
        in_flight
    }
}

async fn play(script: Script, reporter: TransferReporter) {
    let mut script = script;
    while let Script::Progress { steps, step, then } = script {
        for progress in steps {
            reporter.progress(progress);
            tokio::time::sleep(step).await;
        }
        script = *then;
    }
    match script {
        // Hang after progress: keep the reporter alive forever.
        Script::Hang => std::future::pending::<()>().await,
        terminal => finish(&terminal, &reporter),
    }
}

fn finish(script: &Script, reporter: &TransferReporter) {
    match script {
        Script::Succeed { code, body } => reporter.succeed(*code, Bytes::from_static(body)),
        Script::Fail {
            result,
            code,
            body,
            error,
        } => reporter.fail(*result, *code, Bytes::from_static(body), *error),
        Script::Hang | Script::Progress { .. } => unreachable!("not a terminal script"),
    }
}

pub fn connect_with(script: Script) -> (HttpConnect, ScriptedTransport) {
    let transport = ScriptedTransport::new(script);
    let connect = HttpConnect::builder()
        .poll_interval(Duration::from_millis(1))
        .transport(transport.clone())
        .build()
        .unwrap();
    (connect, transport)
}

/// Everything the callbacks of one request observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<T> {
    Complete(T),
    Error(HttpErrorResponse),
    Progress(f32),
}

pub type Events<T> = Arc<Mutex<Vec<Event<T>>>>;

pub fn recorded<T: ResponseBody>() -> (Callbacks<T>, Events<T>) {
    let events: Events<T> = Arc::new(Mutex::new(Vec::new()));
    let on_complete = events.clone();
    let on_error = events.clone();
    let callbacks = Callbacks::on_complete(move |body| {
        on_complete.lock().unwrap().push(Event::Complete(body))
    })
    .on_error(move |err| on_error.lock().unwrap().push(Event::Error(err)));
    (callbacks, events)
}

pub fn recorded_download() -> (DownloadCallbacks, Events<Bytes>) {
    let events: Events<Bytes> = Arc::new(Mutex::new(Vec::new()));
    let on_complete = events.clone();
    let on_error = events.clone();
    let on_progress = events.clone();
    let callbacks = DownloadCallbacks::on_download_complete(move |body| {
        on_complete.lock().unwrap().push(Event::Complete(body))
    })
    .on_error(move |err| on_error.lock().unwrap().push(Event::Error(err)))
    .on_downloading(move |progress| on_progress.lock().unwrap().push(Event::Progress(progress)));
    (callbacks, events)
}

/// Terminal events (completion or error) only.
pub fn terminal<T: Clone>(events: &Events<T>) -> Vec<Event<T>> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| !matches!(e, Event::Progress(_)))
        .cloned()
        .collect()
}

pub fn progress_values<T>(events: &Events<T>) -> Vec<f32> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            Event::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}
