//! Host execution contexts that can run helper tasks.

use std::future::Future;

/// Something that can drive a helper task to completion in the background.
///
/// Starting a task detaches it; its callbacks are the only output.
///
/// Tasks must be `Send` even on single-threaded hosts: helper futures own
/// their callbacks, and every callback is `Send`.
pub trait Host {
    fn start<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Runs tasks on a (possibly multi-threaded) tokio runtime.
impl Host for tokio::runtime::Handle {
    fn start<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn(task);
    }
}

/// Runs tasks cooperatively on the thread driving the `LocalSet`.
///
/// The `Send` bound is inherited from [`Host`]; it does not move the task off
/// that thread, so callbacks fire where the `LocalSet` is polled.
impl Host for tokio::task::LocalSet {
    fn start<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn_local(task);
    }
}
