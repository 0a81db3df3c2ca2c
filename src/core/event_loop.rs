//! # Event loop: the supervisor's single blocking wait point.
//!
//! [`EventLoop::run`] parks the supervisor until [`quit`](EventLoop::quit) is
//! called from elsewhere — by the signal bridge on a termination signal, or
//! by the supervisor's own teardown path. It provides no scheduling: all
//! concurrency between subsystems lives inside the subsystems themselves.
//!
//! Built on [`CancellationToken`], which makes `quit` naturally idempotent:
//! calling it before `run`, after `run`, or many times over has no
//! additional effect.

use tokio_util::sync::CancellationToken;

/// Cloneable handle that can end the loop from another task.
#[derive(Clone, Debug)]
pub struct LoopHandle {
    quit: CancellationToken,
}

impl LoopHandle {
    /// Requests an orderly exit from the loop. Idempotent.
    pub fn quit(&self) {
        self.quit.cancel();
    }

    /// Returns true once a quit has been requested.
    pub fn is_quit(&self) -> bool {
        self.quit.is_cancelled()
    }
}

/// Blocking wait point owned by the supervisor.
#[derive(Debug, Default)]
pub struct EventLoop {
    quit: CancellationToken,
}

impl EventLoop {
    /// Creates a fresh, not-yet-quit loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle for requesting an exit from elsewhere.
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            quit: self.quit.clone(),
        }
    }

    /// Blocks until `quit` is called. Returns immediately if it already was.
    pub async fn run(&self) {
        self.quit.cancelled().await;
    }

    /// Ends the loop. Idempotent.
    pub fn quit(&self) {
        self.quit.cancel();
    }
}
