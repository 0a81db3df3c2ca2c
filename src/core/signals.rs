//! # Signal bridge: OS signals → diagnostic dumps and orderly exit.
//!
//! [`SignalBridge::install`] registers the signal streams and spawns one
//! listener task for the process lifetime. The listener does no real work
//! itself: it only triggers the diagnostic monitor or cancels the event
//! loop, so there is nothing reentrancy-hazardous running in signal context.
//! The teardown work happens in the supervisor once the event loop returns.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGUSR1` → diagnostic state dump
//! - `SIGTERM` / `SIGINT` / Ctrl-C → orderly quit of the event loop
//!
//! **Windows platforms:**
//! - Ctrl-C → orderly quit (no diagnostic signal available)
//!
//! Once installed the handlers stay armed until process exit; repeated
//! termination signals are harmless because `quit` is idempotent.

use tracing::{debug, info};

use crate::core::event_loop::LoopHandle;
use crate::core::monitor::DiagnosticHandle;

/// Installer for the process-wide signal handlers.
pub struct SignalBridge;

impl SignalBridge {
    /// Registers signal streams and spawns the listener task.
    ///
    /// Must be called before the first subsystem starts. Returns `Err` only
    /// if the OS refuses the registration.
    #[cfg(unix)]
    pub fn install(diag: DiagnosticHandle, event_loop: LoopHandle) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut usr1 = signal(SignalKind::user_defined1())?;
        let mut term = signal(SignalKind::terminate())?;
        let mut int = signal(SignalKind::interrupt())?;

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = usr1.recv() => {
                        debug!("diagnostic signal received");
                        diag.trigger();
                    }
                    _ = term.recv() => {
                        info!("termination signal received, requesting orderly exit");
                        event_loop.quit();
                    }
                    _ = int.recv() => {
                        info!("interrupt received, requesting orderly exit");
                        event_loop.quit();
                    }
                }
            }
        });
        Ok(())
    }

    /// Registers signal streams and spawns the listener task.
    ///
    /// Non-Unix platforms only get Ctrl-C; there is no diagnostic signal to
    /// bridge, so the handle goes unused here. Embedders can still trigger
    /// dumps through their own copy of the [`DiagnosticHandle`].
    #[cfg(not(unix))]
    pub fn install(_diag: DiagnosticHandle, event_loop: LoopHandle) -> std::io::Result<()> {
        tokio::spawn(async move {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    break;
                }
                info!("interrupt received, requesting orderly exit");
                event_loop.quit();
            }
        });
        Ok(())
    }
}
