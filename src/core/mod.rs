//! Supervision runtime: supervisor, registry, event loop, signals, monitor.

mod event_loop;
mod monitor;
mod registry;
mod signals;
mod supervisor;

pub use event_loop::{EventLoop, LoopHandle};
pub use monitor::{DiagnosticHandle, DiagnosticMonitor};
pub use registry::{Registry, RegistryEntry};
pub use signals::SignalBridge;
pub use supervisor::Supervisor;
