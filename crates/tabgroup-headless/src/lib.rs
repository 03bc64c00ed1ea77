//! Tabgroup Headless Host
//!
//! An in-process host for tab groups: windows and tab bars that record every
//! command they receive, an active window registry and schedulers. Useful for
//! driving tab groups without a windowing toolkit, and for tests.

mod command;
mod host;
mod registry;
mod scheduler;
mod surface;
mod window;

pub use command::{CommandLog, HostCommand, SurfaceCommand};
pub use host::HeadlessHost;
pub use registry::ActiveWindows;
pub use scheduler::{ManualScheduler, TokioScheduler};
pub use surface::{HeadlessSurface, SelectionAck};
pub use window::HeadlessWindow;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
