//! Host simulator for `glshare-core`.
//!
//! Opens a hidden window, creates a primary WGL context on it the way a host
//! application would, initializes the shared contexts, binds each one on its
//! own worker thread and tears everything down again.

#[cfg(windows)]
mod app;
#[cfg(windows)]
mod host;
#[cfg(windows)]
mod probe;

use glshare_core::logging::{LoggingConfig, init_logging};

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = run() {
        log::error!("glshare probe failed: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(windows)]
fn run() -> anyhow::Result<()> {
    app::ProbeApp::run()
}

#[cfg(not(windows))]
fn run() -> anyhow::Result<()> {
    anyhow::bail!("the probe drives WGL and only runs on Windows")
}
