use std::ffi::c_void;

use anyhow::{Context, Result, anyhow, bail};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use windows::Win32::Foundation::HWND;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

/// Runs the probe once, from the first `resumed`, then leaves the loop.
#[derive(Default)]
pub struct ProbeApp {
    window: Option<Window>,
    outcome: Option<Result<()>>,
}

impl ProbeApp {
    pub fn run() -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut app = Self::default();

        event_loop
            .run_app(&mut app)
            .context("winit event loop terminated with error")?;

        app.outcome
            .unwrap_or_else(|| Err(anyhow!("event loop exited before the probe ran")))
    }

    fn probe(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("glshare probe")
            .with_inner_size(LogicalSize::new(64.0, 64.0))
            .with_visible(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create host window")?;

        let hwnd = match window
            .window_handle()
            .context("host window has no native handle")?
            .as_raw()
        {
            RawWindowHandle::Win32(handle) => HWND(handle.hwnd.get() as *mut c_void),
            other => bail!("unexpected window handle kind: {other:?}"),
        };

        // The host drawable belongs to this window; keep it alive past the probe.
        let outcome = crate::probe::run(hwnd);
        self.window = Some(window);
        outcome
    }
}

impl ApplicationHandler for ProbeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.outcome.is_some() {
            return;
        }

        let outcome = self.probe(event_loop);
        self.outcome = Some(outcome);
        event_loop.exit();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
        }
    }
}
