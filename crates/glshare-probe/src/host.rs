use std::mem;

use anyhow::{Context, Result, bail};
use glshare_core::PrimaryContext;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{GetDC, HDC, ReleaseDC};
use windows::Win32::Graphics::OpenGL::{
    ChoosePixelFormat, HGLRC, PFD_DOUBLEBUFFER, PFD_DRAW_TO_WINDOW, PFD_SUPPORT_OPENGL,
    PFD_TYPE_RGBA, PIXELFORMATDESCRIPTOR, SetPixelFormat, wglCreateContext, wglDeleteContext,
    wglMakeCurrent,
};

/// A legacy WGL context on a window's drawable, standing in for the context
/// a host application renders with.
///
/// Current on the creating thread until dropped.
pub struct HostContext {
    window: HWND,
    dc: HDC,
    context: HGLRC,
}

impl HostContext {
    pub fn create(window: HWND) -> Result<Self> {
        let dc = unsafe { GetDC(Some(window)) };
        if dc.is_invalid() {
            bail!("GetDC failed for the host window");
        }
        let mut host = Self {
            window,
            dc,
            context: HGLRC::default(),
        };

        let pfd = PIXELFORMATDESCRIPTOR {
            nSize: mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16,
            nVersion: 1,
            dwFlags: PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL | PFD_DOUBLEBUFFER,
            iPixelType: PFD_TYPE_RGBA,
            cColorBits: 32,
            cAlphaBits: 8,
            cDepthBits: 24,
            cStencilBits: 8,
            ..Default::default()
        };
        let index = unsafe { ChoosePixelFormat(dc, &pfd) };
        if index == 0 {
            bail!("no pixel format matches the host descriptor");
        }
        unsafe { SetPixelFormat(dc, index, &pfd) }
            .context("SetPixelFormat failed for the host drawable")?;

        host.context =
            unsafe { wglCreateContext(dc) }.context("wglCreateContext failed for the host")?;
        unsafe { wglMakeCurrent(dc, host.context) }
            .context("wglMakeCurrent failed for the host")?;

        log::info!("host context created with pixel format {index}");
        Ok(host)
    }

    pub fn primary(&self) -> Result<PrimaryContext> {
        PrimaryContext::from_raw(self.context.0, self.dc.0).context("host handles rejected")
    }
}

impl Drop for HostContext {
    fn drop(&mut self) {
        unsafe {
            if !self.context.is_invalid() {
                let _ = wglMakeCurrent(HDC::default(), HGLRC::default());
                if let Err(e) = wglDeleteContext(self.context) {
                    log::warn!("failed to delete host context: {e}");
                }
            }
            ReleaseDC(Some(self.window), self.dc);
        }
    }
}
