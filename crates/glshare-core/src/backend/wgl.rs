//! WGL implementation of [`GlBackend`].
//!
//! Thin wrappers over opengl32/user32/gdi32. The only entry point not
//! exported by opengl32 itself, `wglCreateContextAttribsARB`, is resolved
//! lazily the first time it is needed, which happens while the primary
//! context is current (`wglGetProcAddress` requires one).

use std::mem;
use std::ptr;
use std::sync::OnceLock;

use windows::Win32::Foundation::{
    ERROR_CLASS_ALREADY_EXISTS, ERROR_PROC_NOT_FOUND, GetLastError, HINSTANCE, HWND, LPARAM,
    LRESULT, SetLastError, WIN32_ERROR, WPARAM,
};
use windows::Win32::Graphics::Gdi::{GetDC, HDC, ReleaseDC};
use windows::Win32::Graphics::OpenGL::{
    DescribePixelFormat, GetPixelFormat, HGLRC, PFD_FLAGS, PFD_PIXEL_TYPE, PIXELFORMATDESCRIPTOR,
    SetPixelFormat, glBindTexture, glDeleteTextures, glGenTextures, glGetError, glGetIntegerv,
    glIsTexture, glTexImage2D, glTexParameteri, wglCreateContext, wglDeleteContext,
    wglGetCurrentContext, wglGetCurrentDC, wglGetProcAddress, wglMakeCurrent, wglShareLists,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CS_OWNDC, CreateWindowExW, DefWindowProcW, DestroyWindow, RegisterClassExW, WINDOW_EX_STYLE,
    WNDCLASSEXW, WS_OVERLAPPED,
};
use windows::core::{HSTRING, PCWSTR, s};

use super::{
    ClassStatus, ContextCapabilities, GlBackend, PixelFormat, PixelFormatDescriptor, TextureId,
};
use crate::context::ContextAttribs;
use crate::error::BackendError;
use crate::handle::{Binding, ContextHandle, SurfaceHandle, WindowHandle};
use crate::surface::WindowClass;

const GL_NO_ERROR: u32 = 0;
const GL_TEXTURE_2D: u32 = 0x0DE1;
const GL_TEXTURE_MAG_FILTER: u32 = 0x2800;
const GL_TEXTURE_MIN_FILTER: u32 = 0x2801;
const GL_NEAREST: i32 = 0x2600;
const GL_RGBA: u32 = 0x1908;
const GL_RGBA8: i32 = 0x8058;
const GL_UNSIGNED_BYTE: u32 = 0x1401;
const GL_MAJOR_VERSION: u32 = 0x821B;
const GL_MINOR_VERSION: u32 = 0x821C;
const GL_CONTEXT_FLAGS: u32 = 0x821E;
const GL_CONTEXT_PROFILE_MASK: u32 = 0x9126;

/// Bound on `glGetError` draining; some drivers keep reporting without a
/// current context.
const MAX_PENDING_GL_ERRORS: usize = 32;

static WINDOW_CLASS: WindowClass = WindowClass::new("GlShareHiddenSurface");

type CreateContextAttribsArb = unsafe extern "system" fn(HDC, HGLRC, *const i32) -> HGLRC;

/// The native WGL driver.
#[derive(Default)]
pub struct WglBackend {
    create_context_attribs: OnceLock<Option<CreateContextAttribsArb>>,
}

impl WglBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_context_attribs(&self) -> Option<CreateContextAttribsArb> {
        *self.create_context_attribs.get_or_init(|| {
            let resolved = load_create_context_attribs();
            if resolved.is_none() {
                log::debug!("wglCreateContextAttribsARB not exported by the driver");
            }
            resolved
        })
    }
}

fn load_create_context_attribs() -> Option<CreateContextAttribsArb> {
    let proc = unsafe { wglGetProcAddress(s!("wglCreateContextAttribsARB")) }?;
    // Some ICDs return small sentinel values instead of null.
    if matches!(proc as usize, 1 | 2 | 3 | usize::MAX) {
        return None;
    }
    Some(unsafe {
        mem::transmute::<unsafe extern "system" fn() -> isize, CreateContextAttribsArb>(proc)
    })
}

unsafe extern "system" fn hidden_window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

fn last_error() -> u32 {
    unsafe { GetLastError() }.0
}

fn os_error(op: &'static str, e: windows::core::Error) -> BackendError {
    BackendError::from_hresult(op, e.code().0)
}

fn hdc(surface: Option<SurfaceHandle>) -> HDC {
    HDC(surface.map_or(ptr::null_mut(), SurfaceHandle::as_raw))
}

fn hglrc(context: Option<ContextHandle>) -> HGLRC {
    HGLRC(context.map_or(ptr::null_mut(), ContextHandle::as_raw))
}

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.as_raw())
}

fn module_instance() -> Result<HINSTANCE, BackendError> {
    let module = unsafe { GetModuleHandleW(PCWSTR::null()) }
        .map_err(|e| os_error("GetModuleHandleW", e))?;
    Ok(HINSTANCE(module.0))
}

fn get_integer(pname: u32) -> Option<i32> {
    let mut value = 0;
    unsafe { glGetIntegerv(pname, &mut value) };
    (unsafe { glGetError() } == GL_NO_ERROR).then_some(value)
}

fn drain_gl_errors() {
    for _ in 0..MAX_PENDING_GL_ERRORS {
        if unsafe { glGetError() } == GL_NO_ERROR {
            return;
        }
    }
}

impl GlBackend for WglBackend {
    fn current(&self) -> Binding {
        Binding {
            surface: SurfaceHandle::from_raw(unsafe { wglGetCurrentDC() }.0),
            context: ContextHandle::from_raw(unsafe { wglGetCurrentContext() }.0),
        }
    }

    fn make_current(&self, binding: Binding) -> Result<(), BackendError> {
        unsafe { wglMakeCurrent(hdc(binding.surface), hglrc(binding.context)) }
            .map_err(|e| os_error("wglMakeCurrent", e))
    }

    fn pixel_format(&self, surface: SurfaceHandle) -> Result<PixelFormat, BackendError> {
        let dc = hdc(Some(surface));
        let index = unsafe { GetPixelFormat(dc) };
        if index == 0 {
            return Err(BackendError::new("GetPixelFormat", last_error()));
        }

        let mut pfd = PIXELFORMATDESCRIPTOR {
            nSize: mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16,
            nVersion: 1,
            ..Default::default()
        };
        let described = unsafe {
            DescribePixelFormat(
                dc,
                index,
                mem::size_of::<PIXELFORMATDESCRIPTOR>() as u32,
                Some(&mut pfd as *mut PIXELFORMATDESCRIPTOR),
            )
        };
        if described == 0 {
            return Err(BackendError::new("DescribePixelFormat", last_error()));
        }

        Ok(PixelFormat {
            index,
            descriptor: PixelFormatDescriptor {
                flags: pfd.dwFlags.0,
                pixel_type: pfd.iPixelType.0 as u8,
                color_bits: pfd.cColorBits,
                alpha_bits: pfd.cAlphaBits,
                depth_bits: pfd.cDepthBits,
                stencil_bits: pfd.cStencilBits,
            },
        })
    }

    fn set_pixel_format(
        &self,
        surface: SurfaceHandle,
        format: &PixelFormat,
    ) -> Result<(), BackendError> {
        let d = &format.descriptor;
        let pfd = PIXELFORMATDESCRIPTOR {
            nSize: mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16,
            nVersion: 1,
            dwFlags: PFD_FLAGS(d.flags),
            iPixelType: PFD_PIXEL_TYPE(d.pixel_type as _),
            cColorBits: d.color_bits,
            cAlphaBits: d.alpha_bits,
            cDepthBits: d.depth_bits,
            cStencilBits: d.stencil_bits,
            ..Default::default()
        };
        unsafe { SetPixelFormat(hdc(Some(surface)), format.index, &pfd) }
            .map_err(|e| os_error("SetPixelFormat", e))
    }

    fn window_class(&self) -> &WindowClass {
        &WINDOW_CLASS
    }

    fn register_window_class(&self, name: &str) -> Result<ClassStatus, BackendError> {
        let class_name = HSTRING::from(name);
        let class = WNDCLASSEXW {
            cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_OWNDC,
            lpfnWndProc: Some(hidden_window_proc),
            hInstance: module_instance()?,
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };

        if unsafe { RegisterClassExW(&class) } != 0 {
            return Ok(ClassStatus::Registered);
        }
        // Left behind by an earlier load of this module into the process.
        match unsafe { GetLastError() } {
            ERROR_CLASS_ALREADY_EXISTS => Ok(ClassStatus::AlreadyExists),
            err => Err(BackendError::new("RegisterClassExW", err.0)),
        }
    }

    fn create_hidden_window(&self, class: &str, title: &str) -> Result<WindowHandle, BackendError> {
        let class = HSTRING::from(class);
        let title = HSTRING::from(title);
        let window = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                &class,
                &title,
                WS_OVERLAPPED,
                0,
                0,
                1,
                1,
                None,
                None,
                Some(module_instance()?),
                None,
            )
        }
        .map_err(|e| os_error("CreateWindowExW", e))?;

        WindowHandle::from_raw(window.0)
            .ok_or_else(|| BackendError::new("CreateWindowExW", last_error()))
    }

    fn window_surface(&self, window: WindowHandle) -> Result<SurfaceHandle, BackendError> {
        let dc = unsafe { GetDC(Some(hwnd(window))) };
        SurfaceHandle::from_raw(dc.0).ok_or_else(|| BackendError::new("GetDC", last_error()))
    }

    fn release_surface(&self, window: WindowHandle, surface: SurfaceHandle) {
        unsafe { ReleaseDC(Some(hwnd(window)), hdc(Some(surface))) };
    }

    fn destroy_window(&self, window: WindowHandle) {
        if let Err(e) = unsafe { DestroyWindow(hwnd(window)) } {
            log::warn!("DestroyWindow({window:?}) failed: {e}");
        }
    }

    fn query_capabilities(&self) -> ContextCapabilities {
        drain_gl_errors();
        // Contexts older than 3.0/3.2 raise GL_INVALID_ENUM for these.
        let caps = ContextCapabilities {
            major: get_integer(GL_MAJOR_VERSION),
            minor: get_integer(GL_MINOR_VERSION),
            profile_mask: get_integer(GL_CONTEXT_PROFILE_MASK),
            flags: get_integer(GL_CONTEXT_FLAGS),
        };
        drain_gl_errors();
        log::debug!("primary context capabilities: {caps:?}");
        caps
    }

    fn supports_attrib_creation(&self) -> bool {
        self.create_context_attribs().is_some()
    }

    fn create_context_with_attribs(
        &self,
        surface: SurfaceHandle,
        share: ContextHandle,
        attribs: &ContextAttribs,
    ) -> Result<ContextHandle, BackendError> {
        let Some(create) = self.create_context_attribs() else {
            return Err(BackendError::new("wglCreateContextAttribsARB", ERROR_PROC_NOT_FOUND.0));
        };
        let list = attribs.to_attrib_list();
        unsafe { SetLastError(WIN32_ERROR(0)) };
        let context = unsafe { create(hdc(Some(surface)), hglrc(Some(share)), list.as_ptr()) };
        ContextHandle::from_raw(context.0)
            .ok_or_else(|| BackendError::new("wglCreateContextAttribsARB", last_error()))
    }

    fn create_context(&self, surface: SurfaceHandle) -> Result<ContextHandle, BackendError> {
        let context = unsafe { wglCreateContext(hdc(Some(surface))) }
            .map_err(|e| os_error("wglCreateContext", e))?;
        ContextHandle::from_raw(context.0)
            .ok_or_else(|| BackendError::new("wglCreateContext", last_error()))
    }

    fn share_lists(&self, first: ContextHandle, second: ContextHandle) -> Result<(), BackendError> {
        unsafe { SetLastError(WIN32_ERROR(0)) };
        unsafe { wglShareLists(hglrc(Some(first)), hglrc(Some(second))) }
            .map_err(|e| os_error("wglShareLists", e))
    }

    fn delete_context(&self, context: ContextHandle) {
        if let Err(e) = unsafe { wglDeleteContext(hglrc(Some(context))) } {
            log::warn!("wglDeleteContext({context:?}) failed: {e}");
        }
    }

    fn create_marker_texture(&self, pixel: u32) -> Result<TextureId, BackendError> {
        let mut texture: TextureId = 0;
        unsafe {
            glGenTextures(1, &mut texture);
            glBindTexture(GL_TEXTURE_2D, texture);
            glTexParameteri(GL_TEXTURE_2D, GL_TEXTURE_MIN_FILTER, GL_NEAREST);
            glTexParameteri(GL_TEXTURE_2D, GL_TEXTURE_MAG_FILTER, GL_NEAREST);
            glTexImage2D(
                GL_TEXTURE_2D,
                0,
                GL_RGBA8,
                1,
                1,
                0,
                GL_RGBA,
                GL_UNSIGNED_BYTE,
                (&raw const pixel).cast(),
            );
            glBindTexture(GL_TEXTURE_2D, 0);
        }

        if texture == 0 {
            return Err(BackendError::new("glGenTextures", unsafe { glGetError() }));
        }
        Ok(texture)
    }

    fn is_texture(&self, texture: TextureId) -> bool {
        unsafe { glIsTexture(texture) != 0 }
    }

    fn delete_texture(&self, texture: TextureId) {
        unsafe { glDeleteTextures(1, &texture) };
    }
}
