//! Native context API seam.
//!
//! Every driver and window-system call the subsystem makes goes through
//! [`GlBackend`]. The WGL implementation lives in [`wgl`]; tests run against
//! an in-crate fake driver.
//!
//! Calls are synchronous and report failure as [`BackendError`]. Handles
//! passed in must have been produced by the same backend.

#[cfg(test)]
pub(crate) mod fake;
#[cfg(windows)]
pub mod wgl;

#[cfg(windows)]
pub use wgl::WglBackend;

use crate::context::ContextAttribs;
use crate::error::BackendError;
use crate::handle::{Binding, ContextHandle, SurfaceHandle, WindowHandle};
use crate::surface::WindowClass;

/// Identifier of a texture object in the current share group.
pub type TextureId = u32;

/// Color/depth/stencil layout of a drawable, as reported by the driver.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct PixelFormatDescriptor {
    pub flags: u32,
    pub pixel_type: u8,
    pub color_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
}

/// A pixel-format index together with its descriptor.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PixelFormat {
    pub index: i32,
    pub descriptor: PixelFormatDescriptor,
}

/// Version and profile of the current context.
///
/// `None` means the driver could not answer the query.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ContextCapabilities {
    pub major: Option<i32>,
    pub minor: Option<i32>,
    pub profile_mask: Option<i32>,
    pub flags: Option<i32>,
}

/// Outcome of a window class registration.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ClassStatus {
    Registered,
    AlreadyExists,
}

pub trait GlBackend: Send + Sync {
    /// The context and drawable current on the calling thread.
    fn current(&self) -> Binding;

    /// Binds `binding` on the calling thread. [`Binding::NONE`] unbinds.
    fn make_current(&self, binding: Binding) -> Result<(), BackendError>;

    /// Reads the pixel-format index and descriptor of a drawable.
    fn pixel_format(&self, surface: SurfaceHandle) -> Result<PixelFormat, BackendError>;

    /// Applies a pixel format to a drawable that has none yet.
    fn set_pixel_format(
        &self,
        surface: SurfaceHandle,
        format: &PixelFormat,
    ) -> Result<(), BackendError>;

    /// The process-wide class hidden windows are created from.
    fn window_class(&self) -> &WindowClass;

    fn register_window_class(&self, name: &str) -> Result<ClassStatus, BackendError>;

    /// Creates a hidden 1x1 top-level window of the registered class.
    fn create_hidden_window(&self, class: &str, title: &str) -> Result<WindowHandle, BackendError>;

    fn window_surface(&self, window: WindowHandle) -> Result<SurfaceHandle, BackendError>;

    fn release_surface(&self, window: WindowHandle, surface: SurfaceHandle);

    fn destroy_window(&self, window: WindowHandle);

    /// Queries the current context's version, profile and flags.
    fn query_capabilities(&self) -> ContextCapabilities;

    /// Whether contexts can be created with explicit attributes and a share
    /// partner in one call.
    fn supports_attrib_creation(&self) -> bool;

    fn create_context_with_attribs(
        &self,
        surface: SurfaceHandle,
        share: ContextHandle,
        attribs: &ContextAttribs,
    ) -> Result<ContextHandle, BackendError>;

    fn create_context(&self, surface: SurfaceHandle) -> Result<ContextHandle, BackendError>;

    /// Makes `second` share the object namespace of `first`.
    ///
    /// Neither context may be current on any thread.
    fn share_lists(&self, first: ContextHandle, second: ContextHandle) -> Result<(), BackendError>;

    fn delete_context(&self, context: ContextHandle);

    /// Creates a 1x1 RGBA8 texture holding `pixel` in the current context.
    fn create_marker_texture(&self, pixel: u32) -> Result<TextureId, BackendError>;

    /// Whether `texture` names a texture object in the current context.
    fn is_texture(&self, texture: TextureId) -> bool;

    fn delete_texture(&self, texture: TextureId);
}
