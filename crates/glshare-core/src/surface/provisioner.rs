use crate::backend::{GlBackend, PixelFormat};
use crate::error::{InitError, ProvisionError};
use crate::handle::{SurfaceHandle, WindowHandle};
use crate::role::{ContextRole, RoleMap};

/// The drawable a secondary context is bound to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SurfaceRecord {
    pub surface: SurfaceHandle,

    /// Hidden window owning `surface`; `None` when the primary drawable is reused.
    pub window: Option<WindowHandle>,

    /// `false` means the primary drawable is reused. Several threads binding
    /// one drawable is unstable on some drivers.
    pub dedicated: bool,

    /// Pixel-format index of `surface`. Equal to the primary's at creation.
    pub pixel_format: i32,
}

impl SurfaceRecord {
    /// A record reusing the primary drawable.
    pub fn shared(primary: SurfaceHandle, pixel_format: i32) -> Self {
        Self {
            surface: primary,
            window: None,
            dedicated: false,
            pixel_format,
        }
    }
}

/// How the roles' drawables were obtained, across all roles.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceMode {
    /// Every role has its own hidden drawable.
    Dedicated,
    /// Some roles reuse the primary drawable.
    Partial,
    /// Every role reuses the primary drawable.
    Shared,
}

impl SurfaceMode {
    pub fn of(records: &RoleMap<SurfaceRecord>) -> Self {
        let dedicated = records.values().filter(|r| r.dedicated).count();
        match dedicated {
            0 => SurfaceMode::Shared,
            n if n == ContextRole::COUNT => SurfaceMode::Dedicated,
            _ => SurfaceMode::Partial,
        }
    }

    pub(crate) fn log(self) {
        match self {
            SurfaceMode::Dedicated => {
                log::info!("using dedicated hidden drawables for all worker contexts")
            }
            SurfaceMode::Partial => log::warn!(
                "using a hidden drawable for some worker contexts only; \
                 the rest share the primary drawable"
            ),
            SurfaceMode::Shared => log::warn!(
                "hidden drawables unavailable; all worker contexts share the primary drawable, \
                 which may be unstable"
            ),
        }
    }
}

/// Creates hidden drawables matching the primary drawable's pixel format.
pub struct SurfaceProvisioner<'a, B: GlBackend + ?Sized> {
    backend: &'a B,
    title_prefix: &'a str,
}

impl<'a, B: GlBackend + ?Sized> SurfaceProvisioner<'a, B> {
    pub fn new(backend: &'a B, title_prefix: &'a str) -> Self {
        Self {
            backend,
            title_prefix,
        }
    }

    /// Reads the primary drawable's pixel format. Sharing cannot proceed
    /// without it, so failure is fatal to the attempt.
    pub fn query_primary_format(&self, primary: SurfaceHandle) -> Result<PixelFormat, InitError> {
        let format = self
            .backend
            .pixel_format(primary)
            .map_err(InitError::PixelFormatQuery)?;
        log::debug!(
            "primary pixel format {} ({} color, {} depth, {} stencil bits)",
            format.index,
            format.descriptor.color_bits,
            format.descriptor.depth_bits,
            format.descriptor.stencil_bits,
        );
        Ok(format)
    }

    /// Creates a hidden window for `role` and gives its drawable `format`.
    ///
    /// On failure nothing created here survives.
    pub fn provision(
        &self,
        format: &PixelFormat,
        role: ContextRole,
    ) -> Result<SurfaceRecord, ProvisionError> {
        let backend = self.backend;
        let class = backend.window_class();
        class
            .ensure_registered(backend)
            .map_err(ProvisionError::WindowClass)?;

        let title = format!("{}{}", self.title_prefix, role);
        let window = backend
            .create_hidden_window(class.name(), &title)
            .map_err(ProvisionError::Window)?;
        let window = scopeguard::guard(window, |w| backend.destroy_window(w));

        let surface = backend
            .window_surface(*window)
            .map_err(ProvisionError::Surface)?;
        let surface = scopeguard::guard(surface, |s| backend.release_surface(*window, s));

        backend
            .set_pixel_format(*surface, format)
            .map_err(|source| ProvisionError::PixelFormat {
                index: format.index,
                source,
            })?;

        let applied = backend
            .pixel_format(*surface)
            .map_err(|source| ProvisionError::PixelFormat {
                index: format.index,
                source,
            })?;
        if applied.index != format.index {
            return Err(ProvisionError::PixelFormatMismatch {
                expected: format.index,
                actual: applied.index,
            });
        }

        let surface = scopeguard::ScopeGuard::into_inner(surface);
        let window = scopeguard::ScopeGuard::into_inner(window);
        log::debug!("{role} drawable ready with pixel format {}", format.index);

        Ok(SurfaceRecord {
            surface,
            window: Some(window),
            dedicated: true,
            pixel_format: format.index,
        })
    }
}
