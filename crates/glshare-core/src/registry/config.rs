use crate::verify::MARKER_PIXEL;

/// What to do when a role cannot get a dedicated drawable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SurfaceFallback {
    /// Bind the role's context to the primary drawable instead. Flagged as
    /// non-dedicated and logged; less stable on some drivers.
    #[default]
    ReusePrimary,
    /// Fail the whole attempt.
    Abort,
}

/// Initialization parameters for [`super::SharedContexts`].
#[derive(Debug, Clone)]
pub struct ShareConfig {
    /// Version requested when the primary context cannot report its own.
    pub fallback_version: (i32, i32),

    pub surface_fallback: SurfaceFallback,

    /// Pixel stored in the verification probe texture.
    pub marker_pixel: u32,

    /// Hidden window titles are this prefix followed by the role name.
    pub window_title_prefix: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            fallback_version: (3, 3),
            surface_fallback: SurfaceFallback::ReusePrimary,
            marker_pixel: MARKER_PIXEL,
            window_title_prefix: "glshare_worker_".to_string(),
        }
    }
}
