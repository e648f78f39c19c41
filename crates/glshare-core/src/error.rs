use thiserror::Error;

use crate::role::ContextRole;

/// A native call that failed, with the OS error code it left behind.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("{op} failed (error {code})")]
pub struct BackendError {
    pub op: &'static str,
    pub code: u32,
}

/// `HRESULT`s carrying a Win32 error: severity bit plus `FACILITY_WIN32`.
const HRESULT_WIN32_PREFIX: u32 = 0x8007_0000;

impl BackendError {
    pub fn new(op: &'static str, code: u32) -> Self {
        Self { op, code }
    }

    /// Records the Win32 error wrapped in `hresult`, so codes match those
    /// read from `GetLastError`. Other `HRESULT`s are kept whole.
    pub fn from_hresult(op: &'static str, hresult: i32) -> Self {
        let raw = hresult as u32;
        let code = if raw & 0xFFFF_0000 == HRESULT_WIN32_PREFIX {
            raw & 0xFFFF
        } else {
            raw
        };
        Self { op, code }
    }
}

/// Why a dedicated drawable could not be provisioned for one role.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ProvisionError {
    #[error("hidden window class registration failed: {0}")]
    WindowClass(#[source] BackendError),

    #[error("hidden window creation failed: {0}")]
    Window(#[source] BackendError),

    #[error("hidden window drawable unavailable: {0}")]
    Surface(#[source] BackendError),

    #[error("cannot apply pixel format {index}: {source}")]
    PixelFormat {
        index: i32,
        #[source]
        source: BackendError,
    },

    #[error("pixel format read back as {actual}, expected {expected}")]
    PixelFormatMismatch { expected: i32, actual: i32 },
}

/// Why an initialization attempt failed. Everything it created is gone.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum InitError {
    #[error("primary context or drawable handle is null")]
    InvalidPrimary,

    #[error("primary context is not current on the calling thread")]
    PrimaryNotCurrent,

    #[error("cannot read the primary pixel format: {0}")]
    PixelFormatQuery(#[source] BackendError),

    #[error("no drawable for the {role} context and shared-surface fallback is disabled: {source}")]
    SurfaceUnavailable {
        role: ContextRole,
        #[source]
        source: ProvisionError,
    },

    #[error("failed to create the {role} context: {source}")]
    ContextCreation {
        role: ContextRole,
        #[source]
        source: BackendError,
    },

    #[error(
        "failed to share the {role} context with the primary \
         (forward: {forward}, reverse: {reverse})"
    )]
    Link {
        role: ContextRole,
        forward: BackendError,
        reverse: BackendError,
    },

    #[error("texture sharing verification failed for the {role} context")]
    Verification { role: ContextRole },
}

/// Why a consumer could not bind a published context.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum BindError {
    #[error("shared contexts are not ready")]
    NotReady,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
