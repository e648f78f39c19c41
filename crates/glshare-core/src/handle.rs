use std::ffi::c_void;
use std::fmt;
use std::num::NonZeroUsize;

use crate::error::InitError;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $name(NonZeroUsize);

        impl $name {
            /// Wraps a native pointer. Returns `None` for null.
            pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
                NonZeroUsize::new(ptr as usize).map(Self)
            }

            /// Returns the native pointer.
            pub fn as_raw(self) -> *mut c_void {
                self.0.get() as *mut c_void
            }

            #[cfg(test)]
            pub(crate) fn from_id(id: usize) -> Self {
                Self(NonZeroUsize::new(id).unwrap_or(NonZeroUsize::MIN))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:#x})"), self.0.get())
            }
        }
    };
}

opaque_handle!(
    /// A rendering context (`HGLRC` under WGL).
    ContextHandle
);
opaque_handle!(
    /// A drawable surface (`HDC` under WGL).
    SurfaceHandle
);
opaque_handle!(
    /// A window owning a drawable (`HWND` under WGL).
    WindowHandle
);

/// The host's context and the drawable it is current on.
///
/// Neither handle is owned here. The host guarantees both stay valid while
/// `SharedContexts::initialize` runs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PrimaryContext {
    pub context: ContextHandle,
    pub surface: SurfaceHandle,
}

impl PrimaryContext {
    pub fn new(context: ContextHandle, surface: SurfaceHandle) -> Self {
        Self { context, surface }
    }

    /// Builds a primary reference from raw host pointers.
    pub fn from_raw(context: *mut c_void, surface: *mut c_void) -> Result<Self, InitError> {
        match (ContextHandle::from_raw(context), SurfaceHandle::from_raw(surface)) {
            (Some(context), Some(surface)) => Ok(Self { context, surface }),
            _ => Err(InitError::InvalidPrimary),
        }
    }
}

/// What is current on a thread. Both `None` means nothing is bound.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Binding {
    pub surface: Option<SurfaceHandle>,
    pub context: Option<ContextHandle>,
}

impl Binding {
    pub const NONE: Binding = Binding {
        surface: None,
        context: None,
    };

    pub fn new(surface: SurfaceHandle, context: ContextHandle) -> Self {
        Self {
            surface: Some(surface),
            context: Some(context),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.context.is_some()
    }
}
