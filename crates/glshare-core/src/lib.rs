//! Shared-context crate.
//!
//! Creates secondary OpenGL contexts that share the object namespace of a
//! primary context owned by a host process, proves the sharing works, and
//! publishes the result for worker threads.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`backend`] | `GlBackend` seam over the native context API |
//! | [`binding`] | scoped make-current / unbind guards |
//! | [`surface`] | hidden drawables matching the primary pixel format |
//! | [`context`] | secondary context creation and namespace linking |
//! | [`verify`] | empirical share-group check |
//! | [`registry`] | `SharedContexts`, the published bundle |

pub mod backend;
pub mod binding;
pub mod context;
pub mod error;
pub mod handle;
pub mod registry;
pub mod role;
pub mod surface;
pub mod verify;

pub mod logging;

pub use error::{BackendError, BindError, InitError, ProvisionError};
pub use handle::{Binding, ContextHandle, PrimaryContext, SurfaceHandle, WindowHandle};
pub use registry::{
    ContextBundle, SecondaryContextRecord, ShareConfig, SharedContexts, SurfaceFallback,
};
pub use role::{ContextRole, RoleMap};
