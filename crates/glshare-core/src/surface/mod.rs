//! Hidden drawables for secondary contexts.
//!
//! A context that will be current on a worker thread needs its own drawable,
//! and sharing is only defined between drawables of the same pixel format.
//! This module creates hidden windows whose drawable carries the primary
//! drawable's exact pixel-format index.

mod class;
mod provisioner;

pub use class::WindowClass;
pub use provisioner::{SurfaceMode, SurfaceProvisioner, SurfaceRecord};
