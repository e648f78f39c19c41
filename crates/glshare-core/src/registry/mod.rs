//! Shared-context registry.
//!
//! [`SharedContexts`] runs the whole initialization sequence and publishes
//! its outcome, a [`ContextBundle`], as one atomic snapshot. Readers on any
//! thread see either no bundle or a complete, verified one.

mod attempt;
mod bundle;
mod config;
mod shared;


pub use bundle::{ContextBundle, SecondaryContextRecord};
pub use config::{ShareConfig, SurfaceFallback};
pub use shared::SharedContexts;
