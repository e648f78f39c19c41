//! Secondary context creation and namespace linking.
//!
//! Creation first tries attribute-based creation, which links at creation
//! time. If that is unavailable or fails for any role, every role falls back
//! to plain creation followed by an explicit link.

mod attribs;
mod factory;
mod link;

pub use attribs::ContextAttribs;
pub use factory::{CreatedContexts, CreationTier, create_contexts};
pub use link::{LinkOrder, link_all};
