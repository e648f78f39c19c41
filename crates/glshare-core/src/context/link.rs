use crate::backend::GlBackend;
use crate::binding::ScopedUnbind;
use crate::error::InitError;
use crate::handle::ContextHandle;
use crate::role::{ContextRole, RoleMap};

/// Argument order that made a link succeed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LinkOrder {
    /// `share_lists(primary, secondary)`.
    Forward,
    /// `share_lists(secondary, primary)`. Some drivers only accept this one.
    Reverse,
}

/// Links every secondary context into the primary's namespace.
///
/// No context may be current while linking, so the calling thread's binding
/// is dropped for the duration of the call and restored afterwards, also on
/// failure. Secondaries are linked to the primary only, never to each other.
/// On failure the caller still owns every context.
pub fn link_all<B: GlBackend + ?Sized>(
    backend: &B,
    primary: ContextHandle,
    contexts: &RoleMap<ContextHandle>,
) -> Result<RoleMap<LinkOrder>, InitError> {
    let _unbind = ScopedUnbind::new(backend);
    RoleMap::try_from_fn(|role| link_one(backend, primary, contexts[role], role))
}

fn link_one<B: GlBackend + ?Sized>(
    backend: &B,
    primary: ContextHandle,
    secondary: ContextHandle,
    role: ContextRole,
) -> Result<LinkOrder, InitError> {
    let forward = match backend.share_lists(primary, secondary) {
        Ok(()) => {
            log::debug!("{role} context shared with primary");
            return Ok(LinkOrder::Forward);
        }
        Err(e) => e,
    };

    match backend.share_lists(secondary, primary) {
        Ok(()) => {
            log::info!("{role} context shared with primary in reverse order ({forward})");
            Ok(LinkOrder::Reverse)
        }
        Err(reverse) => {
            log::error!("failed to share the {role} context ({forward}; {reverse})");
            Err(InitError::Link {
                role,
                forward,
                reverse,
            })
        }
    }
}
