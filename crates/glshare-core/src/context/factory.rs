use crate::backend::GlBackend;
use crate::error::{BackendError, InitError};
use crate::handle::{ContextHandle, PrimaryContext};
use crate::role::{ContextRole, RoleMap};
use crate::surface::SurfaceRecord;

use super::ContextAttribs;

/// How the secondary contexts of one attempt were created.
///
/// All roles always share one tier: the two tiers link at different times
/// and under different binding constraints.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CreationTier {
    /// Attribute-based creation, linked to the primary at creation time.
    Modern,
    /// Plain creation; the contexts still need [`super::link_all`].
    Legacy,
}

/// Freshly created secondary contexts. The caller owns every handle.
#[derive(Debug, Clone)]
pub struct CreatedContexts {
    pub contexts: RoleMap<ContextHandle>,
    pub tier: CreationTier,
    /// Attributes requested on the modern tier.
    pub attribs: Option<ContextAttribs>,
}

/// Creates one secondary context per role on its drawable.
///
/// Must run on the thread where `primary` is current: the modern tier reads
/// the primary's version and profile. Fails only when both tiers fail, and
/// then leaves no context behind.
pub fn create_contexts<B: GlBackend + ?Sized>(
    backend: &B,
    primary: &PrimaryContext,
    surfaces: &RoleMap<SurfaceRecord>,
    fallback_version: (i32, i32),
) -> Result<CreatedContexts, InitError> {
    if backend.supports_attrib_creation() {
        let caps = backend.query_capabilities();
        let attribs = ContextAttribs::from_capabilities(&caps, fallback_version);
        let created = create_each(backend, |role| {
            backend.create_context_with_attribs(surfaces[role].surface, primary.context, &attribs)
        });

        match created {
            Ok(contexts) => {
                log::info!(
                    "created shared contexts with explicit attributes ({}.{}, profile {:#x})",
                    attribs.major,
                    attribs.minor,
                    attribs.profile_mask,
                );
                return Ok(CreatedContexts {
                    contexts,
                    tier: CreationTier::Modern,
                    attribs: Some(attribs),
                });
            }
            Err((role, e)) => log::warn!(
                "attribute-based creation of the {role} context failed ({e}), \
                 falling back to plain creation + explicit linking"
            ),
        }
    } else {
        log::info!(
            "attribute-based context creation unavailable, using plain creation + explicit linking"
        );
    }

    let contexts = create_each(backend, |role| backend.create_context(surfaces[role].surface))
        .map_err(|(role, source)| {
            log::error!("failed to create the {role} context: {source}");
            InitError::ContextCreation { role, source }
        })?;
    log::debug!("created {} contexts, linking with primary next", ContextRole::COUNT);

    Ok(CreatedContexts {
        contexts,
        tier: CreationTier::Legacy,
        attribs: None,
    })
}

/// Creates a context per role; on the first failure deletes the ones
/// already created.
fn create_each<B: GlBackend + ?Sized>(
    backend: &B,
    mut create: impl FnMut(ContextRole) -> Result<ContextHandle, BackendError>,
) -> Result<RoleMap<ContextHandle>, (ContextRole, BackendError)> {
    let mut created = Vec::with_capacity(ContextRole::COUNT);
    let result = RoleMap::try_from_fn(|role| {
        let context = create(role).map_err(|e| (role, e))?;
        created.push(context);
        Ok(context)
    });

    if result.is_err() {
        for context in created {
            backend.delete_context(context);
        }
    }
    result
}
