use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;

use crate::backend::GlBackend;
use crate::binding::ScopedMakeCurrent;
use crate::context::{CreationTier, create_contexts, link_all};
use crate::error::{BindError, InitError};
use crate::handle::{Binding, ContextHandle, PrimaryContext, SurfaceHandle};
use crate::role::{ContextRole, RoleMap};
use crate::surface::{SurfaceMode, SurfaceProvisioner, SurfaceRecord};
use crate::verify::verify_sharing;

use super::attempt::{Attempt, destroy_all};
use super::{ContextBundle, SecondaryContextRecord, ShareConfig, SurfaceFallback};

/// Owns the secondary contexts of one host primary context.
///
/// `initialize` and `teardown` must run on the host's render thread (the
/// one where the primary context is current) and are serialized. The read
/// accessors are lock-free and valid from any thread at any time.
pub struct SharedContexts<B: GlBackend> {
    backend: B,
    config: ShareConfig,

    /// `Some` exactly when ready.
    published: ArcSwapOption<ContextBundle>,

    /// Held for the whole of an initialization attempt or a teardown.
    attempt: Mutex<()>,
}

impl<B: GlBackend> SharedContexts<B> {
    pub fn new(backend: B, config: ShareConfig) -> Self {
        Self {
            backend,
            config,
            published: ArcSwapOption::empty(),
            attempt: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.published.load().is_some()
    }

    /// The published bundle, if ready.
    pub fn bundle(&self) -> Option<Arc<ContextBundle>> {
        self.published.load_full()
    }

    pub fn context(&self, role: ContextRole) -> Option<ContextHandle> {
        let published = self.published.load();
        (*published).as_ref().map(|bundle| bundle.context(role))
    }

    pub fn surface(&self, role: ContextRole) -> Option<SurfaceHandle> {
        let published = self.published.load();
        (*published).as_ref().map(|bundle| bundle.surface(role))
    }

    /// Binds `role`'s context and drawable on the calling thread until the
    /// guard drops.
    ///
    /// A role's context must not be bound on two threads at once; callers
    /// keep one consumer thread per role.
    pub fn make_current(&self, role: ContextRole) -> Result<ScopedMakeCurrent<'_, B>, BindError> {
        let binding = {
            let published = self.published.load();
            let bundle = (*published).as_ref().ok_or(BindError::NotReady)?;
            bundle.record(role).binding()
        };
        Ok(ScopedMakeCurrent::new(&self.backend, binding)?)
    }

    /// Creates, links and verifies every role's context, then publishes them.
    ///
    /// Must be called on the thread where `primary` is current. Returns the
    /// published bundle immediately if already ready. On failure everything
    /// created during this call is destroyed and nothing is published.
    pub fn initialize(&self, primary: PrimaryContext) -> Result<Arc<ContextBundle>, InitError> {
        if let Some(bundle) = self.published.load_full() {
            return Ok(bundle);
        }

        let _attempt = self.attempt.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bundle) = self.published.load_full() {
            return Ok(bundle);
        }

        let current = self.backend.current();
        if current.context != Some(primary.context) {
            log::error!("shared context initialization requires the primary context to be current");
            return Err(InitError::PrimaryNotCurrent);
        }

        // Inside a swap-buffers hook the drawable actually bound wins over
        // the one the host passed in.
        let primary = PrimaryContext {
            surface: current.surface.unwrap_or(primary.surface),
            ..primary
        };

        log::info!("initializing shared contexts");
        let bundle = self
            .build(&primary)
            .inspect_err(|e| log::error!("shared context initialization failed: {e}"))?;

        let bundle = Arc::new(bundle);
        self.published.store(Some(Arc::clone(&bundle)));
        log::info!(
            "all shared contexts initialized and verified ({:?} tier, {:?} drawables)",
            bundle.tier(),
            bundle.surface_mode(),
        );
        Ok(bundle)
    }

    fn build(&self, primary: &PrimaryContext) -> Result<ContextBundle, InitError> {
        let backend = &self.backend;
        let mut attempt = Attempt::new(backend);

        let provisioner = SurfaceProvisioner::new(backend, &self.config.window_title_prefix);
        let format = provisioner.query_primary_format(primary.surface)?;
        let surfaces = RoleMap::try_from_fn(|role| {
            let record = match provisioner.provision(&format, role) {
                Ok(record) => record,
                Err(source) => match self.config.surface_fallback {
                    SurfaceFallback::ReusePrimary => {
                        log::warn!(
                            "no dedicated drawable for the {role} context ({source}), \
                             reusing the primary drawable"
                        );
                        SurfaceRecord::shared(primary.surface, format.index)
                    }
                    SurfaceFallback::Abort => {
                        return Err(InitError::SurfaceUnavailable { role, source });
                    }
                },
            };
            attempt.track_surface(&record);
            Ok(record)
        })?;
        let surface_mode = SurfaceMode::of(&surfaces);
        surface_mode.log();

        let created = create_contexts(backend, primary, &surfaces, self.config.fallback_version)?;
        attempt.track_contexts(&created.contexts);

        let link_orders = match created.tier {
            CreationTier::Modern => None,
            CreationTier::Legacy => Some(link_all(backend, primary.context, &created.contexts)?),
        };

        let primary_binding = Binding::new(primary.surface, primary.context);
        let records = RoleMap::try_from_fn(|role| {
            let surface = surfaces[role];
            let context = created.contexts[role];
            let secondary = Binding::new(surface.surface, context);
            let marker = self.config.marker_pixel;
            if !verify_sharing(backend, primary_binding, secondary, role, marker) {
                return Err(InitError::Verification { role });
            }
            Ok(SecondaryContextRecord {
                role,
                context,
                surface,
                tier: created.tier,
                link_order: link_orders.as_ref().map(|orders| orders[role]),
                verified: true,
            })
        })?;

        attempt.commit();
        Ok(ContextBundle {
            records,
            tier: created.tier,
            surface_mode,
            attribs: created.attribs,
        })
    }

    /// Unpublishes the bundle, then deletes contexts, then releases
    /// dedicated drawables and their hidden windows.
    ///
    /// Consumers must have released their bindings first. Safe to call when
    /// nothing was ever published.
    pub fn teardown(&self) {
        let _attempt = self.attempt.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(bundle) = self.published.swap(None) else {
            log::debug!("no shared contexts to clean up");
            return;
        };

        let contexts: Vec<_> = bundle.records().values().map(|r| r.context).collect();
        let surfaces: Vec<_> = bundle
            .records()
            .values()
            .filter_map(|r| r.surface.window.map(|window| (window, r.surface.surface)))
            .collect();
        destroy_all(&self.backend, &contexts, &surfaces);
        log::info!("shared contexts cleaned up");
    }
}

impl<B: GlBackend> Drop for SharedContexts<B> {
    fn drop(&mut self) {
        if self.is_ready() {
            self.teardown();
        }
    }
}
