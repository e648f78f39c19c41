use crate::backend::GlBackend;
use crate::handle::{ContextHandle, SurfaceHandle, WindowHandle};
use crate::role::RoleMap;
use crate::surface::SurfaceRecord;

/// Everything one initialization attempt created.
///
/// Dropping an uncommitted attempt destroys all of it, so a failure at any
/// stage leaves nothing behind.
pub(crate) struct Attempt<'a, B: GlBackend + ?Sized> {
    backend: &'a B,
    contexts: Vec<ContextHandle>,
    surfaces: Vec<(WindowHandle, SurfaceHandle)>,
    committed: bool,
}

impl<'a, B: GlBackend + ?Sized> Attempt<'a, B> {
    pub(crate) fn new(backend: &'a B) -> Self {
        Self {
            backend,
            contexts: Vec::new(),
            surfaces: Vec::new(),
            committed: false,
        }
    }

    /// Tracks a dedicated drawable. Reused primary drawables are not ours.
    pub(crate) fn track_surface(&mut self, record: &SurfaceRecord) {
        if let Some(window) = record.window {
            self.surfaces.push((window, record.surface));
        }
    }

    pub(crate) fn track_contexts(&mut self, contexts: &RoleMap<ContextHandle>) {
        self.contexts.extend(contexts.values().copied());
    }

    /// Hands ownership of everything tracked to the caller.
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl<B: GlBackend + ?Sized> Drop for Attempt<'_, B> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        log::warn!(
            "rolling back {} contexts and {} drawables",
            self.contexts.len(),
            self.surfaces.len()
        );
        destroy_all(self.backend, &self.contexts, &self.surfaces);
    }
}

/// Deletes contexts first, then releases drawables and their windows.
pub(crate) fn destroy_all<B: GlBackend + ?Sized>(
    backend: &B,
    contexts: &[ContextHandle],
    surfaces: &[(WindowHandle, SurfaceHandle)],
) {
    for context in contexts {
        backend.delete_context(*context);
    }
    for (window, surface) in surfaces {
        backend.release_surface(*window, *surface);
        backend.destroy_window(*window);
    }
}
