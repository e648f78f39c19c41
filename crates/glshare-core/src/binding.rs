//! Scoped context binding.
//!
//! Both guards remember what was current on the calling thread and put it
//! back when dropped, on every exit path.

use crate::backend::GlBackend;
use crate::error::BackendError;
use crate::handle::Binding;

/// Binds a context/drawable pair for the lifetime of the guard.
///
/// Binding a pair that is already current is a no-op, and so is the restore.
#[must_use = "the previous binding is restored when the guard drops"]
pub struct ScopedMakeCurrent<'a, B: GlBackend + ?Sized> {
    backend: &'a B,
    previous: Binding,
    changed: bool,
}

impl<'a, B: GlBackend + ?Sized> ScopedMakeCurrent<'a, B> {
    pub fn new(backend: &'a B, target: Binding) -> Result<Self, BackendError> {
        let previous = backend.current();
        if previous == target {
            return Ok(Self {
                backend,
                previous,
                changed: false,
            });
        }

        backend.make_current(target)?;
        Ok(Self {
            backend,
            previous,
            changed: true,
        })
    }

    /// The binding that will be restored on drop.
    pub fn previous(&self) -> Binding {
        self.previous
    }
}

impl<B: GlBackend + ?Sized> Drop for ScopedMakeCurrent<'_, B> {
    fn drop(&mut self) {
        if !self.changed {
            return;
        }
        if let Err(e) = self.backend.make_current(self.previous) {
            log::warn!("failed to restore previous context binding: {e}");
        }
    }
}

/// Leaves the calling thread with nothing bound until dropped.
#[must_use = "the previous binding is restored when the guard drops"]
pub struct ScopedUnbind<'a, B: GlBackend + ?Sized> {
    backend: &'a B,
    previous: Binding,
    unbound: bool,
}

impl<'a, B: GlBackend + ?Sized> ScopedUnbind<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        let previous = backend.current();
        let mut unbound = false;
        if previous.is_bound() {
            match backend.make_current(Binding::NONE) {
                Ok(()) => unbound = true,
                Err(e) => log::warn!("failed to unbind current context: {e}"),
            }
        }
        Self {
            backend,
            previous,
            unbound,
        }
    }
}

impl<B: GlBackend + ?Sized> Drop for ScopedUnbind<'_, B> {
    fn drop(&mut self) {
        if !self.unbound || self.previous.surface.is_none() {
            return;
        }
        if let Err(e) = self.backend.make_current(self.previous) {
            log::warn!("failed to rebind previous context: {e}");
        }
    }
}
