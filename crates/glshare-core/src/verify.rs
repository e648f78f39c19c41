//! Empirical share-group check.
//!
//! Creation and link calls can report success while the driver still keeps
//! the contexts in separate namespaces (seen with some pixel-format/driver
//! combinations). The symptom downstream is textures rendered off-thread that
//! never appear, with no error anywhere. The only reliable check is to create
//! an object in one context and look it up from the other.

use crate::backend::GlBackend;
use crate::binding::ScopedMakeCurrent;
use crate::handle::Binding;
use crate::role::ContextRole;

/// Default marker pixel (RGBA, opaque magenta-ish) of the probe texture.
pub const MARKER_PIXEL: u32 = 0xFF00_FFFF;

/// Returns `true` only if a texture created while `primary` is current is
/// visible while `secondary` is current.
///
/// Any step that cannot be evaluated counts as failure. The probe texture
/// is deleted from the primary on every path, and the calling thread's
/// binding is restored.
pub fn verify_sharing<B: GlBackend + ?Sized>(
    backend: &B,
    primary: Binding,
    secondary: Binding,
    role: ContextRole,
    marker: u32,
) -> bool {
    let complete = |b: &Binding| b.is_bound() && b.surface.is_some();
    if !complete(&primary) || !complete(&secondary) {
        return false;
    }

    let texture = {
        let bound = match ScopedMakeCurrent::new(backend, primary) {
            Ok(bound) => bound,
            Err(e) => {
                log::warn!("{role} verification: cannot bind primary context: {e}");
                return false;
            }
        };
        let texture = match backend.create_marker_texture(marker) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("{role} verification: cannot create probe texture: {e}");
                return false;
            }
        };
        drop(bound);
        texture
    };

    let _cleanup = scopeguard::guard(texture, |texture| {
        match ScopedMakeCurrent::new(backend, primary) {
            Ok(_bound) => backend.delete_texture(texture),
            Err(e) => log::warn!("{role} verification: probe texture {texture} leaked: {e}"),
        }
    });

    let shared = match ScopedMakeCurrent::new(backend, secondary) {
        Ok(_bound) => backend.is_texture(texture),
        Err(e) => {
            log::warn!("{role} verification: cannot bind {role} context: {e}");
            false
        }
    };

    if shared {
        log::info!("texture sharing verified for the {role} context");
    } else {
        log::error!("texture sharing verification FAILED for the {role} context");
    }
    shared
}
