use crate::context::{ContextAttribs, CreationTier, LinkOrder};
use crate::handle::{Binding, ContextHandle, SurfaceHandle};
use crate::role::{ContextRole, RoleMap};
use crate::surface::{SurfaceMode, SurfaceRecord};

/// One secondary context and the drawable it binds to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SecondaryContextRecord {
    pub role: ContextRole,
    pub context: ContextHandle,
    pub surface: SurfaceRecord,
    pub tier: CreationTier,
    /// Set on the legacy tier only; the modern tier links at creation.
    pub link_order: Option<LinkOrder>,
    pub verified: bool,
}

impl SecondaryContextRecord {
    /// The pair a consumer binds on its own thread.
    pub fn binding(&self) -> Binding {
        Binding::new(self.surface.surface, self.context)
    }
}

/// Outcome of a successful initialization.
///
/// Every role has a context and a drawable, and every record is verified.
/// Each context may be current on at most one thread at a time; that is the
/// consumers' contract to uphold.
#[derive(Debug, Clone)]
pub struct ContextBundle {
    pub(crate) records: RoleMap<SecondaryContextRecord>,
    pub(crate) tier: CreationTier,
    pub(crate) surface_mode: SurfaceMode,
    pub(crate) attribs: Option<ContextAttribs>,
}

impl ContextBundle {
    pub fn record(&self, role: ContextRole) -> &SecondaryContextRecord {
        &self.records[role]
    }

    pub fn records(&self) -> &RoleMap<SecondaryContextRecord> {
        &self.records
    }

    pub fn context(&self, role: ContextRole) -> ContextHandle {
        self.records[role].context
    }

    pub fn surface(&self, role: ContextRole) -> SurfaceHandle {
        self.records[role].surface.surface
    }

    pub fn tier(&self) -> CreationTier {
        self.tier
    }

    pub fn surface_mode(&self) -> SurfaceMode {
        self.surface_mode
    }

    /// Attributes requested on the modern tier.
    pub fn attribs(&self) -> Option<&ContextAttribs> {
        self.attribs.as_ref()
    }
}
