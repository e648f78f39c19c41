use crate::backend::ContextCapabilities;

pub const WGL_CONTEXT_MAJOR_VERSION_ARB: i32 = 0x2091;
pub const WGL_CONTEXT_MINOR_VERSION_ARB: i32 = 0x2092;
pub const WGL_CONTEXT_FLAGS_ARB: i32 = 0x2094;
pub const WGL_CONTEXT_PROFILE_MASK_ARB: i32 = 0x9126;
pub const WGL_CONTEXT_CORE_PROFILE_BIT_ARB: i32 = 0x0001;
pub const WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB: i32 = 0x0002;
pub const WGL_CONTEXT_DEBUG_BIT_ARB: i32 = 0x0001;
pub const WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB: i32 = 0x0002;
pub const WGL_CONTEXT_ROBUST_ACCESS_BIT_ARB: i32 = 0x0004;

pub const GL_CONTEXT_FLAG_FORWARD_COMPATIBLE_BIT: i32 = 0x0001;
pub const GL_CONTEXT_FLAG_DEBUG_BIT: i32 = 0x0002;
pub const GL_CONTEXT_FLAG_ROBUST_ACCESS_BIT: i32 = 0x0004;

/// `GL_CONTEXT_FLAGS` bits and the creation bits that request them.
const FLAG_TRANSLATION: [(i32, i32); 3] = [
    (GL_CONTEXT_FLAG_FORWARD_COMPATIBLE_BIT, WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB),
    (GL_CONTEXT_FLAG_DEBUG_BIT, WGL_CONTEXT_DEBUG_BIT_ARB),
    (GL_CONTEXT_FLAG_ROBUST_ACCESS_BIT, WGL_CONTEXT_ROBUST_ACCESS_BIT_ARB),
];

/// Translates queried context flags into creation flags.
///
/// The two bit layouts differ. Bits with no creation counterpart (no-error
/// among them) are dropped.
pub fn creation_flags(context_flags: i32) -> i32 {
    FLAG_TRANSLATION
        .iter()
        .filter(|(gl, _)| context_flags & gl != 0)
        .fold(0, |flags, (_, wgl)| flags | wgl)
}

/// Version, flags and profile requested for a secondary context.
///
/// Always carries an explicit profile: an unspecified profile silently
/// fails to share with a compatibility-profile primary on some drivers.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ContextAttribs {
    pub major: i32,
    pub minor: i32,
    pub flags: i32,
    pub profile_mask: i32,
}

impl ContextAttribs {
    /// Mirrors the primary context where it could be queried.
    ///
    /// A missing version falls back to `fallback_version`. A missing or zero
    /// profile mask is treated as unknown and requests the compatibility
    /// profile. Flags go through [`creation_flags`].
    pub fn from_capabilities(caps: &ContextCapabilities, fallback_version: (i32, i32)) -> Self {
        let (major, minor) = match (caps.major, caps.minor) {
            (Some(major), Some(minor)) if major > 0 && minor >= 0 => (major, minor),
            _ => fallback_version,
        };

        let profile_mask = caps
            .profile_mask
            .filter(|mask| *mask != 0)
            .unwrap_or(WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB);

        Self {
            major,
            minor,
            flags: caps.flags.map_or(0, creation_flags),
            profile_mask,
        }
    }

    pub fn is_compatibility(&self) -> bool {
        self.profile_mask & WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB != 0
    }

    /// Zero-terminated attribute list for `wglCreateContextAttribsARB`.
    pub fn to_attrib_list(&self) -> [i32; 9] {
        [
            WGL_CONTEXT_MAJOR_VERSION_ARB,
            self.major,
            WGL_CONTEXT_MINOR_VERSION_ARB,
            self.minor,
            WGL_CONTEXT_FLAGS_ARB,
            self.flags,
            WGL_CONTEXT_PROFILE_MASK_ARB,
            self.profile_mask,
            0,
        ]
    }
}
