//! Deterministic stand-in for a WGL driver.
//!
//! Models what the subsystem depends on: per-thread bindings, share groups,
//! immutable pixel formats, and the rule that linked contexts must not be
//! current anywhere. Faults are keyed by role, which the fake recovers from
//! the hidden window title; contexts on the primary drawable have no role.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use super::{
    ClassStatus, ContextCapabilities, GlBackend, PixelFormat, PixelFormatDescriptor, TextureId,
};
use crate::context::ContextAttribs;
use crate::error::BackendError;
use crate::handle::{Binding, ContextHandle, PrimaryContext, SurfaceHandle, WindowHandle};
use crate::role::ContextRole;
use crate::surface::WindowClass;

const ERROR_BUSY: u32 = 170;
const ERROR_INVALID_HANDLE: u32 = 6;
const ERROR_INVALID_PIXEL_FORMAT: u32 = 2000;
const ERROR_INVALID_OPERATION: u32 = 4317;

#[derive(Debug, Clone)]
pub(crate) struct Faults {
    pub primary_format: i32,
    pub capabilities: ContextCapabilities,
    pub class_already_exists: bool,
    pub class_registration_fails: bool,
    /// Reading the primary drawable's pixel format fails.
    pub describe_fails: bool,
    pub window_creation_fails: Vec<ContextRole>,
    pub set_pixel_format_fails: Vec<ContextRole>,
    pub modern_unavailable: bool,
    pub modern_creation_fails: Vec<ContextRole>,
    pub legacy_creation_fails: Vec<ContextRole>,
    pub forward_link_fails: Vec<ContextRole>,
    pub reverse_link_fails: Vec<ContextRole>,
    /// `share_lists` reports success without linking anything.
    pub link_is_noop: bool,
    /// Contexts of these roles never join the primary's share group, even
    /// when creation or linking reports success.
    pub never_shares: Vec<ContextRole>,
    pub bind_fails: Vec<ContextRole>,
}

impl Default for Faults {
    fn default() -> Self {
        Self {
            primary_format: 7,
            capabilities: ContextCapabilities {
                major: Some(4),
                minor: Some(6),
                profile_mask: Some(0x2),
                flags: Some(0),
            },
            class_already_exists: false,
            class_registration_fails: false,
            describe_fails: false,
            window_creation_fails: Vec::new(),
            set_pixel_format_fails: Vec::new(),
            modern_unavailable: false,
            modern_creation_fails: Vec::new(),
            legacy_creation_fails: Vec::new(),
            forward_link_fails: Vec::new(),
            reverse_link_fails: Vec::new(),
            link_is_noop: false,
            never_shares: Vec::new(),
            bind_fails: Vec::new(),
        }
    }
}

struct FakeSurface {
    window: Option<WindowHandle>,
    role: Option<ContextRole>,
    format: Option<i32>,
}

struct FakeContext {
    surface: SurfaceHandle,
    group: usize,
    role: Option<ContextRole>,
}

#[derive(Default)]
struct State {
    next_id: usize,
    windows: HashMap<WindowHandle, String>,
    surfaces: HashMap<SurfaceHandle, FakeSurface>,
    contexts: HashMap<ContextHandle, FakeContext>,
    current: HashMap<ThreadId, Binding>,
    textures: HashMap<TextureId, usize>,
    next_texture: TextureId,
    class_registrations: usize,
    creation_calls: usize,
    make_current_calls: usize,
    link_calls: Vec<(ContextHandle, ContextHandle)>,
    last_attribs: Option<ContextAttribs>,
    last_marker: Option<u32>,
}

impl State {
    fn next(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    fn current_group(&self) -> Option<usize> {
        let context = self.current.get(&thread::current().id())?.context?;
        self.contexts.get(&context).map(|c| c.group)
    }

    fn is_current_anywhere(&self, context: ContextHandle) -> bool {
        self.current.values().any(|b| b.context == Some(context))
    }

    fn surface_format(&self, surface: SurfaceHandle) -> Option<i32> {
        self.surfaces.get(&surface).and_then(|s| s.format)
    }
}

/// Clones share one driver, so a clone can observe a backend that was moved
/// into its owner.
#[derive(Clone)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<State>>,
    faults: Faults,
    class: Arc<WindowClass>,
    primary: PrimaryContext,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::with_faults(Faults::default())
    }

    /// A driver whose primary context is already current on the calling
    /// thread.
    pub(crate) fn with_faults(faults: Faults) -> Self {
        let mut state = State::default();
        let surface = SurfaceHandle::from_id(state.next());
        let context = ContextHandle::from_id(state.next());
        state.surfaces.insert(
            surface,
            FakeSurface {
                window: None,
                role: None,
                format: Some(faults.primary_format),
            },
        );
        let group = state.next();
        state.contexts.insert(
            context,
            FakeContext {
                surface,
                group,
                role: None,
            },
        );
        state
            .current
            .insert(thread::current().id(), Binding::new(surface, context));

        Self {
            state: Arc::new(Mutex::new(state)),
            faults,
            class: Arc::new(WindowClass::new("GlShareFakeClass")),
            primary: PrimaryContext::new(context, surface),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn primary(&self) -> PrimaryContext {
        self.primary
    }

    pub(crate) fn primary_binding(&self) -> Binding {
        Binding::new(self.primary.surface, self.primary.context)
    }

    /// Secondary contexts plus hidden windows plus their drawables.
    pub(crate) fn live_handles(&self) -> usize {
        let state = self.state();
        let window_surfaces = state.surfaces.values().filter(|s| s.window.is_some()).count();
        state.contexts.len() - 1 + state.windows.len() + window_surfaces
    }

    pub(crate) fn live_contexts(&self) -> usize {
        self.state().contexts.len() - 1
    }

    pub(crate) fn live_textures(&self) -> usize {
        self.state().textures.len()
    }

    pub(crate) fn creation_calls(&self) -> usize {
        self.state().creation_calls
    }

    pub(crate) fn class_registrations(&self) -> usize {
        self.state().class_registrations
    }

    pub(crate) fn make_current_calls(&self) -> usize {
        self.state().make_current_calls
    }

    pub(crate) fn link_calls(&self) -> Vec<(ContextHandle, ContextHandle)> {
        self.state().link_calls.clone()
    }

    pub(crate) fn last_attribs(&self) -> Option<ContextAttribs> {
        self.state().last_attribs
    }

    pub(crate) fn last_marker(&self) -> Option<u32> {
        self.state().last_marker
    }

    pub(crate) fn window_title(&self, window: WindowHandle) -> Option<String> {
        self.state().windows.get(&window).cloned()
    }

    pub(crate) fn shares_with_primary(&self, context: ContextHandle) -> bool {
        let state = self.state();
        let group = |c: ContextHandle| state.contexts.get(&c).map(|c| c.group);
        group(context).is_some() && group(context) == group(self.primary.context)
    }

    pub(crate) fn is_current_anywhere(&self, context: ContextHandle) -> bool {
        self.state().is_current_anywhere(context)
    }

    fn role_of(title: &str) -> Option<ContextRole> {
        ContextRole::ALL.into_iter().find(|role| title.ends_with(role.name()))
    }

    fn fails(list: &[ContextRole], role: Option<ContextRole>) -> bool {
        role.is_some_and(|role| list.contains(&role))
    }

    fn insert_context(
        &self,
        state: &mut State,
        surface: SurfaceHandle,
        group: Option<usize>,
    ) -> ContextHandle {
        let role = state.surfaces.get(&surface).and_then(|s| s.role);
        let group = match group {
            Some(group) if !Self::fails(&self.faults.never_shares, role) => group,
            _ => state.next(),
        };
        let context = ContextHandle::from_id(state.next());
        state.contexts.insert(
            context,
            FakeContext {
                surface,
                group,
                role,
            },
        );
        context
    }
}

impl GlBackend for FakeBackend {
    fn current(&self) -> Binding {
        self.state()
            .current
            .get(&thread::current().id())
            .copied()
            .unwrap_or(Binding::NONE)
    }

    fn make_current(&self, binding: Binding) -> Result<(), BackendError> {
        let mut state = self.state();
        state.make_current_calls += 1;
        let thread = thread::current().id();

        let (surface, context) = match (binding.surface, binding.context) {
            (None, None) => {
                state.current.remove(&thread);
                return Ok(());
            }
            (Some(surface), Some(context)) => (surface, context),
            _ => return Err(BackendError::new("wglMakeCurrent", ERROR_INVALID_HANDLE)),
        };

        let Some(ctx) = state.contexts.get(&context) else {
            return Err(BackendError::new("wglMakeCurrent", ERROR_INVALID_HANDLE));
        };
        if Self::fails(&self.faults.bind_fails, ctx.role) {
            return Err(BackendError::new("wglMakeCurrent", ERROR_INVALID_OPERATION));
        }
        let context_format = state.surface_format(ctx.surface);
        let surface_format = state.surface_format(surface);
        if surface_format.is_none() || surface_format != context_format {
            return Err(BackendError::new("wglMakeCurrent", ERROR_INVALID_PIXEL_FORMAT));
        }
        let elsewhere = state
            .current
            .iter()
            .any(|(t, b)| *t != thread && b.context == Some(context));
        if elsewhere {
            return Err(BackendError::new("wglMakeCurrent", ERROR_BUSY));
        }

        state.current.insert(thread, binding);
        Ok(())
    }

    fn pixel_format(&self, surface: SurfaceHandle) -> Result<PixelFormat, BackendError> {
        if self.faults.describe_fails && surface == self.primary.surface {
            return Err(BackendError::new("DescribePixelFormat", ERROR_INVALID_PIXEL_FORMAT));
        }
        let index = self
            .state()
            .surface_format(surface)
            .ok_or(BackendError::new("GetPixelFormat", ERROR_INVALID_PIXEL_FORMAT))?;
        Ok(PixelFormat {
            index,
            descriptor: PixelFormatDescriptor {
                flags: 0x25,
                pixel_type: 0,
                color_bits: 32,
                alpha_bits: 8,
                depth_bits: 24,
                stencil_bits: 8,
            },
        })
    }

    fn set_pixel_format(
        &self,
        surface: SurfaceHandle,
        format: &PixelFormat,
    ) -> Result<(), BackendError> {
        let mut state = self.state();
        let Some(target) = state.surfaces.get_mut(&surface) else {
            return Err(BackendError::new("SetPixelFormat", ERROR_INVALID_HANDLE));
        };
        if target.format.is_some() || Self::fails(&self.faults.set_pixel_format_fails, target.role)
        {
            return Err(BackendError::new("SetPixelFormat", ERROR_INVALID_PIXEL_FORMAT));
        }
        target.format = Some(format.index);
        Ok(())
    }

    fn window_class(&self) -> &WindowClass {
        &self.class
    }

    fn register_window_class(&self, _name: &str) -> Result<ClassStatus, BackendError> {
        self.state().class_registrations += 1;
        if self.faults.class_registration_fails {
            return Err(BackendError::new("RegisterClassExW", ERROR_INVALID_HANDLE));
        }
        Ok(if self.faults.class_already_exists {
            ClassStatus::AlreadyExists
        } else {
            ClassStatus::Registered
        })
    }

    fn create_hidden_window(
        &self,
        _class: &str,
        title: &str,
    ) -> Result<WindowHandle, BackendError> {
        if Self::fails(&self.faults.window_creation_fails, Self::role_of(title)) {
            return Err(BackendError::new("CreateWindowExW", ERROR_INVALID_HANDLE));
        }
        let mut state = self.state();
        let window = WindowHandle::from_id(state.next());
        state.windows.insert(window, title.to_string());
        Ok(window)
    }

    fn window_surface(&self, window: WindowHandle) -> Result<SurfaceHandle, BackendError> {
        let mut state = self.state();
        let Some(title) = state.windows.get(&window) else {
            return Err(BackendError::new("GetDC", ERROR_INVALID_HANDLE));
        };
        let role = Self::role_of(title);
        let surface = SurfaceHandle::from_id(state.next());
        state.surfaces.insert(
            surface,
            FakeSurface {
                window: Some(window),
                role,
                format: None,
            },
        );
        Ok(surface)
    }

    fn release_surface(&self, _window: WindowHandle, surface: SurfaceHandle) {
        self.state().surfaces.remove(&surface);
    }

    fn destroy_window(&self, window: WindowHandle) {
        self.state().windows.remove(&window);
    }

    fn query_capabilities(&self) -> ContextCapabilities {
        self.faults.capabilities
    }

    fn supports_attrib_creation(&self) -> bool {
        !self.faults.modern_unavailable
    }

    fn create_context_with_attribs(
        &self,
        surface: SurfaceHandle,
        share: ContextHandle,
        attribs: &ContextAttribs,
    ) -> Result<ContextHandle, BackendError> {
        let mut state = self.state();
        state.creation_calls += 1;
        state.last_attribs = Some(*attribs);

        let role = state.surfaces.get(&surface).and_then(|s| s.role);
        if state.surface_format(surface).is_none()
            || Self::fails(&self.faults.modern_creation_fails, role)
        {
            return Err(BackendError::new("wglCreateContextAttribsARB", ERROR_INVALID_OPERATION));
        }
        let Some(partner) = state.contexts.get(&share) else {
            return Err(BackendError::new("wglCreateContextAttribsARB", ERROR_INVALID_HANDLE));
        };

        // Mismatched formats or an unspecified profile create a context
        // outside the partner's share group without reporting an error.
        let same_format = state.surface_format(partner.surface) == state.surface_format(surface);
        let group = (same_format && attribs.profile_mask != 0).then_some(partner.group);
        Ok(self.insert_context(&mut state, surface, group))
    }

    fn create_context(&self, surface: SurfaceHandle) -> Result<ContextHandle, BackendError> {
        let mut state = self.state();
        state.creation_calls += 1;

        let role = state.surfaces.get(&surface).and_then(|s| s.role);
        if state.surface_format(surface).is_none()
            || Self::fails(&self.faults.legacy_creation_fails, role)
        {
            return Err(BackendError::new("wglCreateContext", ERROR_INVALID_PIXEL_FORMAT));
        }
        Ok(self.insert_context(&mut state, surface, None))
    }

    fn share_lists(&self, first: ContextHandle, second: ContextHandle) -> Result<(), BackendError> {
        let mut state = self.state();
        state.link_calls.push((first, second));

        if state.is_current_anywhere(first) || state.is_current_anywhere(second) {
            return Err(BackendError::new("wglShareLists", ERROR_BUSY));
        }
        let (Some(a), Some(b)) = (state.contexts.get(&first), state.contexts.get(&second)) else {
            return Err(BackendError::new("wglShareLists", ERROR_INVALID_HANDLE));
        };

        let forward = first == self.primary.context;
        let secondary_role = if forward { b.role } else { a.role };
        let fault = if forward {
            &self.faults.forward_link_fails
        } else {
            &self.faults.reverse_link_fails
        };
        if Self::fails(fault, secondary_role) {
            return Err(BackendError::new("wglShareLists", ERROR_INVALID_OPERATION));
        }
        if self.faults.link_is_noop || Self::fails(&self.faults.never_shares, secondary_role) {
            return Ok(());
        }

        let same_format = state.surface_format(a.surface) == state.surface_format(b.surface);
        let group = a.group;
        if same_format {
            if let Some(b) = state.contexts.get_mut(&second) {
                b.group = group;
            }
        }
        Ok(())
    }

    fn delete_context(&self, context: ContextHandle) {
        let mut state = self.state();
        state.contexts.remove(&context);
        state.current.retain(|_, b| b.context != Some(context));
    }

    fn create_marker_texture(&self, pixel: u32) -> Result<TextureId, BackendError> {
        let mut state = self.state();
        let Some(group) = state.current_group() else {
            return Err(BackendError::new("glGenTextures", ERROR_INVALID_OPERATION));
        };
        state.next_texture += 1;
        let texture = state.next_texture;
        state.textures.insert(texture, group);
        state.last_marker = Some(pixel);
        Ok(texture)
    }

    fn is_texture(&self, texture: TextureId) -> bool {
        let state = self.state();
        state
            .current_group()
            .is_some_and(|group| state.textures.get(&texture) == Some(&group))
    }

    fn delete_texture(&self, texture: TextureId) {
        let mut state = self.state();
        let group = state.current_group();
        if group.is_some() && state.textures.get(&texture) == group.as_ref() {
            state.textures.remove(&texture);
        }
    }
}
