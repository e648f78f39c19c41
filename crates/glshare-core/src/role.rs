use std::fmt;
use std::ops::{Index, IndexMut};

/// Which secondary context a record belongs to.
///
/// Each role gets its own context and its own drawable. Adding a role means
/// extending this enum, `ALL`, and the fields of [`RoleMap`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContextRole {
    /// Off-thread rendering of overlay content.
    Render,
    /// Mirror capture.
    Mirror,
}

impl ContextRole {
    pub const COUNT: usize = 2;
    pub const ALL: [ContextRole; Self::COUNT] = [ContextRole::Render, ContextRole::Mirror];

    pub fn name(self) -> &'static str {
        match self {
            ContextRole::Render => "render",
            ContextRole::Mirror => "mirror",
        }
    }
}

impl fmt::Display for ContextRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per [`ContextRole`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RoleMap<T> {
    render: T,
    mirror: T,
}

impl<T> RoleMap<T> {
    pub fn from_fn(mut f: impl FnMut(ContextRole) -> T) -> Self {
        Self {
            render: f(ContextRole::Render),
            mirror: f(ContextRole::Mirror),
        }
    }

    /// Builds the map in `ContextRole::ALL` order, stopping at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(ContextRole) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            render: f(ContextRole::Render)?,
            mirror: f(ContextRole::Mirror)?,
        })
    }

    pub fn get(&self, role: ContextRole) -> &T {
        match role {
            ContextRole::Render => &self.render,
            ContextRole::Mirror => &self.mirror,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContextRole, &T)> {
        ContextRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        ContextRole::ALL.into_iter().map(move |role| self.get(role))
    }

    pub fn map<U>(&self, mut f: impl FnMut(ContextRole, &T) -> U) -> RoleMap<U> {
        RoleMap::from_fn(|role| f(role, self.get(role)))
    }
}

impl<T> Index<ContextRole> for RoleMap<T> {
    type Output = T;

    fn index(&self, role: ContextRole) -> &T {
        self.get(role)
    }
}

impl<T> IndexMut<ContextRole> for RoleMap<T> {
    fn index_mut(&mut self, role: ContextRole) -> &mut T {
        match role {
            ContextRole::Render => &mut self.render,
            ContextRole::Mirror => &mut self.mirror,
        }
    }
}
