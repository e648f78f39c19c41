use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::backend::{ClassStatus, GlBackend};
use crate::error::BackendError;

/// A window class registered at most once per process.
///
/// Registration is double-checked: an atomic flag serves the fast path, a
/// mutex serializes the first registration. A class left behind by an
/// earlier load of this module counts as registered.
#[derive(Debug)]
pub struct WindowClass {
    name: &'static str,
    registered: AtomicBool,
    lock: Mutex<()>,
}

impl WindowClass {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            registered: AtomicBool::new(false),
            lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    pub fn ensure_registered<B: GlBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<(), BackendError> {
        if self.is_registered() {
            return Ok(());
        }

        let _lock = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_registered() {
            return Ok(());
        }

        match backend.register_window_class(self.name)? {
            ClassStatus::Registered => log::debug!("registered window class {}", self.name),
            ClassStatus::AlreadyExists => {
                log::debug!("window class {} already exists, reusing it", self.name)
            }
        }
        self.registered.store(true, Ordering::Release);
        Ok(())
    }
}
