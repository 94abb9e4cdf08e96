//! Shared resource
//!
//! Used when a read-only resource, such as a name table, must be shared
//! between every value decoded from one file.
//!
//! The implementation depends on the `threading` feature being enabled

use std::fmt;

/// Shared resource
pub struct SharedResource<T: ?Sized> {
    #[cfg(not(feature = "threading"))]
    resource: std::rc::Rc<std::cell::RefCell<T>>,
    #[cfg(feature = "threading")]
    resource: std::sync::Arc<std::sync::RwLock<T>>,
}

impl<T> SharedResource<T> {
    /// Create a new `SharedResource` instance
    #[cfg(not(feature = "threading"))]
    pub fn new(value: T) -> Self {
        SharedResource {
            resource: std::rc::Rc::new(std::cell::RefCell::new(value)),
        }
    }

    /// Create a new `SharedResource` instance
    #[cfg(feature = "threading")]
    pub fn new(value: T) -> Self {
        SharedResource {
            resource: std::sync::Arc::new(std::sync::RwLock::new(value)),
        }
    }

    /// Get a reference to the value inside of this `SharedResource`
    ///
    /// # Panics
    ///
    /// Panics if the value is mutably borrowed, or, in a multithreaded
    /// scenario, if the lock was poisoned
    #[cfg(not(feature = "threading"))]
    pub fn get_ref(&self) -> std::cell::Ref<'_, T> {
        self.resource.borrow()
    }

    /// Get a reference to the value inside of this `SharedResource`
    ///
    /// # Panics
    ///
    /// Panics if the value is mutably borrowed, or, in a multithreaded
    /// scenario, if the lock was poisoned
    #[cfg(feature = "threading")]
    pub fn get_ref(&self) -> std::sync::RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Get a mutable reference to the value inside of this `SharedResource`
    ///
    /// # Panics
    ///
    /// Panics if the value is already borrowed, or, in a multithreaded
    /// scenario, if the lock was poisoned
    #[cfg(not(feature = "threading"))]
    pub fn get_mut(&mut self) -> std::cell::RefMut<'_, T> {
        self.resource.borrow_mut()
    }

    /// Get a mutable reference to the value inside of this `SharedResource`
    ///
    /// # Panics
    ///
    /// Panics if the value is already borrowed, or, in a multithreaded
    /// scenario, if the lock was poisoned
    #[cfg(feature = "threading")]
    pub fn get_mut(&mut self) -> std::sync::RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T: Default> Default for SharedResource<T> {
    fn default() -> Self {
        Self {
            resource: Default::default(),
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SharedResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.resource, f)
    }
}

impl<T: ?Sized> Clone for SharedResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
