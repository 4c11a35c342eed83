//! Lock helpers that recover from poisoning instead of panicking.
//!
//! Every widget keeps its mutable state behind its own lock. A panic inside a
//! user callback must not leave the widget permanently unusable, so guards are
//! recovered with a warning.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Acquire a read guard, recovering a poisoned lock.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        tracing::warn!("recovering from poisoned rwlock (read)");
        poisoned.into_inner()
    })
}

/// Acquire a write guard, recovering a poisoned lock.
pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        tracing::warn!("recovering from poisoned rwlock (write)");
        poisoned.into_inner()
    })
}

/// Acquire a mutex guard, recovering a poisoned lock.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("recovering from poisoned mutex");
        poisoned.into_inner()
    })
}
