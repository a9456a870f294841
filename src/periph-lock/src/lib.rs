//! Serialization locks for peripheral register access.
//!
//! Several logical buses may alias one physical hardware module (SPI buses
//! distinguished only by their timing register sub-index). Register access
//! spanning more than one operation must then be mutually exclusive across
//! all aliases. The [`LockRegistry`] makes that sharing explicit: it maps a
//! physical module index to one [`BusLock`], constructed once per board and
//! looked up by every aliasing logical instance.

#![cfg_attr(not(test), no_std)]

use core::cell::UnsafeCell;

use periph_conf::ConfigError;

/// A basic locking object guarding one physical module.
///
/// There is no scheduler in scope, so there is no blocking acquire: a
/// contended lock surfaces as [`BusLock::try_acquire`] returning `None` and
/// the caller decides whether to retry or give up.
pub struct BusLock {
    locked: UnsafeCell<bool>,
}

// State is only touched inside critical sections.
unsafe impl Sync for BusLock {}

impl BusLock {
    /// Creates a new **unlocked** lock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: UnsafeCell::new(false),
        }
    }

    /// Returns the current lock state.
    pub fn is_locked(&self) -> bool {
        critical_section::with(|_| unsafe { *self.locked.get() })
    }

    /// Takes the lock (non-blocking).
    ///
    /// Returns a guard releasing the lock on drop, so every exit path of a
    /// multi-operation transfer, error returns included, releases it.
    pub fn try_acquire(&self) -> Option<BusGuard<'_>> {
        critical_section::with(|_| {
            let state = unsafe { &mut *self.locked.get() };
            if *state {
                None
            } else {
                *state = true;
                Some(BusGuard { lock: self })
            }
        })
    }

    fn release(&self) {
        critical_section::with(|_| {
            let state = unsafe { &mut *self.locked.get() };
            *state = false;
        });
    }
}

impl Default for BusLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds a [`BusLock`]; dropping it releases the lock.
#[must_use = "dropping the guard releases the bus lock"]
pub struct BusGuard<'a> {
    lock: &'a BusLock,
}

impl Drop for BusGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

/// Explicit mapping from physical module identity to its shared lock.
///
/// `N` is the number of physical modules of the board, not the number of
/// logical buses.
pub struct LockRegistry<const N: usize> {
    locks: [BusLock; N],
}

impl<const N: usize> LockRegistry<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locks: [const { BusLock::new() }; N],
        }
    }

    /// Resolves the lock serializing access to physical module `module`.
    ///
    /// An out-of-range module index means the board table references a
    /// module the board does not have.
    pub fn lock_for(&self, module: u8) -> Result<&BusLock, ConfigError> {
        self.locks
            .get(usize::from(module))
            .ok_or(ConfigError::UnknownModule { module })
    }

    #[must_use]
    pub const fn modules(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for LockRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_release_cycle() {
        let lock = BusLock::new();
        assert!(!lock.is_locked());

        let guard = lock.try_acquire().unwrap();
        assert!(lock.is_locked());

        drop(guard);
        assert!(!lock.is_locked());
    }

    #[test]
    fn held_lock_blocks_second_acquisition() {
        let lock = BusLock::new();

        let guard = lock.try_acquire().unwrap();
        assert!(lock.try_acquire().is_none());

        drop(guard);
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn guard_releases_on_early_return() {
        fn failing_transfer(lock: &BusLock) -> Result<(), ()> {
            let _guard = lock.try_acquire().ok_or(())?;
            Err(())
        }

        let lock = BusLock::new();
        assert!(failing_transfer(&lock).is_err());
        assert!(!lock.is_locked());
    }

    #[test]
    fn aliasing_modules_resolve_to_one_lock() {
        let registry: LockRegistry<2> = LockRegistry::new();

        let first = registry.lock_for(0).unwrap();
        let second = registry.lock_for(0).unwrap();
        let other = registry.lock_for(1).unwrap();

        assert!(core::ptr::eq(first, second));
        assert!(!core::ptr::eq(first, other));

        let _guard = first.try_acquire().unwrap();
        assert!(second.try_acquire().is_none());
        assert!(other.try_acquire().is_some());
    }

    #[test]
    fn unknown_module_is_a_config_error() {
        let registry: LockRegistry<1> = LockRegistry::new();
        assert!(matches!(
            registry.lock_for(1),
            Err(ConfigError::UnknownModule { module: 1 })
        ));
    }
}
