//! The interrupt handler registry.
//!
//! Maps interrupt vectors to the handler functions named by the descriptors.
//! The first-level trampoline of the MCU layer calls [`IrqTable::dispatch`];
//! handlers must be non-blocking and return promptly, and they run outside
//! any critical section.

use core::cell::UnsafeCell;

use portable_atomic::{AtomicU32, Ordering};

/// Default vector capacity, overridable at build time through the
/// `PERIPH_IRQ_SLOTS` environment variable.
pub const DEFAULT_SLOTS: usize = periph_utils::usize_from_env_or!("PERIPH_IRQ_SLOTS", 64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqError {
    /// The vector already has a handler; unbind it first.
    AlreadyBound { vector: u16 },
    /// The vector lies outside the table.
    VectorOutOfRange { vector: u16 },
}

/// Fixed-size vector-to-handler table.
pub struct IrqTable<const N: usize = DEFAULT_SLOTS> {
    handlers: UnsafeCell<[Option<fn()>; N]>,
    missed: AtomicU32,
}

// Handler slots are only touched inside critical sections.
unsafe impl<const N: usize> Sync for IrqTable<N> {}

impl<const N: usize> IrqTable<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handlers: UnsafeCell::new([None; N]),
            missed: AtomicU32::new(0),
        }
    }

    /// Binds `handler` to `vector`.
    ///
    /// Double-binding is rejected; a vector must be unbound before a new
    /// handler may take it over.
    pub fn bind(&self, vector: u16, handler: fn()) -> Result<(), IrqError> {
        critical_section::with(|_| {
            let handlers = unsafe { &mut *self.handlers.get() };
            let slot = handlers
                .get_mut(usize::from(vector))
                .ok_or(IrqError::VectorOutOfRange { vector })?;
            if slot.is_some() {
                return Err(IrqError::AlreadyBound { vector });
            }
            *slot = Some(handler);
            Ok(())
        })
    }

    /// Removes the binding of `vector`, returning the previous handler.
    pub fn unbind(&self, vector: u16) -> Option<fn()> {
        critical_section::with(|_| {
            let handlers = unsafe { &mut *self.handlers.get() };
            handlers.get_mut(usize::from(vector)).and_then(Option::take)
        })
    }

    pub fn is_bound(&self, vector: u16) -> bool {
        critical_section::with(|_| {
            let handlers = unsafe { &*self.handlers.get() };
            matches!(handlers.get(usize::from(vector)), Some(Some(_)))
        })
    }

    /// Services one hardware event.
    ///
    /// A dispatch against an unbound vector is counted, not fatal: the
    /// vector may fire once more between masking it and clearing a pending
    /// flag during de-init.
    pub fn dispatch(&self, vector: u16) {
        let handler = critical_section::with(|_| {
            let handlers = unsafe { &*self.handlers.get() };
            handlers.get(usize::from(vector)).copied().flatten()
        });
        match handler {
            Some(handler) => handler(),
            None => {
                self.missed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of dispatches that found no handler.
    pub fn missed(&self) -> u32 {
        self.missed.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for IrqTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
