//! SPI main-mode specifics.
//!
//! Logical SPI buses may alias one physical module, distinguished only by
//! their timing register sub-index. Any register access spanning more than
//! one operation must hold the module's serialization lock, resolved through
//! the board's [`LockRegistry`] by physical module index, never by the
//! logical bus index.

use periph_conf::{ConfigError, Descriptor, PinRole, Timing};
use periph_lock::{BusLock, LockRegistry};

/// Pin roles main mode needs wired. Chip select is per device, not per bus.
pub const REQUIRED_PINS: &[PinRole] = &[PinRole::Sck, PinRole::Mosi, PinRole::Miso];

/// Error out of a bus acquisition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquireError {
    /// Another logical bus aliasing the module holds the lock.
    Busy,
    Config(ConfigError),
}

/// Resolves the lock serializing the physical module behind `desc`.
pub fn lock_for<'a, const N: usize>(
    registry: &'a LockRegistry<N>,
    desc: &Descriptor,
) -> Result<&'a BusLock, ConfigError> {
    match desc.timing {
        Timing::Spi { module, .. } => registry.lock_for(module),
        _ => Err(ConfigError::UnsupportedMode { kind: desc.kind }),
    }
}

/// Runs `transfer` with the physical module's lock held.
///
/// The lock is released on every exit path, the error ones included.
pub fn with_bus<const N: usize, R>(
    registry: &LockRegistry<N>,
    desc: &Descriptor,
    transfer: impl FnOnce() -> R,
) -> Result<R, AcquireError> {
    let lock = lock_for(registry, desc).map_err(AcquireError::Config)?;
    let _guard = lock.try_acquire().ok_or(AcquireError::Busy)?;
    Ok(transfer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use periph_conf::{ClockId, DeviceHandle, Kind};

    const fn bus(index: u8, timing_slot: u8) -> Descriptor {
        Descriptor {
            kind: Kind::Spi,
            index,
            device: DeviceHandle(0x4002_C000),
            clock: ClockId::new(3, 12),
            pins: &[],
            irq: None,
            timing: Timing::Spi {
                module: 0,
                timing_slot,
                divider: 0x02,
            },
        }
    }

    #[test]
    fn aliasing_buses_serialize_through_one_lock() {
        let registry: LockRegistry<1> = LockRegistry::new();
        let bus_a = bus(0, 0);
        let bus_b = bus(1, 1);

        let lock_a = lock_for(&registry, &bus_a).unwrap();
        let lock_b = lock_for(&registry, &bus_b).unwrap();
        assert!(core::ptr::eq(lock_a, lock_b));

        let guard = lock_a.try_acquire().unwrap();
        assert_eq!(
            with_bus(&registry, &bus_b, || ()).unwrap_err(),
            AcquireError::Busy
        );
        drop(guard);

        assert!(with_bus(&registry, &bus_b, || ()).is_ok());
    }

    #[test]
    fn lock_is_released_after_a_transfer() {
        let registry: LockRegistry<1> = LockRegistry::new();
        let bus_a = bus(0, 0);

        let words = with_bus(&registry, &bus_a, || 3usize).unwrap();
        assert_eq!(words, 3);
        assert!(!registry.lock_for(0).unwrap().is_locked());
    }

    #[test]
    fn non_spi_descriptor_cannot_resolve_a_lock() {
        let registry: LockRegistry<1> = LockRegistry::new();
        let not_spi = Descriptor {
            kind: Kind::Rng,
            timing: Timing::None,
            ..bus(0, 0)
        };

        assert!(matches!(
            lock_for(&registry, &not_spi),
            Err(ConfigError::UnsupportedMode { kind: Kind::Rng })
        ));
    }
}
