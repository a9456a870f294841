//! The per-board configuration table and its startup validation.

use crate::descriptor::{Descriptor, PinRole, Timing};

/// Peripheral kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Kind {
    Adc,
    Gpio,
    I2c,
    Pwm,
    Rng,
    Rtc,
    Spi,
    Timer,
    Uart,
}

impl Kind {
    pub const COUNT: usize = 9;

    pub const ALL: [Kind; Kind::COUNT] = [
        Kind::Adc,
        Kind::Gpio,
        Kind::I2c,
        Kind::Pwm,
        Kind::Rng,
        Kind::Rtc,
        Kind::Spi,
        Kind::Timer,
        Kind::Uart,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Adc => "adc",
            Kind::Gpio => "gpio",
            Kind::I2c => "i2c",
            Kind::Pwm => "pwm",
            Kind::Rng => "rng",
            Kind::Rtc => "rtc",
            Kind::Spi => "spi",
            Kind::Timer => "timer",
            Kind::Uart => "uart",
        }
    }
}

/// Configuration-time error.
///
/// Distinct from runtime I/O errors: anything of this type means the board
/// table or a request against it is wrong, and startup should abort rather
/// than silently disable the peripheral.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Instance index is not below `count(kind)`.
    OutOfRange { kind: Kind, index: u8, count: usize },
    /// A descriptor sits in the slot of a different kind.
    KindMismatch { expected: Kind, found: Kind },
    /// Descriptor indices are not contiguous from zero.
    NonContiguousIndex { kind: Kind, position: u8, index: u8 },
    /// The descriptor's timing payload does not fit its kind.
    TimingMismatch { kind: Kind, index: u8 },
    /// The requested mode needs a pin role the board did not wire.
    MissingPin { kind: Kind, index: u8, role: PinRole },
    /// The requested mode does not apply to this kind.
    UnsupportedMode { kind: Kind },
    /// A descriptor carries more pin bindings than an instance may have.
    TooManyPins { kind: Kind, index: u8 },
    /// Computed timing divisor is zero or does not fit its register field.
    BadDivisor { kind: Kind, index: u8 },
    /// Gate word index outside the board's clock-gating register file.
    BadGateWord { word: u8 },
    /// Physical module index outside the board's lock registry.
    UnknownModule { module: u8 },
}

/// Read-only table of all configured peripheral instances of a board.
///
/// One slice per kind; instance counts derive from slice lengths, never from
/// hard-coded constants.
#[derive(Debug, Copy, Clone)]
pub struct ConfigTable {
    pub adc: &'static [Descriptor],
    pub gpio: &'static [Descriptor],
    pub i2c: &'static [Descriptor],
    pub pwm: &'static [Descriptor],
    pub rng: &'static [Descriptor],
    pub rtc: &'static [Descriptor],
    pub spi: &'static [Descriptor],
    pub timer: &'static [Descriptor],
    pub uart: &'static [Descriptor],
}

/// An empty table slot.
pub const NONE: &[Descriptor] = &[];

impl ConfigTable {
    #[must_use]
    pub const fn descriptors(&self, kind: Kind) -> &'static [Descriptor] {
        match kind {
            Kind::Adc => self.adc,
            Kind::Gpio => self.gpio,
            Kind::I2c => self.i2c,
            Kind::Pwm => self.pwm,
            Kind::Rng => self.rng,
            Kind::Rtc => self.rtc,
            Kind::Spi => self.spi,
            Kind::Timer => self.timer,
            Kind::Uart => self.uart,
        }
    }

    /// Number of configured instances of `kind`.
    #[must_use]
    pub const fn count(&self, kind: Kind) -> usize {
        self.descriptors(kind).len()
    }

    /// Resolves the descriptor of instance `index` of `kind`.
    pub fn lookup(&self, kind: Kind, index: u8) -> Result<&'static Descriptor, ConfigError> {
        self.descriptors(kind)
            .get(usize::from(index))
            .ok_or(ConfigError::OutOfRange {
                kind,
                index,
                count: self.count(kind),
            })
    }

    /// Startup validation of the whole table.
    ///
    /// Checks that every descriptor sits in the slot of its own kind, that
    /// indices are dense from zero (consumers derive counts from slice
    /// lengths) and that timing payloads fit their kinds. An invalid table
    /// must abort startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in Kind::ALL {
            for (position, desc) in self.descriptors(kind).iter().enumerate() {
                if desc.kind != kind {
                    return Err(ConfigError::KindMismatch {
                        expected: kind,
                        found: desc.kind,
                    });
                }
                // Truncation is fine here: a slice long enough to overflow
                // u8 fails the contiguity check on its 256th entry anyway.
                let position = position as u8;
                if desc.index != position {
                    return Err(ConfigError::NonContiguousIndex {
                        kind,
                        position,
                        index: desc.index,
                    });
                }
                if !timing_fits(kind, &desc.timing) {
                    return Err(ConfigError::TimingMismatch {
                        kind,
                        index: desc.index,
                    });
                }
            }
        }
        Ok(())
    }
}

const fn timing_fits(kind: Kind, timing: &Timing) -> bool {
    match kind {
        Kind::Adc => matches!(timing, Timing::Adc { .. }),
        Kind::I2c => matches!(timing, Timing::I2c { .. }),
        Kind::Pwm => matches!(timing, Timing::Pwm { .. }),
        Kind::Spi => matches!(timing, Timing::Spi { .. }),
        Kind::Timer => matches!(timing, Timing::Timer { .. }),
        Kind::Uart => matches!(timing, Timing::Uart { .. }),
        Kind::Gpio | Kind::Rng | Kind::Rtc => matches!(timing, Timing::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ClockId, DeviceHandle, UartVariant};
    use crate::speed::SpeedClass;

    const fn uart(index: u8) -> Descriptor {
        Descriptor {
            kind: Kind::Uart,
            index,
            device: DeviceHandle(0x4006_A000 + 0x1000 * index as usize),
            clock: ClockId::new(3, 10 + index),
            pins: &[],
            irq: None,
            timing: Timing::Uart {
                variant: UartVariant::Basic,
                oversample: 16,
                clock_hz: 60_000_000,
            },
        }
    }

    const fn i2c(index: u8) -> Descriptor {
        Descriptor {
            kind: Kind::I2c,
            index,
            device: DeviceHandle(0x4006_6000),
            clock: ClockId::new(3, 6),
            pins: &[],
            irq: None,
            timing: Timing::I2c {
                speed: SpeedClass::Fast,
            },
        }
    }

    const EMPTY: ConfigTable = ConfigTable {
        adc: NONE,
        gpio: NONE,
        i2c: NONE,
        pwm: NONE,
        rng: NONE,
        rtc: NONE,
        spi: NONE,
        timer: NONE,
        uart: NONE,
    };

    #[test]
    fn count_matches_supplied_descriptors() {
        static UARTS: [Descriptor; 2] = [uart(0), uart(1)];
        let table = ConfigTable {
            uart: &UARTS,
            ..EMPTY
        };

        assert_eq!(table.count(Kind::Uart), 2);
        assert_eq!(table.count(Kind::Spi), 0);
    }

    #[test]
    fn lookup_succeeds_below_count_and_fails_above() {
        static UARTS: [Descriptor; 2] = [uart(0), uart(1)];
        let table = ConfigTable {
            uart: &UARTS,
            ..EMPTY
        };

        for index in 0..2 {
            let desc = table.lookup(Kind::Uart, index).unwrap();
            assert_eq!(desc.index, index);
        }
        assert!(matches!(
            table.lookup(Kind::Uart, 2),
            Err(ConfigError::OutOfRange {
                kind: Kind::Uart,
                index: 2,
                count: 2
            })
        ));
        assert!(matches!(
            table.lookup(Kind::Rng, 0),
            Err(ConfigError::OutOfRange {
                kind: Kind::Rng,
                index: 0,
                count: 0
            })
        ));
    }

    #[test]
    fn validate_accepts_dense_table() {
        static UARTS: [Descriptor; 2] = [uart(0), uart(1)];
        static I2CS: [Descriptor; 1] = [i2c(0)];
        let table = ConfigTable {
            uart: &UARTS,
            i2c: &I2CS,
            ..EMPTY
        };

        assert_eq!(table.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_index_gap() {
        static UARTS: [Descriptor; 2] = [uart(0), uart(2)];
        let table = ConfigTable {
            uart: &UARTS,
            ..EMPTY
        };

        assert_eq!(
            table.validate(),
            Err(ConfigError::NonContiguousIndex {
                kind: Kind::Uart,
                position: 1,
                index: 2
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_index() {
        static UARTS: [Descriptor; 2] = [uart(0), uart(0)];
        let table = ConfigTable {
            uart: &UARTS,
            ..EMPTY
        };

        assert!(matches!(
            table.validate(),
            Err(ConfigError::NonContiguousIndex { .. })
        ));
    }

    #[test]
    fn validate_rejects_descriptor_in_wrong_slot() {
        static STRAY: [Descriptor; 1] = [uart(0)];
        let table = ConfigTable {
            spi: &STRAY,
            ..EMPTY
        };

        assert_eq!(
            table.validate(),
            Err(ConfigError::KindMismatch {
                expected: Kind::Spi,
                found: Kind::Uart
            })
        );
    }

    #[test]
    fn validate_rejects_foreign_timing_payload() {
        static BAD: [Descriptor; 1] = [Descriptor {
            timing: Timing::None,
            ..i2c(0)
        }];
        let table = ConfigTable { i2c: &BAD, ..EMPTY };

        assert_eq!(
            table.validate(),
            Err(ConfigError::TimingMismatch {
                kind: Kind::I2c,
                index: 0
            })
        );
    }
}
