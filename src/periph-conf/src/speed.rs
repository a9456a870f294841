//! Bus speed classes and their register-encoded timing codes.

/// Named target bus frequency class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedClass {
    /// 10 kHz.
    Low,
    /// 100 kHz.
    Normal,
    /// 400 kHz.
    Fast,
    /// 1 MHz.
    FastPlus,
}

impl SpeedClass {
    /// Target bus frequency in kHz.
    #[must_use]
    pub const fn khz(self) -> u32 {
        match self {
            Self::Low => 10,
            Self::Normal => 100,
            Self::Fast => 400,
            Self::FastPlus => 1000,
        }
    }

    /// Slowest class.
    #[must_use]
    pub const fn first() -> Self {
        Self::Low
    }

    /// Next faster class, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Low => Some(Self::Normal),
            Self::Normal => Some(Self::Fast),
            Self::Fast => Some(Self::FastPlus),
            Self::FastPlus => None,
        }
    }
}

/// Divider/multiplier register pair for one speed class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingCodes {
    pub divider: u8,
    pub multiplier: u8,
}

/// Maps a speed class to its `(divider, multiplier)` register pair.
///
/// The divider is a non-linear register encoding, so this is a fixed lookup
/// table rather than a computed formula.
#[must_use]
pub const fn timing_codes(class: SpeedClass) -> TimingCodes {
    match class {
        SpeedClass::Low => TimingCodes {
            divider: 0x3D,
            multiplier: 2,
        },
        SpeedClass::Normal => TimingCodes {
            divider: 0x2F,
            multiplier: 1,
        },
        SpeedClass::Fast => TimingCodes {
            divider: 0x17,
            multiplier: 0,
        },
        SpeedClass::FastPlus => TimingCodes {
            divider: 0x0D,
            multiplier: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_code_pairs() {
        assert_eq!(
            timing_codes(SpeedClass::Low),
            TimingCodes {
                divider: 0x3D,
                multiplier: 2
            }
        );
        assert_eq!(
            timing_codes(SpeedClass::Normal),
            TimingCodes {
                divider: 0x2F,
                multiplier: 1
            }
        );
        assert_eq!(
            timing_codes(SpeedClass::Fast),
            TimingCodes {
                divider: 0x17,
                multiplier: 0
            }
        );
        assert_eq!(
            timing_codes(SpeedClass::FastPlus),
            TimingCodes {
                divider: 0x0D,
                multiplier: 0
            }
        );
    }

    #[test]
    fn classes_are_ordered_by_frequency() {
        let mut class = SpeedClass::first();
        while let Some(next) = class.next() {
            assert!(next.khz() > class.khz());
            class = next;
        }
    }
}
