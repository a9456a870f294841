//! I2C controller-mode specifics.

use core::ops::RangeInclusive;

use periph_conf::{PinRole, SpeedClass};

/// Pin roles controller mode needs wired.
pub const REQUIRED_PINS: &[PinRole] = &[PinRole::Sda, PinRole::Scl];

/// Returns the highest speed class whose bus frequency fits into the
/// requested kHz range.
///
/// # Panics
///
/// This function is only intended to be used in a `const` context.
/// It panics if no class fits the range.
#[must_use]
pub const fn highest_speed_in(range: RangeInclusive<u32>) -> SpeedClass {
    let min = *range.start();
    let max = *range.end();

    assert!(max >= min);

    let mut class = SpeedClass::first();

    loop {
        // If not yet in the requested range
        if class.khz() < min {
            if let Some(next) = class.next() {
                class = next;
            } else {
                const_panic::concat_panic!(
                    "could not find a suitable I2C speed class: ",
                    min,
                    " kHz (minimum requested) > ",
                    class.khz(),
                    " kHz (highest available)"
                );
            }
        } else {
            break;
        }
    }

    loop {
        // If already outside of the requested range
        if class.khz() > max {
            const_panic::concat_panic!(
                "could not find a suitable I2C speed class: ",
                max,
                " kHz (maximum requested) < ",
                class.khz(),
                " kHz (lowest available)"
            );
        } else if let Some(next) = class.next() {
            // The upper bound is inclusive.
            if next.khz() <= max {
                class = next;
            } else {
                break;
            }
        } else {
            break;
        }
    }

    class
}
