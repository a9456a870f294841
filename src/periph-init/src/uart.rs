//! UART specifics.

use periph_conf::PinRole;

pub const FULL_DUPLEX_PINS: &[PinRole] = &[PinRole::Rx, PinRole::Tx];
pub const TX_ONLY_PINS: &[PinRole] = &[PinRole::Tx];

/// Computes the baud-rate divisor for a module clocked at `clock_hz`.
///
/// The oversampling factor comes from the descriptor's hardware sub-variant
/// field. Returns `None` when the divisor would be zero or would not fit the
/// register field; the engine reports that as a configuration error.
#[must_use]
pub const fn divisor(clock_hz: u32, oversample: u8, baud: u32) -> Option<u16> {
    if oversample == 0 {
        return None;
    }
    let per_bit = match baud.checked_mul(oversample as u32) {
        Some(per_bit) => per_bit,
        None => return None,
    };
    if per_bit == 0 {
        return None;
    }
    let divisor = clock_hz / per_bit;
    if divisor == 0 || divisor > u16::MAX as u32 {
        None
    } else {
        Some(divisor as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_baud_rates() {
        // Basic variant, 16x oversampling.
        assert_eq!(divisor(60_000_000, 16, 115_200), Some(32));
        assert_eq!(divisor(60_000_000, 16, 9_600), Some(390));
        // Low-power variant with 4x oversampling keeps slow clocks usable.
        assert_eq!(divisor(4_000_000, 4, 9_600), Some(104));
    }

    #[test]
    fn degenerate_requests_are_rejected() {
        assert_eq!(divisor(60_000_000, 0, 115_200), None);
        assert_eq!(divisor(60_000_000, 16, 0), None);
        // Baud faster than the module clock can express.
        assert_eq!(divisor(1_000_000, 16, 115_200), None);
    }
}
