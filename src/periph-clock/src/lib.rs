//! Typed access to the clock-gating register file.
//!
//! Each peripheral (and each pin bank) owns one gate bit identified by a
//! [`ClockId`]. Gate bits are set and cleared through atomic bit operations
//! on whole words, so two peripherals sharing a gate word can never lose
//! each other's updates to a read-modify-write race.
//!
//! Gates themselves are shared as well: a pin bank feeds several
//! peripherals and logical buses alias one physical module. Instance
//! lifecycles therefore go through the holder-counted
//! [`GateFile::acquire`]/[`GateFile::release`] pair, which opens a gate for
//! its first holder and closes it only when the last one leaves. The raw
//! [`GateFile::enable`]/[`GateFile::disable`] ops remain idempotent and
//! uncounted, for code that owns a gate outright.

#![cfg_attr(not(test), no_std)]

use periph_conf::{ClockId, ConfigError};
use portable_atomic::{AtomicU32, AtomicU8, Ordering};

const WORD_BITS: u32 = 32;

/// The clock-gating register file of a board, `WORDS` words of one gate bit
/// per peripheral.
pub struct GateFile<const WORDS: usize> {
    words: [AtomicU32; WORDS],
    holders: [[AtomicU8; WORD_BITS as usize]; WORDS],
}

impl<const WORDS: usize> GateFile<WORDS> {
    /// A gate file with every gate disabled and no holders.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: [const { AtomicU32::new(0) }; WORDS],
            holders: [const { [const { AtomicU8::new(0) }; WORD_BITS as usize] }; WORDS],
        }
    }

    fn word(&self, gate: ClockId) -> Result<&AtomicU32, ConfigError> {
        self.words
            .get(usize::from(gate.word))
            .ok_or(ConfigError::BadGateWord { word: gate.word })
    }

    fn holder(&self, gate: ClockId) -> Result<&AtomicU8, ConfigError> {
        self.holders
            .get(usize::from(gate.word))
            .and_then(|word| word.get(Self::bit(gate) as usize))
            .ok_or(ConfigError::BadGateWord { word: gate.word })
    }

    const fn bit(gate: ClockId) -> u32 {
        gate.bit as u32 % WORD_BITS
    }

    /// Opens the gate. Idempotent; enabling twice equals enabling once.
    ///
    /// Bypasses holder counting. Fails only when the gate's word index lies
    /// outside the register file, which is a board configuration error.
    pub fn enable(&self, gate: ClockId) -> Result<(), ConfigError> {
        // NOTE(ordering): setting a bit is idempotent and gates are not used
        // to publish other memory, so Relaxed suffices.
        self.word(gate)?.bit_set(Self::bit(gate), Ordering::Relaxed);
        Ok(())
    }

    /// Closes the gate, powering the peripheral down. Bypasses holder
    /// counting.
    pub fn disable(&self, gate: ClockId) -> Result<(), ConfigError> {
        self.word(gate)?
            .bit_clear(Self::bit(gate), Ordering::Relaxed);
        Ok(())
    }

    pub fn is_enabled(&self, gate: ClockId) -> Result<bool, ConfigError> {
        let word = self.word(gate)?.load(Ordering::Relaxed);
        Ok(word & (1 << Self::bit(gate)) != 0)
    }

    /// Opens the gate on behalf of one more holder and returns a guard
    /// standing for that holder's share.
    ///
    /// An init sequence that fails midway drops its guards, giving each
    /// share back; a sequence that completes calls [`GateGuard::keep`] on
    /// each guard, committing the share until a matching [`Self::release`]
    /// at de-init. Either way a gate stays open while any holder remains,
    /// so instances sharing a bank or module cannot power each other down.
    pub fn acquire(&self, gate: ClockId) -> Result<GateGuard<'_, WORDS>, ConfigError> {
        let holder = self.holder(gate)?;
        let word = self.word(gate)?;
        // The count transition and the bit flip must be one step, or a
        // holder arriving between them observes an open gate it does not
        // hold yet.
        critical_section::with(|_| {
            if holder.fetch_add(1, Ordering::Relaxed) == 0 {
                word.bit_set(Self::bit(gate), Ordering::Relaxed);
            }
        });
        Ok(GateGuard {
            file: self,
            gate,
            armed: true,
        })
    }

    /// Gives one holder's share of the gate back, closing it when that was
    /// the last one. A release with no holders outstanding leaves the gate
    /// alone.
    pub fn release(&self, gate: ClockId) -> Result<(), ConfigError> {
        let holder = self.holder(gate)?;
        let word = self.word(gate)?;
        critical_section::with(|_| {
            let count = holder.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
                count.checked_sub(1)
            });
            if count == Ok(1) {
                word.bit_clear(Self::bit(gate), Ordering::Relaxed);
            }
        });
        Ok(())
    }
}

impl<const WORDS: usize> Default for GateFile<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

/// One holder's share of a gate; given back on drop unless kept.
pub struct GateGuard<'a, const WORDS: usize> {
    file: &'a GateFile<WORDS>,
    gate: ClockId,
    armed: bool,
}

impl<const WORDS: usize> GateGuard<'_, WORDS> {
    /// Commits the share; the holder stays counted after the guard is gone,
    /// until a matching [`GateFile::release`].
    pub fn keep(mut self) {
        self.armed = false;
    }

    #[must_use]
    pub fn gate(&self) -> ClockId {
        self.gate
    }
}

impl<const WORDS: usize> Drop for GateGuard<'_, WORDS> {
    fn drop(&mut self) {
        if self.armed {
            // The word index was validated when the guard was created.
            let _ = self.file.release(self.gate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATE: ClockId = ClockId::new(1, 12);

    #[test]
    fn enable_disable_round_trip_restores_disabled_state() {
        let gates: GateFile<4> = GateFile::new();

        assert!(!gates.is_enabled(GATE).unwrap());
        gates.enable(GATE).unwrap();
        assert!(gates.is_enabled(GATE).unwrap());
        gates.disable(GATE).unwrap();
        assert!(!gates.is_enabled(GATE).unwrap());
    }

    #[test]
    fn double_enable_is_idempotent() {
        let gates: GateFile<4> = GateFile::new();

        gates.enable(GATE).unwrap();
        gates.enable(GATE).unwrap();
        assert!(gates.is_enabled(GATE).unwrap());

        gates.disable(GATE).unwrap();
        assert!(!gates.is_enabled(GATE).unwrap());
    }

    #[test]
    fn gates_in_one_word_do_not_disturb_each_other() {
        let gates: GateFile<4> = GateFile::new();
        let neighbor = ClockId::new(1, 13);

        gates.enable(GATE).unwrap();
        gates.enable(neighbor).unwrap();
        gates.disable(GATE).unwrap();

        assert!(!gates.is_enabled(GATE).unwrap());
        assert!(gates.is_enabled(neighbor).unwrap());
    }

    #[test]
    fn out_of_range_word_is_a_config_error() {
        let gates: GateFile<2> = GateFile::new();
        let bad = ClockId::new(2, 0);

        assert_eq!(
            gates.enable(bad),
            Err(ConfigError::BadGateWord { word: 2 })
        );
        assert!(matches!(
            gates.acquire(bad),
            Err(ConfigError::BadGateWord { word: 2 })
        ));
    }

    #[test]
    fn dropped_guard_closes_the_gate() {
        let gates: GateFile<4> = GateFile::new();

        {
            let _guard = gates.acquire(GATE).unwrap();
            assert!(gates.is_enabled(GATE).unwrap());
        }
        assert!(!gates.is_enabled(GATE).unwrap());
    }

    #[test]
    fn kept_guard_leaves_the_gate_open() {
        let gates: GateFile<4> = GateFile::new();

        let guard = gates.acquire(GATE).unwrap();
        guard.keep();
        assert!(gates.is_enabled(GATE).unwrap());
    }

    #[test]
    fn gate_stays_open_until_the_last_holder_releases() {
        let gates: GateFile<4> = GateFile::new();

        gates.acquire(GATE).unwrap().keep();
        gates.acquire(GATE).unwrap().keep();

        gates.release(GATE).unwrap();
        assert!(gates.is_enabled(GATE).unwrap());
        gates.release(GATE).unwrap();
        assert!(!gates.is_enabled(GATE).unwrap());
    }

    #[test]
    fn dropped_guard_gives_up_only_its_own_share() {
        let gates: GateFile<4> = GateFile::new();

        gates.acquire(GATE).unwrap().keep();
        {
            let _guard = gates.acquire(GATE).unwrap();
        }
        assert!(gates.is_enabled(GATE).unwrap());

        gates.release(GATE).unwrap();
        assert!(!gates.is_enabled(GATE).unwrap());
    }

    #[test]
    fn release_without_holders_leaves_the_gate_alone() {
        let gates: GateFile<4> = GateFile::new();

        gates.enable(GATE).unwrap();
        gates.release(GATE).unwrap();
        assert!(gates.is_enabled(GATE).unwrap());
    }
}
