//! The seam between the init engine and the MCU register layer.

use periph_conf::{DeviceHandle, Pin};

/// Resolved register image programmed during init step 4.
///
/// Descriptor fields (speed classes, sub-variant factors) have already been
/// turned into concrete register values at this point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingRegs {
    None,
    I2c { divider: u8, multiplier: u8 },
    Spi { timing_slot: u8, divider: u8 },
    Uart { divisor: u16, oversample: u8 },
    Adc { resolution_bits: u8 },
    Pwm { channels: u8 },
    Timer { prescaler: u8 },
}

/// Register-level operations the engine drives, implemented per MCU.
///
/// Errors out of these operations are runtime hardware errors, kept apart
/// from [`periph_conf::ConfigError`].
pub trait InitOps {
    type Error;

    /// Routes the peripheral signal to `pin` via its alternate-function
    /// selector. The owning bank's clock is already up when this is called.
    fn apply_alt_fn(&mut self, pin: Pin, alt_fn: u8) -> Result<(), Self::Error>;

    /// Programs the timing/mode registers of the instance's register block.
    fn program_timing(&mut self, device: DeviceHandle, regs: &TimingRegs)
        -> Result<(), Self::Error>;

    /// Unmasks the instance's interrupt vector. Called last during init.
    fn enable_interrupt(&mut self, vector: u16) -> Result<(), Self::Error>;

    /// Masks the instance's interrupt vector. Called first during de-init.
    fn disable_interrupt(&mut self, vector: u16) -> Result<(), Self::Error>;
}
