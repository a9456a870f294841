//! Per-instance peripheral descriptors.

use crate::table::Kind;

/// Identity of a physical register block.
///
/// Opaque to this crate; the MCU layer decides whether this is a base
/// address or some other handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceHandle(pub usize);

/// Position of one gate bit inside the clock-gating register file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockId {
    /// Gate register word index.
    pub word: u8,
    /// Bit index inside that word.
    pub bit: u8,
}

impl ClockId {
    #[must_use]
    pub const fn new(word: u8, bit: u8) -> Self {
        Self { word, bit }
    }
}

/// A physical pin, identified by its bank and position within the bank.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    pub bank: u8,
    pub pin: u8,
}

impl Pin {
    #[must_use]
    pub const fn new(bank: u8, pin: u8) -> Self {
        Self { bank, pin }
    }
}

/// Function a pin fulfills within a peripheral instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    Rx,
    Tx,
    Sda,
    Scl,
    Sck,
    Mosi,
    Miso,
    Cs,
    Analog,
    Pulse,
    Io,
}

/// One pin-to-function binding.
///
/// Each binding names the clock gate of its owning pin bank; the bank clock
/// must be up before the alternate-function selector can be applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinBinding {
    pub role: PinRole,
    pub pin: Pin,
    /// Alternate-function selector routing the peripheral signal to the pin.
    pub alt_fn: u8,
    /// Clock gate of the bank owning this pin.
    pub bank_clock: ClockId,
}

/// Interrupt identity of an instance: the vector to enable and the handler
/// bound to it.
#[derive(Copy, Clone)]
pub struct IrqBinding {
    pub vector: u16,
    pub handler: fn(),
}

impl core::fmt::Debug for IrqBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IrqBinding")
            .field("vector", &self.vector)
            .finish_non_exhaustive()
    }
}

/// UART hardware sub-variant.
///
/// The sub-variants differ in how the baud-rate divisor relates to the
/// module clock; the descriptor carries the oversampling factor so the
/// divisor computation stays uniform.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartVariant {
    /// Full-featured UART module, fixed 16x oversampling.
    Basic,
    /// Low-power UART module with configurable oversampling.
    LowPower,
}

/// Kind-specific timing/mode register payload of a descriptor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timing {
    /// No timing fields (GPIO, RNG, RTC).
    None,
    I2c {
        speed: crate::speed::SpeedClass,
    },
    Spi {
        /// Physical hardware module index. Logical buses sharing a module
        /// share its serialization lock.
        module: u8,
        /// Timing register sub-index within the module.
        timing_slot: u8,
        /// Register-encoded clock divider.
        divider: u8,
    },
    Uart {
        variant: UartVariant,
        /// Baud-rate factor; 16 for [`UartVariant::Basic`].
        oversample: u8,
        /// Module clock feeding the baud-rate generator, in Hz.
        clock_hz: u32,
    },
    Adc {
        resolution_bits: u8,
    },
    Pwm {
        channels: u8,
    },
    Timer {
        prescaler: u8,
    },
}

/// Static record fully specifying one peripheral instance's wiring.
///
/// Descriptors are fixed at configuration time; driver state built from a
/// descriptor is created at init, mutated only by the driver itself and torn
/// down by an explicit de-init.
#[derive(Debug, Copy, Clone)]
pub struct Descriptor {
    pub kind: Kind,
    /// Dense, zero-based index among instances of the same kind.
    pub index: u8,
    pub device: DeviceHandle,
    /// Clock gate of the peripheral block itself.
    pub clock: ClockId,
    pub pins: &'static [PinBinding],
    pub irq: Option<IrqBinding>,
    pub timing: Timing,
}

impl Descriptor {
    /// Returns the binding fulfilling `role`, if the board wired one.
    #[must_use]
    pub fn pin(&self, role: PinRole) -> Option<&PinBinding> {
        self.pins.iter().find(|binding| binding.role == role)
    }
}
