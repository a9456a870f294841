//! The uniform initialization protocol.
//!
//! Every peripheral kind goes through the same five steps, strictly in
//! order:
//!
//! 1. resolve the descriptor, failing fast on an out-of-range index,
//! 2. open the peripheral block's own clock gate,
//! 3. per pin binding: open the owning bank's gate, then apply the
//!    alternate-function selector,
//! 4. program the timing/mode registers resolved from descriptor fields,
//! 5. bind the interrupt handler and unmask the vector, last, so the
//!    interrupt never observes a half-configured peripheral.
//!
//! A sequence failing midway drops its [`periph_clock::GateGuard`]s and
//! gives every gate share it took back. Gates are holder-counted, so a
//! failure (or a later de-init) never powers down a bank or module another
//! live instance still holds. De-init reverses the order: mask the vector
//! and drop the handler binding first, then release the gate shares.

use heapless::Vec;
use periph_clock::{GateFile, GateGuard};
use periph_conf::{timing_codes, ConfigError, ConfigTable, Descriptor, Kind, PinRole, Timing};

use crate::irq::{IrqError, IrqTable};
use crate::ops::{InitOps, TimingRegs};
use crate::{i2c, spi, uart};

/// Upper bound of pin bindings a single instance may carry.
pub const MAX_PINS: usize = 8;

/// Requested operating mode, deciding which pin roles must be wired and how
/// descriptor timing fields resolve.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Kinds without mode-specific configuration (ADC, GPIO, PWM, RNG, RTC,
    /// Timer).
    Default,
    I2cController,
    SpiMain,
    UartFullDuplex { baud: u32 },
    UartTxOnly { baud: u32 },
}

/// Error out of init/de-init.
///
/// Configuration errors mean the board table or the request is wrong and
/// startup should abort; hardware errors come out of the MCU layer.
#[derive(Debug, PartialEq, Eq)]
pub enum InitError<E> {
    Config(ConfigError),
    Irq(IrqError),
    Hardware(E),
}

impl<E> From<ConfigError> for InitError<E> {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl<E> From<IrqError> for InitError<E> {
    fn from(err: IrqError) -> Self {
        Self::Irq(err)
    }
}

/// A successfully initialized instance; consumed by [`deinit`].
#[derive(Debug)]
pub struct Instance {
    desc: &'static Descriptor,
}

impl Instance {
    #[must_use]
    pub fn descriptor(&self) -> &'static Descriptor {
        self.desc
    }
}

/// Initializes instance `index` of `kind` for `mode`.
///
/// Runs in non-interrupt context. Reconfiguring a live instance requires
/// de-initializing it first (which masks its vector); the engine otherwise
/// never exposes a half-configured peripheral to its own interrupt.
pub fn init<const W: usize, const V: usize, O: InitOps>(
    table: &ConfigTable,
    gates: &GateFile<W>,
    irqs: &IrqTable<V>,
    kind: Kind,
    index: u8,
    mode: Mode,
    ops: &mut O,
) -> Result<Instance, InitError<O::Error>> {
    // Step 1: fail fast before anything touches hardware.
    let desc = table.lookup(kind, index)?;
    let regs = resolve_timing(desc, mode)?;
    check_pins(desc, mode)?;

    // Step 2: the block's own gate; released again if a later step fails.
    let block_gate = gates.acquire(desc.clock)?;

    // Step 3: bank gates and alternate functions, in table order.
    let mut bank_gates: Vec<GateGuard<'_, W>, MAX_PINS> = Vec::new();
    for binding in desc.pins {
        let bank_gate = gates.acquire(binding.bank_clock)?;
        ops.apply_alt_fn(binding.pin, binding.alt_fn)
            .map_err(InitError::Hardware)?;
        bank_gates
            .push(bank_gate)
            .map_err(|_| ConfigError::TooManyPins { kind, index })?;
    }

    // Step 4.
    ops.program_timing(desc.device, &regs)
        .map_err(InitError::Hardware)?;

    // Step 5: interrupt identity, only now that the instance is whole.
    if let Some(irq) = desc.irq {
        irqs.bind(irq.vector, irq.handler)?;
        if let Err(err) = ops.enable_interrupt(irq.vector) {
            irqs.unbind(irq.vector);
            return Err(InitError::Hardware(err));
        }
    }

    block_gate.keep();
    for bank_gate in bank_gates {
        bank_gate.keep();
    }
    Ok(Instance { desc })
}

/// Tears an instance down, reversing [`init`].
///
/// The vector is masked and unbound before any gate share goes back,
/// pairing the acquires from init. A bank or module shared with a
/// still-live instance keeps its clock; only the last holder powers it
/// down.
///
/// A hardware error while masking the vector does not stop the teardown:
/// the handler is unbound and the gate shares released regardless, and the
/// error reported afterwards. The instance is gone either way.
pub fn deinit<const W: usize, const V: usize, O: InitOps>(
    instance: Instance,
    gates: &GateFile<W>,
    irqs: &IrqTable<V>,
    ops: &mut O,
) -> Result<(), InitError<O::Error>> {
    let desc = instance.desc;
    let mut masked = Ok(());
    if let Some(irq) = desc.irq {
        masked = ops.disable_interrupt(irq.vector);
        irqs.unbind(irq.vector);
    }
    for binding in desc.pins.iter().rev() {
        gates.release(binding.bank_clock)?;
    }
    gates.release(desc.clock)?;
    masked.map_err(InitError::Hardware)
}

fn required_roles(mode: Mode) -> &'static [PinRole] {
    match mode {
        Mode::Default => &[],
        Mode::I2cController => i2c::REQUIRED_PINS,
        Mode::SpiMain => spi::REQUIRED_PINS,
        Mode::UartFullDuplex { .. } => uart::FULL_DUPLEX_PINS,
        Mode::UartTxOnly { .. } => uart::TX_ONLY_PINS,
    }
}

fn check_pins(desc: &Descriptor, mode: Mode) -> Result<(), ConfigError> {
    for role in required_roles(mode) {
        if desc.pin(*role).is_none() {
            return Err(ConfigError::MissingPin {
                kind: desc.kind,
                index: desc.index,
                role: *role,
            });
        }
    }
    Ok(())
}

/// Resolves descriptor timing fields into the register image of step 4.
///
/// A mode that does not fit the descriptor's kind is a configuration error.
fn resolve_timing(desc: &Descriptor, mode: Mode) -> Result<TimingRegs, ConfigError> {
    match (desc.timing, mode) {
        (Timing::None, Mode::Default) => Ok(TimingRegs::None),
        (Timing::Adc { resolution_bits }, Mode::Default) => {
            Ok(TimingRegs::Adc { resolution_bits })
        }
        (Timing::Pwm { channels }, Mode::Default) => Ok(TimingRegs::Pwm { channels }),
        (Timing::Timer { prescaler }, Mode::Default) => Ok(TimingRegs::Timer { prescaler }),
        (Timing::I2c { speed }, Mode::I2cController) => {
            let codes = timing_codes(speed);
            Ok(TimingRegs::I2c {
                divider: codes.divider,
                multiplier: codes.multiplier,
            })
        }
        (
            Timing::Spi {
                timing_slot,
                divider,
                ..
            },
            Mode::SpiMain,
        ) => Ok(TimingRegs::Spi {
            timing_slot,
            divider,
        }),
        (
            Timing::Uart {
                oversample,
                clock_hz,
                ..
            },
            Mode::UartFullDuplex { baud } | Mode::UartTxOnly { baud },
        ) => uart::divisor(clock_hz, oversample, baud)
            .map(|divisor| TimingRegs::Uart {
                divisor,
                oversample,
            })
            .ok_or(ConfigError::BadDivisor {
                kind: desc.kind,
                index: desc.index,
            }),
        _ => Err(ConfigError::UnsupportedMode { kind: desc.kind }),
    }
}
