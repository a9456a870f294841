//! FR64 devkit: a K64-class development board.
//!
//! Gate words map onto the MCU's clock-gating registers: word 2 carries the
//! pin bank gates, word 3 the peripheral block gates.

use periph_clock::GateFile;
use periph_conf::{
    ClockId, ConfigTable, Descriptor, DeviceHandle, IrqBinding, Kind, Pin, PinBinding, PinRole,
    SpeedClass, Timing, UartVariant,
};
use periph_lock::LockRegistry;
use portable_atomic::{AtomicU32, Ordering};

/// Words in the clock-gating register file.
pub const GATE_WORDS: usize = 4;
/// Physical SPI modules; both logical buses alias module 0.
pub const SPI_MODULES: usize = 1;
/// Interrupt vectors the MCU provides.
pub const IRQ_SLOTS: usize = 64;

pub static GATES: GateFile<GATE_WORDS> = GateFile::new();
pub static SPI_LOCKS: LockRegistry<SPI_MODULES> = LockRegistry::new();

const PORT_B: ClockId = ClockId::new(2, 10);
const PORT_C: ClockId = ClockId::new(2, 11);
const PORT_E: ClockId = ClockId::new(2, 13);

// Handlers count events until a driver claims the instance and services
// RX/TX itself.
macro_rules! event_handlers {
    ($( $handler:ident => $counter:ident ),* $(,)?) => {
        $(
            static $counter: AtomicU32 = AtomicU32::new(0);
            fn $handler() {
                $counter.fetch_add(1, Ordering::Relaxed);
            }
        )*
    };
}

event_handlers! {
    adc0_isr => ADC0_EVENTS,
    porta_isr => PORTA_EVENTS,
    portb_isr => PORTB_EVENTS,
    i2c0_isr => I2C0_EVENTS,
    rtc_isr => RTC_EVENTS,
    spi0_isr => SPI0_EVENTS,
    timer0_isr => TIMER0_EVENTS,
    timer1_isr => TIMER1_EVENTS,
    uart0_isr => UART0_EVENTS,
    uart1_isr => UART1_EVENTS,
}

const ADC: [Descriptor; 1] = [Descriptor {
    kind: Kind::Adc,
    index: 0,
    device: DeviceHandle(0x4003_B000),
    clock: ClockId::new(3, 27),
    pins: &[PinBinding {
        role: PinRole::Analog,
        pin: Pin::new(1, 2),
        alt_fn: 0,
        bank_clock: PORT_B,
    }],
    irq: Some(IrqBinding {
        vector: 39,
        handler: adc0_isr,
    }),
    timing: Timing::Adc {
        resolution_bits: 16,
    },
}];

const GPIO: [Descriptor; 2] = [
    Descriptor {
        kind: Kind::Gpio,
        index: 0,
        device: DeviceHandle(0x4004_9000),
        clock: ClockId::new(2, 9),
        pins: &[],
        irq: Some(IrqBinding {
            vector: 59,
            handler: porta_isr,
        }),
        timing: Timing::None,
    },
    Descriptor {
        kind: Kind::Gpio,
        index: 1,
        device: DeviceHandle(0x4004_A000),
        clock: PORT_B,
        pins: &[],
        irq: Some(IrqBinding {
            vector: 60,
            handler: portb_isr,
        }),
        timing: Timing::None,
    },
];

const I2C: [Descriptor; 1] = [Descriptor {
    kind: Kind::I2c,
    index: 0,
    device: DeviceHandle(0x4006_6000),
    clock: ClockId::new(3, 6),
    pins: &[
        PinBinding {
            role: PinRole::Sda,
            pin: Pin::new(4, 25),
            alt_fn: 5,
            bank_clock: PORT_E,
        },
        PinBinding {
            role: PinRole::Scl,
            pin: Pin::new(4, 24),
            alt_fn: 5,
            bank_clock: PORT_E,
        },
    ],
    irq: Some(IrqBinding {
        vector: 24,
        handler: i2c0_isr,
    }),
    timing: Timing::I2c {
        speed: SpeedClass::Fast,
    },
}];

const PWM: [Descriptor; 1] = [Descriptor {
    kind: Kind::Pwm,
    index: 0,
    device: DeviceHandle(0x4003_8000),
    clock: ClockId::new(3, 24),
    pins: &[PinBinding {
        role: PinRole::Pulse,
        pin: Pin::new(2, 1),
        alt_fn: 4,
        bank_clock: PORT_C,
    }],
    irq: None,
    timing: Timing::Pwm { channels: 8 },
}];

const RNG: [Descriptor; 1] = [Descriptor {
    kind: Kind::Rng,
    index: 0,
    device: DeviceHandle(0x4002_9000),
    clock: ClockId::new(3, 9),
    pins: &[],
    irq: None,
    timing: Timing::None,
}];

const RTC: [Descriptor; 1] = [Descriptor {
    kind: Kind::Rtc,
    index: 0,
    device: DeviceHandle(0x4003_D000),
    clock: ClockId::new(3, 29),
    pins: &[],
    irq: Some(IrqBinding {
        vector: 46,
        handler: rtc_isr,
    }),
    timing: Timing::None,
}];

const SPI_PINS: &[PinBinding] = &[
    PinBinding {
        role: PinRole::Sck,
        pin: Pin::new(2, 5),
        alt_fn: 2,
        bank_clock: PORT_C,
    },
    PinBinding {
        role: PinRole::Mosi,
        pin: Pin::new(2, 6),
        alt_fn: 2,
        bank_clock: PORT_C,
    },
    PinBinding {
        role: PinRole::Miso,
        pin: Pin::new(2, 7),
        alt_fn: 2,
        bank_clock: PORT_C,
    },
];

// Two logical buses on one physical module, differing only in their timing
// register sub-index; the module's vector belongs to bus 0.
const SPI: [Descriptor; 2] = [
    Descriptor {
        kind: Kind::Spi,
        index: 0,
        device: DeviceHandle(0x4002_C000),
        clock: ClockId::new(3, 12),
        pins: SPI_PINS,
        irq: Some(IrqBinding {
            vector: 26,
            handler: spi0_isr,
        }),
        timing: Timing::Spi {
            module: 0,
            timing_slot: 0,
            divider: 0x02,
        },
    },
    Descriptor {
        kind: Kind::Spi,
        index: 1,
        device: DeviceHandle(0x4002_C000),
        clock: ClockId::new(3, 12),
        pins: SPI_PINS,
        irq: None,
        timing: Timing::Spi {
            module: 0,
            timing_slot: 1,
            divider: 0x04,
        },
    },
];

const TIMER: [Descriptor; 2] = [
    Descriptor {
        kind: Kind::Timer,
        index: 0,
        device: DeviceHandle(0x4003_7100),
        clock: ClockId::new(3, 23),
        pins: &[],
        irq: Some(IrqBinding {
            vector: 48,
            handler: timer0_isr,
        }),
        timing: Timing::Timer { prescaler: 0 },
    },
    Descriptor {
        kind: Kind::Timer,
        index: 1,
        device: DeviceHandle(0x4003_7110),
        clock: ClockId::new(3, 23),
        pins: &[],
        irq: Some(IrqBinding {
            vector: 49,
            handler: timer1_isr,
        }),
        timing: Timing::Timer { prescaler: 0 },
    },
];

const UART: [Descriptor; 2] = [
    Descriptor {
        kind: Kind::Uart,
        index: 0,
        device: DeviceHandle(0x4006_A000),
        clock: ClockId::new(3, 10),
        pins: &[
            PinBinding {
                role: PinRole::Rx,
                pin: Pin::new(1, 16),
                alt_fn: 3,
                bank_clock: PORT_B,
            },
            PinBinding {
                role: PinRole::Tx,
                pin: Pin::new(1, 17),
                alt_fn: 3,
                bank_clock: PORT_B,
            },
        ],
        irq: Some(IrqBinding {
            vector: 31,
            handler: uart0_isr,
        }),
        timing: Timing::Uart {
            variant: UartVariant::Basic,
            oversample: 16,
            clock_hz: 60_000_000,
        },
    },
    Descriptor {
        kind: Kind::Uart,
        index: 1,
        device: DeviceHandle(0x4006_B000),
        clock: ClockId::new(3, 11),
        pins: &[
            PinBinding {
                role: PinRole::Rx,
                pin: Pin::new(4, 1),
                alt_fn: 3,
                bank_clock: PORT_E,
            },
            PinBinding {
                role: PinRole::Tx,
                pin: Pin::new(4, 0),
                alt_fn: 3,
                bank_clock: PORT_E,
            },
        ],
        irq: Some(IrqBinding {
            vector: 33,
            handler: uart1_isr,
        }),
        timing: Timing::Uart {
            variant: UartVariant::LowPower,
            oversample: 4,
            clock_hz: 4_000_000,
        },
    },
];

pub const TABLE: ConfigTable = ConfigTable {
    adc: &ADC,
    gpio: &GPIO,
    i2c: &I2C,
    pwm: &PWM,
    rng: &RNG,
    rtc: &RTC,
    spi: &SPI,
    timer: &TIMER,
    uart: &UART,
};

/// Validates the wiring table. Called once at startup, before any driver
/// resolves descriptors; an invalid table aborts right here.
pub fn init() {
    if TABLE.validate().is_err() {
        panic!("invalid peripheral configuration table");
    }
}
