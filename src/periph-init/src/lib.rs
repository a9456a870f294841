//! Uniform peripheral initialization on top of [`periph_conf`] tables.
//!
//! The [`engine`] drives the same five-step protocol for every peripheral
//! kind; [`irq`] holds the vector-to-handler registry the engine binds into;
//! the kind modules ([`i2c`], [`spi`], [`uart`]) carry the few behaviors
//! that are not uniform: required pin roles, speed-class selection, the
//! shared-module bus lock and the baud divisor.

#![cfg_attr(not(test), no_std)]

pub mod engine;
pub mod i2c;
pub mod irq;
pub mod ops;
pub mod spi;
pub mod uart;

pub use engine::{deinit, init, InitError, Instance, Mode, MAX_PINS};
pub use irq::{IrqError, IrqTable};
pub use ops::{InitOps, TimingRegs};
