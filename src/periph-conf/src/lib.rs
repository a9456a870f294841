//! Data-driven peripheral configuration.
//!
//! A board declares which hardware instances of each peripheral kind exist
//! and how each is wired: its register block, its clock gate, its
//! pin-to-function bindings and its interrupt identity. Drivers consume the
//! resulting [`ConfigTable`] at initialization time and at no other time.
//!
//! Tables are built entirely in `const` context and never mutated; anything
//! a driver could trip over at runtime (index gaps, kind mismatches, missing
//! timing payloads) is caught by [`ConfigTable::validate`] at startup.

#![cfg_attr(not(test), no_std)]

mod descriptor;
mod speed;
mod table;

pub use descriptor::{
    ClockId, Descriptor, DeviceHandle, IrqBinding, Pin, PinBinding, PinRole, Timing, UartVariant,
};
pub use speed::{timing_codes, SpeedClass, TimingCodes};
pub use table::{ConfigError, ConfigTable, Kind, NONE};
