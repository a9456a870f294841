//! Data-driven peripheral configuration and initialization.
//!
//! Board wiring lives in [`conf::ConfigTable`]s exported by [`boards`];
//! drivers initialize instances through [`init`]'s uniform five-step engine,
//! with clock gating in [`clock`] and shared-module serialization in
//! [`lock`].

#![no_std]

#[doc(inline)]
pub use periph_boards as boards;
#[doc(inline)]
pub use periph_clock as clock;
#[doc(inline)]
pub use periph_conf as conf;
#[doc(inline)]
pub use periph_init as init;
#[doc(inline)]
pub use periph_lock as lock;
