//! Board wiring tables.
//!
//! One module per supported board, selected through a Cargo feature. Each
//! board exports its [`periph_conf::ConfigTable`], its clock-gate register
//! file and its SPI lock registry, dimensioned for that board's hardware.

#![cfg_attr(not(test), no_std)]

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "fr64-devkit")] {
        pub mod fr64_devkit;
        pub use self::fr64_devkit as board;
    } else if #[cfg(feature = "no-boards")] {
        // Do nothing
    } else {
        compile_error!("no board feature selected");
    }
}

#[cfg(all(test, feature = "fr64-devkit"))]
mod tests {
    #[test]
    fn board_alias_resolves_to_the_selected_board() {
        assert_eq!(crate::board::TABLE.count(periph_conf::Kind::Uart), 2);
    }
}
