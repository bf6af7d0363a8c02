//! Board-level drivers: GPIO pins, indicators, peripheral init, watchdog.

pub mod gpio;
pub mod hw_init;
pub mod indicator;
pub mod watchdog;
