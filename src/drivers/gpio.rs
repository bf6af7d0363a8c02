//! Raw GPIO as `embedded-hal` pins.
//!
//! The IR and indicator drivers are generic over `OutputPin` / `InputPin`.
//! On the device those are this thin wrapper around the `hw_init` register
//! helpers, which keeps a pin write down to a single `gpio_set_level`
//! call.  The pin must already be configured by
//! [`hw_init::init_peripherals`].

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::drivers::hw_init;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPin {
    gpio: i32,
}

impl GpioPin {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn number(&self) -> i32 {
        self.gpio
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl OutputPin for GpioPin {
    #[inline(always)]
    fn set_high(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.gpio, true);
        Ok(())
    }

    #[inline(always)]
    fn set_low(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.gpio, false);
        Ok(())
    }
}

impl InputPin for GpioPin {
    #[inline(always)]
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(hw_init::gpio_read(self.gpio))
    }

    #[inline(always)]
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!hw_init::gpio_read(self.gpio))
    }
}
