//! RGB status LED driver.
//!
//! Discrete R/G/B LEDs on three GPIOs. The board has no PWM dimming stage
//! in front of them, so each channel is driven as on/off: any non-zero
//! intensity lights the channel.
//!
//! On host targets the driver only tracks the requested colour.

use crate::app::ports::IndicatorPort;
use crate::drivers::hw_init;
use crate::pins;

pub struct StatusLed {
    current: (u8, u8, u8),
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: (0, 0, 0) }
    }

    pub fn off(&mut self) {
        self.set_rgb(0, 0, 0);
    }

    pub fn current_colour(&self) -> (u8, u8, u8) {
        self.current
    }
}

impl IndicatorPort for StatusLed {
    fn set_rgb(&mut self, r: u8, g: u8, b: u8) {
        hw_init::gpio_write(pins::LED_R_GPIO, r > 0);
        hw_init::gpio_write(pins::LED_G_GPIO, g > 0);
        hw_init::gpio_write(pins::LED_B_GPIO, b > 0);
        self.current = (r, g, b);
    }
}
