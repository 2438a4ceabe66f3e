//! Board glue for the Pico 2: bus configuration and the embassy time source.
//!
//! Pin mapping:
//! - I2C0 (AHT20 + BMP280, 100 kHz): SDA GPIO0, SCL GPIO1
//! - I2C1 (SSD1306 OLED, 400 kHz): SDA GPIO14, SCL GPIO15
//!
//! Internal pull-ups are enabled on both buses; the breakouts' own pull-ups are optional.

use embassy_rp::i2c::Config as I2cConfig;
use embassy_time::Instant;
use temp_forecast::Clock;

/// Blocking I2C configuration at `frequency` Hz with pull-ups on.
pub fn i2c_config(frequency: u32) -> I2cConfig {
    let mut config = I2cConfig::default();
    config.frequency = frequency;
    config.sda_pullup = true;
    config.scl_pullup = true;
    config
}

/// Milliseconds since boot from the embassy time driver.
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 { Instant::now().as_millis() }
}
