//! Board wiring for the Pico 2 build.
//!
//! Pin mapping:
//! - I2C0 (sensors, AHT20 + BMP280): SDA GPIO0, SCL GPIO1
//! - I2C1 (OLED SSD1306): SDA GPIO14, SCL GPIO15
//!
//! The pin numbers themselves are bound in `main.rs` (embassy peripherals are typed);
//! these constants cover everything that is a plain number.

/// Sensor bus clock.
pub const SENSOR_I2C_HZ: u32 = 100_000;

/// Display bus clock.
pub const DISPLAY_I2C_HZ: u32 = 400_000;

/// AHT20 fixed 7-bit address.
pub const AHT20_ADDRESS: u8 = 0x38;

/// BMP280 7-bit address with SDO tied low.
pub const BMP280_ADDRESS: u8 = 0x76;

/// SSD1306 7-bit address.
pub const OLED_ADDRESS: u8 = 0x3C;
