//! AHT20 temperature/humidity sensor (I2C, fixed address 0x38).
//!
//! Measurement sequence: trigger (`AC 33 00`), wait ≥80 ms, read 7 bytes:
//!
//! ```text
//! [status] [H19..H12] [H11..H4] [H3..H0|T19..T16] [T15..T8] [T7..T0] [CRC8]
//! ```
//!
//! `RH% = H / 2^20 * 100`, `T°C = T / 2^20 * 200 - 50`. CRC8 is poly 0x31, init 0xFF.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{Error, Fault, HumiditySensor, TempHumidity};
use crate::config::hardware::AHT20_ADDRESS;

const CMD_CALIBRATE: [u8; 3] = [0xBE, 0x08, 0x00];
const CMD_MEASURE: [u8; 3] = [0xAC, 0x33, 0x00];

const STATUS_BUSY: u8 = 0x80;
const STATUS_CALIBRATED: u8 = 0x08;

/// Time after power-up before the sensor accepts commands.
const POWER_ON_MS: u32 = 40;
const CALIBRATE_MS: u32 = 10;
const MEASURE_MS: u32 = 80;

/// 2^20, full scale of the 20-bit raw values.
const FULL_SCALE: f32 = 1_048_576.0;

/// Blocking AHT20 driver.
pub struct Aht20<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> Aht20<I2C, D> {
    pub const fn new(
        i2c: I2C,
        delay: D,
    ) -> Self {
        Self { i2c, delay }
    }

    /// Wait for power-up and make sure the calibration bit is set, sending the
    /// calibrate command if it is not.
    pub fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.delay.delay_ms(POWER_ON_MS);
        if self.status()? & STATUS_CALIBRATED != 0 {
            return Ok(());
        }

        self.i2c.write(AHT20_ADDRESS, &CMD_CALIBRATE).map_err(Error::I2c)?;
        self.delay.delay_ms(CALIBRATE_MS);

        if self.status()? & STATUS_CALIBRATED == 0 {
            return Err(Error::NotCalibrated);
        }
        Ok(())
    }

    /// Trigger a measurement and read it back (blocks ~80 ms).
    pub fn measure(&mut self) -> Result<TempHumidity, Error<I2C::Error>> {
        self.i2c.write(AHT20_ADDRESS, &CMD_MEASURE).map_err(Error::I2c)?;
        self.delay.delay_ms(MEASURE_MS);

        let mut frame = [0u8; 7];
        self.i2c.read(AHT20_ADDRESS, &mut frame).map_err(Error::I2c)?;

        if frame[0] & STATUS_BUSY != 0 {
            return Err(Error::Busy);
        }
        if crc8(&frame[..6]) != frame[6] {
            return Err(Error::Checksum);
        }
        Ok(decode(&frame))
    }

    fn status(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut status = [0u8; 1];
        self.i2c.read(AHT20_ADDRESS, &mut status).map_err(Error::I2c)?;
        Ok(status[0])
    }
}

impl<I2C: I2c, D: DelayNs> HumiditySensor for Aht20<I2C, D> {
    fn read(&mut self) -> Result<TempHumidity, Fault> { self.measure().map_err(|e| e.fault()) }
}

/// Unpack the two 20-bit fields of a measurement frame.
fn decode(frame: &[u8; 7]) -> TempHumidity {
    let raw_humidity = (u32::from(frame[1]) << 12) | (u32::from(frame[2]) << 4) | (u32::from(frame[3]) >> 4);
    let raw_temperature = ((u32::from(frame[3]) & 0x0F) << 16) | (u32::from(frame[4]) << 8) | u32::from(frame[5]);

    TempHumidity {
        temperature_c: raw_temperature as f32 / FULL_SCALE * 200.0 - 50.0,
        humidity_pct: raw_humidity as f32 / FULL_SCALE * 100.0,
    }
}

/// CRC-8, polynomial 0x31, init 0xFF, no reflection.
fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0xFFu8;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x31 } else { crc << 1 };
        }
    }
    crc
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;

    const ADDR: u8 = AHT20_ADDRESS;

    /// 45 %RH / 25 °C with a valid CRC.
    const FRAME_45_25: [u8; 7] = [0x1C, 0x73, 0x33, 0x36, 0x00, 0x00, 0xF5];

    #[test]
    fn test_crc8_known_frame() {
        assert_eq!(crc8(&FRAME_45_25[..6]), 0xF5);
        assert_eq!(crc8(&[]), 0xFF);
    }

    #[test]
    fn test_decode() {
        let reading = decode(&FRAME_45_25);
        assert!((reading.humidity_pct - 45.0).abs() < 0.01);
        assert!((reading.temperature_c - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_init_already_calibrated() {
        let expectations = [I2cTransaction::read(ADDR, vec![0x18])];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = Aht20::new(i2c, NoopDelay::new());
        assert_eq!(sensor.init(), Ok(()));
        i2c_clone.done();
    }

    #[test]
    fn test_init_sends_calibration() {
        let expectations = [
            I2cTransaction::read(ADDR, vec![0x10]),
            I2cTransaction::write(ADDR, CMD_CALIBRATE.to_vec()),
            I2cTransaction::read(ADDR, vec![0x18]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = Aht20::new(i2c, NoopDelay::new());
        assert_eq!(sensor.init(), Ok(()));
        i2c_clone.done();
    }

    #[test]
    fn test_init_calibration_refused() {
        let expectations = [
            I2cTransaction::read(ADDR, vec![0x00]),
            I2cTransaction::write(ADDR, CMD_CALIBRATE.to_vec()),
            I2cTransaction::read(ADDR, vec![0x00]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = Aht20::new(i2c, NoopDelay::new());
        assert_eq!(sensor.init(), Err(Error::NotCalibrated));
        i2c_clone.done();
    }

    #[test]
    fn test_measure() {
        let expectations = [
            I2cTransaction::write(ADDR, CMD_MEASURE.to_vec()),
            I2cTransaction::read(ADDR, FRAME_45_25.to_vec()),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = Aht20::new(i2c, NoopDelay::new());
        let reading = sensor.measure().unwrap();
        assert!((reading.humidity_pct - 45.0).abs() < 0.01);
        assert!((reading.temperature_c - 25.0).abs() < 0.01);
        i2c_clone.done();
    }

    #[test]
    fn test_measure_busy() {
        let mut frame = FRAME_45_25;
        frame[0] |= STATUS_BUSY;
        let expectations = [
            I2cTransaction::write(ADDR, CMD_MEASURE.to_vec()),
            I2cTransaction::read(ADDR, frame.to_vec()),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = Aht20::new(i2c, NoopDelay::new());
        assert_eq!(sensor.measure(), Err(Error::Busy));
        i2c_clone.done();
    }

    #[test]
    fn test_measure_bad_crc() {
        let mut frame = FRAME_45_25;
        frame[6] ^= 0xFF;
        let expectations = [
            I2cTransaction::write(ADDR, CMD_MEASURE.to_vec()),
            I2cTransaction::read(ADDR, frame.to_vec()),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = Aht20::new(i2c, NoopDelay::new());
        assert_eq!(sensor.measure(), Err(Error::Checksum));
        i2c_clone.done();
    }

    #[test]
    fn test_bus_error_is_fault() {
        let expectations = [I2cTransaction::write(ADDR, CMD_MEASURE.to_vec()).with_error(ErrorKind::Other)];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = Aht20::new(i2c, NoopDelay::new());
        assert_eq!(HumiditySensor::read(&mut sensor), Err(Fault::Bus));
        i2c_clone.done();
    }
}
