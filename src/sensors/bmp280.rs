//! BMP280 temperature/pressure sensor (I2C, 0x76 or 0x77).
//!
//! Runs in normal mode (continuous conversions, 500 ms standby, IIR x16, T x1 / P x4
//! oversampling); a read just fetches the latest result registers. Raw ADC values are
//! turned into physical units with the factory trimming words read once by
//! [`Bmp280::init`], using the 32-bit integer compensation from the Bosch datasheet.

use embedded_hal::i2c::I2c;

use super::{Error, Fault, PressureSensor, TempPressure};
use crate::config::hardware::BMP280_ADDRESS;

// Registers
const REG_CALIB: u8 = 0x88;
const REG_CHIP_ID: u8 = 0xD0;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_DATA: u8 = 0xF7;

const CHIP_ID: u8 = 0x58;

/// Standby 500 ms (`t_sb = 100`), IIR filter x16 (`filter = 101`).
const CONFIG: u8 = (0b100 << 5) | (0b101 << 2);

/// Temperature x1 (`001`), pressure x4 (`011`), normal mode (`11`).
const CTRL_MEAS: u8 = (0b001 << 5) | (0b011 << 2) | 0b11;

const CALIB_LEN: usize = 24;

// =============================================================================
// Calibration
// =============================================================================

/// Factory trimming parameters (`dig_T1..dig_P9`).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Calibration {
    dig_t1: u16,
    dig_t2: i16,
    dig_t3: i16,
    dig_p1: u16,
    dig_p2: i16,
    dig_p3: i16,
    dig_p4: i16,
    dig_p5: i16,
    dig_p6: i16,
    dig_p7: i16,
    dig_p8: i16,
    dig_p9: i16,
}

impl Calibration {
    /// Parse the little-endian block starting at register 0x88.
    pub const fn from_bytes(b: &[u8; CALIB_LEN]) -> Self {
        Self {
            dig_t1: u16::from_le_bytes([b[0], b[1]]),
            dig_t2: i16::from_le_bytes([b[2], b[3]]),
            dig_t3: i16::from_le_bytes([b[4], b[5]]),
            dig_p1: u16::from_le_bytes([b[6], b[7]]),
            dig_p2: i16::from_le_bytes([b[8], b[9]]),
            dig_p3: i16::from_le_bytes([b[10], b[11]]),
            dig_p4: i16::from_le_bytes([b[12], b[13]]),
            dig_p5: i16::from_le_bytes([b[14], b[15]]),
            dig_p6: i16::from_le_bytes([b[16], b[17]]),
            dig_p7: i16::from_le_bytes([b[18], b[19]]),
            dig_p8: i16::from_le_bytes([b[20], b[21]]),
            dig_p9: i16::from_le_bytes([b[22], b[23]]),
        }
    }

    /// Fine temperature shared by both compensation formulas.
    ///
    /// All compensation arithmetic wraps like the 32-bit C reference; garbage frames give
    /// garbage values that [`in_range`] rejects instead of overflow panics.
    fn t_fine(
        &self,
        raw_t: i32,
    ) -> i32 {
        let t1 = i32::from(self.dig_t1);
        let var1 = ((raw_t >> 3).wrapping_sub(t1 << 1)).wrapping_mul(i32::from(self.dig_t2)) >> 11;
        let delta = (raw_t >> 4).wrapping_sub(t1);
        let var2 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(i32::from(self.dig_t3))) >> 14;
        var1.wrapping_add(var2)
    }

    /// Temperature in hundredths of a degree Celsius.
    pub fn temperature_centi(
        &self,
        raw_t: i32,
    ) -> i32 {
        self.t_fine(raw_t).wrapping_mul(5).wrapping_add(128) >> 8
    }

    /// Pressure in pascals. Returns 0 when `dig_P1` is zero (no calibration).
    pub fn pressure_pa(
        &self,
        raw_p: i32,
        raw_t: i32,
    ) -> u32 {
        let t_fine = self.t_fine(raw_t);

        let mut var1 = (t_fine >> 1).wrapping_sub(64_000);
        let square = (var1 >> 2).wrapping_mul(var1 >> 2);
        let mut var2 = (square >> 11).wrapping_mul(i32::from(self.dig_p6));
        var2 = var2.wrapping_add(var1.wrapping_mul(i32::from(self.dig_p5)) << 1);
        var2 = (var2 >> 2).wrapping_add(i32::from(self.dig_p4) << 16);
        var1 = ((i32::from(self.dig_p3).wrapping_mul(square >> 13) >> 3)
            .wrapping_add(i32::from(self.dig_p2).wrapping_mul(var1) >> 1))
            >> 18;
        var1 = 32_768i32.wrapping_add(var1).wrapping_mul(i32::from(self.dig_p1)) >> 15;
        if var1 == 0 {
            return 0;
        }

        let divisor = var1 as u32;
        let mut p = (1_048_576i32.wrapping_sub(raw_p).wrapping_sub(var2 >> 12) as u32).wrapping_mul(3125);
        p = if p < 0x8000_0000 { (p << 1) / divisor } else { (p / divisor).wrapping_mul(2) };

        let var1 = i32::from(self.dig_p9).wrapping_mul(((p >> 3).wrapping_mul(p >> 3) >> 13) as i32) >> 12;
        let var2 = ((p >> 2) as i32).wrapping_mul(i32::from(self.dig_p8)) >> 13;
        (p as i32).wrapping_add(var1.wrapping_add(var2).wrapping_add(i32::from(self.dig_p7)) >> 4) as u32
    }
}

/// Sensor operating range: -40..=85 °C, 300..=1100 hPa.
const TEMPERATURE_CENTI_RANGE: core::ops::RangeInclusive<i32> = -4_000..=8_500;
const PRESSURE_PA_RANGE: core::ops::RangeInclusive<u32> = 30_000..=110_000;

/// True if a compensated reading lies inside the sensor's operating range.
fn in_range(
    temperature_centi: i32,
    pressure_pa: u32,
) -> bool {
    TEMPERATURE_CENTI_RANGE.contains(&temperature_centi) && PRESSURE_PA_RANGE.contains(&pressure_pa)
}

// =============================================================================
// Driver
// =============================================================================

/// Blocking BMP280 driver.
pub struct Bmp280<I2C> {
    i2c: I2C,
    address: u8,
    calibration: Option<Calibration>,
}

impl<I2C: I2c> Bmp280<I2C> {
    /// Driver at the default address (SDO low).
    pub const fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: BMP280_ADDRESS,
            calibration: None,
        }
    }

    /// Check the chip id, start normal-mode conversions and load the calibration words.
    pub fn init(&mut self) -> Result<Calibration, Error<I2C::Error>> {
        let mut id = [0u8; 1];
        self.i2c.write_read(self.address, &[REG_CHIP_ID], &mut id).map_err(Error::I2c)?;
        if id[0] != CHIP_ID {
            return Err(Error::ChipId(id[0]));
        }

        self.i2c.write(self.address, &[REG_CONFIG, CONFIG]).map_err(Error::I2c)?;
        self.i2c.write(self.address, &[REG_CTRL_MEAS, CTRL_MEAS]).map_err(Error::I2c)?;

        let mut block = [0u8; CALIB_LEN];
        self.i2c.write_read(self.address, &[REG_CALIB], &mut block).map_err(Error::I2c)?;
        let calibration = Calibration::from_bytes(&block);
        self.calibration = Some(calibration);
        Ok(calibration)
    }

    /// Read the latest raw `(pressure, temperature)` ADC values.
    fn read_raw(&mut self) -> Result<(i32, i32), Error<I2C::Error>> {
        let mut data = [0u8; 6];
        self.i2c.write_read(self.address, &[REG_DATA], &mut data).map_err(Error::I2c)?;
        let raw_p = (i32::from(data[0]) << 12) | (i32::from(data[1]) << 4) | (i32::from(data[2]) >> 4);
        let raw_t = (i32::from(data[3]) << 12) | (i32::from(data[4]) << 4) | (i32::from(data[5]) >> 4);
        Ok((raw_p, raw_t))
    }

    /// Read and compensate the latest measurement.
    ///
    /// Results outside the operating range (a stuck bus reading all zeros or all ones,
    /// or a sensor reset that lost its configuration) are reported as `OutOfRange`.
    pub fn measure(&mut self) -> Result<TempPressure, Error<I2C::Error>> {
        let calibration = self.calibration.ok_or(Error::NotCalibrated)?;
        let (raw_p, raw_t) = self.read_raw()?;
        let temperature_centi = calibration.temperature_centi(raw_t);
        let pressure_pa = calibration.pressure_pa(raw_p, raw_t);
        if !in_range(temperature_centi, pressure_pa) {
            return Err(Error::OutOfRange);
        }
        Ok(TempPressure {
            temperature_c: temperature_centi as f32 / 100.0,
            pressure_hpa: pressure_pa as f32 / 100.0,
        })
    }
}

impl<I2C: I2c> PressureSensor for Bmp280<I2C> {
    fn read(&mut self) -> Result<TempPressure, Fault> { self.measure().map_err(|e| e.fault()) }
}

// =============================================================================
// Unit Tests
// =============================================================================
