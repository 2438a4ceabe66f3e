//! Environmental sensors and the combined sample source.
//!
//! - [`aht20`]: temperature + relative humidity (sensor A)
//! - [`bmp280`]: temperature + pressure (sensor B)
//!
//! Both drivers are blocking and generic over `embedded-hal` 1.0 I2C, so they run on the
//! RP2350 (shared bus via `embedded-hal-bus`) and against `embedded-hal-mock` in tests.
//! The scheduler only sees [`SampleSource`].

pub mod aht20;
pub mod bmp280;

pub use aht20::Aht20;
pub use bmp280::Bmp280;

use crate::features::{Feature, FeatureVector};

// =============================================================================
// Errors
// =============================================================================

/// Driver-level error, generic over the bus error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Error<E> {
    /// I2C transfer failed.
    I2c(E),
    /// Sensor still measuring when the result was read.
    Busy,
    /// Measurement frame failed its CRC.
    Checksum,
    /// Unexpected chip id (wrong device at the address).
    ChipId(u8),
    /// Sensor has no valid calibration (not initialized, or AHT20 refused calibration).
    NotCalibrated,
    /// Compensated value outside the sensor's operating range.
    OutOfRange,
}

impl<E> Error<E> {
    /// Bus-independent classification, for reporting.
    pub const fn fault(&self) -> Fault {
        match self {
            Self::I2c(_) => Fault::Bus,
            Self::Busy => Fault::Busy,
            Self::Checksum => Fault::Checksum,
            Self::ChipId(id) => Fault::ChipId(*id),
            Self::NotCalibrated => Fault::NotCalibrated,
            Self::OutOfRange => Fault::OutOfRange,
        }
    }
}

/// What went wrong with a sensor, without the bus error type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Fault {
    Bus,
    Busy,
    Checksum,
    ChipId(u8),
    NotCalibrated,
    OutOfRange,
}

/// A sample could not be taken. Recoverable: the cycle is skipped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum SensorError {
    /// Temperature/humidity sensor (AHT20) failed.
    Humidity(Fault),
    /// Temperature/pressure sensor (BMP280) failed.
    Pressure(Fault),
}

// =============================================================================
// Readings
// =============================================================================

/// One AHT20 measurement.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct TempHumidity {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// One BMP280 measurement.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct TempPressure {
    pub temperature_c: f32,
    pub pressure_hpa: f32,
}

/// Both sensors read in the same cycle, in physical units.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct RawSample {
    pub humidity: TempHumidity,
    pub pressure: TempPressure,
}

impl RawSample {
    /// Arrange the readings in model feature order (still unstandardized).
    pub const fn features(&self) -> FeatureVector {
        let mut v = [0.0; crate::config::NUM_FEATURES];
        v[Feature::TempAht20.index()] = self.humidity.temperature_c;
        v[Feature::HumidityAht20.index()] = self.humidity.humidity_pct;
        v[Feature::TempBmp280.index()] = self.pressure.temperature_c;
        v[Feature::PressureBmp280.index()] = self.pressure.pressure_hpa;
        v
    }
}

// =============================================================================
// Sensor Traits
// =============================================================================

/// Sensor A: temperature + relative humidity.
pub trait HumiditySensor {
    fn read(&mut self) -> Result<TempHumidity, Fault>;
}

/// Sensor B: temperature + pressure.
pub trait PressureSensor {
    fn read(&mut self) -> Result<TempPressure, Fault>;
}

/// Anything that yields one complete raw sample per scheduler cycle.
pub trait SampleSource {
    fn read_sample(&mut self) -> Result<RawSample, SensorError>;
}

/// The two sensors read back to back: A first, B only if A succeeded.
pub struct SensorPair<H, P> {
    pub humidity: H,
    pub pressure: P,
}

impl<H, P> SensorPair<H, P> {
    pub const fn new(
        humidity: H,
        pressure: P,
    ) -> Self {
        Self { humidity, pressure }
    }
}

impl<H: HumiditySensor, P: PressureSensor> SampleSource for SensorPair<H, P> {
    fn read_sample(&mut self) -> Result<RawSample, SensorError> {
        let humidity = self.humidity.read().map_err(SensorError::Humidity)?;
        let pressure = self.pressure.read().map_err(SensorError::Pressure)?;
        Ok(RawSample { humidity, pressure })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
