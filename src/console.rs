//! defmt console output for scheduler reports.

use defmt::{Format, Formatter, error, info, warn};
use temp_forecast::config::WINDOW_SIZE;
use temp_forecast::inference::{BACKEND, Forecast, InferenceError};
use temp_forecast::sensors::{RawSample, SensorError};
use temp_forecast::{CycleReport, StartupError};

/// Float printed with two decimals (defmt has no precision specifier).
pub struct Fixed2(pub f32);

impl Format for Fixed2 {
    fn format(
        &self,
        f: Formatter,
    ) {
        let scaled = self.0 * 100.0;
        let centi = if scaled < 0.0 { (scaled - 0.5) as i32 } else { (scaled + 0.5) as i32 };
        let sign = if centi < 0 { "-" } else { "" };
        let abs = centi.unsigned_abs();
        let frac = abs % 100;
        defmt::write!(f, "{}{}.{}{}", sign, abs / 100, frac / 10, frac % 10);
    }
}

pub fn banner() {
    info!("========================================");
    info!("  Temperature Prediction - CNN 1D");
    info!("  Raspberry Pi Pico 2 + {}", BACKEND);
    info!("========================================");
}

/// Log a fatal start-up error. The caller halts afterwards.
pub fn fatal(err: &StartupError) {
    match err {
        StartupError::Engine(init) => {
            error!("Inference engine init failed (code {}): {}", init.code(), init.description());
        }
        StartupError::Scaler(scaler) => error!("Standardization table rejected: {}", scaler),
    }
    error!("System halted");
}

/// Log the outcome of one sampling cycle.
pub fn report(report: &CycleReport) {
    if let Some(sample) = report.sample() {
        log_sample(sample);
    }
    if report.window_completed() {
        info!("Time window complete, starting predictions");
    }

    match report {
        CycleReport::SensorFailed(SensorError::Humidity(fault)) => error!("AHT20 read failed: {}", fault),
        CycleReport::SensorFailed(SensorError::Pressure(fault)) => error!("BMP280 read failed: {}", fault),
        CycleReport::Collecting { collected, .. } => info!("Samples collected: {}/{}", collected, WINDOW_SIZE),
        CycleReport::Forecast {
            forecast, display, ..
        } => {
            log_forecast(forecast);
            if let Err(err) = display {
                warn!("Display update failed: {}", err);
            }
        }
        CycleReport::InferenceFailed { error, .. } => log_inference_error(error),
    }
}

fn log_sample(sample: &RawSample) {
    info!(
        "Sensors: AHT20={}C {}% | BMP280={}C {}hPa",
        Fixed2(sample.humidity.temperature_c),
        Fixed2(sample.humidity.humidity_pct),
        Fixed2(sample.pressure.temperature_c),
        Fixed2(sample.pressure.pressure_hpa),
    );
}

fn log_forecast(forecast: &Forecast) {
    info!("=== Temperature forecast ===");
    for (minutes, celsius) in forecast.horizons() {
        info!("  +{} min: {} C", minutes, Fixed2(celsius));
    }
}

fn log_inference_error(err: &InferenceError) {
    match err {
        InferenceError::Invoke(invoke) => error!("Invoke failed (code {})", invoke.code),
        InferenceError::InvalidTensors => error!("Invalid input/output tensors"),
        other => error!("Inference failed: {}", other),
    }
}
