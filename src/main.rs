//! TinyML Temperature Forecast Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Samples an AHT20 (temperature + humidity) and a BMP280 (temperature + pressure)
//! every 31 s, keeps the last 10 standardized samples and, once the window is full,
//! runs a 1D CNN that predicts the temperature 5, 10 and 15 minutes ahead. Predictions
//! are shown on an SSD1306 OLED and logged over RTT.
//!
//! # Architecture
//!
//! Single embassy task. Everything after board bring-up is the library's
//! `Scheduler`, polled every 100 ms; sensor reads and inference block.
//!
//! # Inference backend
//!
//! - `--features tflm`: TensorFlow Lite Micro via `libtflm_wrapper.a` (`TFLM_LIB_DIR`)
//! - default: persistence forecast (no change), for bring-up without the C++ library

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
#[cfg(target_arch = "arm")]
mod board;
#[cfg(target_arch = "arm")]
mod console;

#[cfg(target_arch = "arm")]
mod firmware {
    pub use core::cell::RefCell;

    pub use defmt::{error, info, warn};
    pub use embassy_executor::Spawner;
    pub use embassy_rp::i2c::I2c;
    pub use embassy_time::{Delay, Timer};
    pub use embedded_hal_bus::i2c::RefCellDevice;
    pub use ssd1306::I2CDisplayInterface;
    pub use temp_forecast::{Scheduler, StartupError};
    pub use temp_forecast::config::hardware::{DISPLAY_I2C_HZ, OLED_ADDRESS, SENSOR_I2C_HZ};
    pub use temp_forecast::config::{POLL_INTERVAL_MS, SAMPLE_INTERVAL_MS, WINDOW_SIZE};
    pub use temp_forecast::display::{Oled, screens};
    #[cfg(not(feature = "tflm"))]
    pub use temp_forecast::inference::PersistenceEngine;
    #[cfg(feature = "tflm")]
    pub use temp_forecast::inference::TflmEngine;
    pub use temp_forecast::scaler::Scaler;
    pub use temp_forecast::sensors::{Aht20, Bmp280, SensorPair};

    pub use crate::board::{EmbassyClock, i2c_config};
    pub use crate::console;
}

#[cfg(target_arch = "arm")]
use firmware::*;
#[cfg(target_arch = "arm")]
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`
#[cfg(target_arch = "arm")]
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"pico2-temp-forecast"),
    embassy_rp::binary_info::rp_program_description!(c"TinyML temperature forecast (AHT20 + BMP280, SSD1306)"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

/// Park the task forever. Used after a fatal start-up error; the error screen stays up.
#[cfg(target_arch = "arm")]
async fn halt() -> ! {
    loop {
        core::future::pending::<()>().await;
    }
}

#[cfg(target_arch = "arm")]
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    console::banner();

    // =========================================================================
    // Buses
    // =========================================================================
    info!("Initializing I2C...");
    let sensor_bus = RefCell::new(I2c::new_blocking(p.I2C0, p.PIN_1, p.PIN_0, i2c_config(SENSOR_I2C_HZ)));
    let display_bus = I2c::new_blocking(p.I2C1, p.PIN_15, p.PIN_14, i2c_config(DISPLAY_I2C_HZ));

    // =========================================================================
    // Sensors (failures are not fatal: cycles are skipped until reads succeed)
    // =========================================================================
    info!("Initializing sensors...");
    let mut aht20 = Aht20::new(RefCellDevice::new(&sensor_bus), Delay);
    match aht20.init() {
        Ok(()) => info!("AHT20 initialized"),
        Err(err) => error!("AHT20 init failed: {}", err.fault()),
    }

    let mut bmp280 = Bmp280::new(RefCellDevice::new(&sensor_bus));
    match bmp280.init() {
        Ok(_) => info!("BMP280 initialized (calibration loaded)"),
        Err(err) => error!("BMP280 init failed: {}", err.fault()),
    }
    let mut sensors = SensorPair::new(aht20, bmp280);

    // =========================================================================
    // Display
    // =========================================================================
    info!("Initializing display...");
    let mut display = Oled::new(I2CDisplayInterface::new_custom_address(display_bus, OLED_ADDRESS));
    if let Err(err) = display.init() {
        warn!("OLED init failed: {}", err);
    }
    if let Err(err) = screens::show_boot(&mut display) {
        warn!("Boot screen failed: {}", err);
    }

    // =========================================================================
    // Inference engine
    // =========================================================================
    info!("Initializing inference engine...");
    let scaler = match Scaler::trained() {
        Ok(scaler) => scaler,
        Err(err) => {
            console::fatal(&StartupError::Scaler(err));
            halt().await
        }
    };

    #[cfg(feature = "tflm")]
    let Some(engine) = TflmEngine::take() else {
        error!("Interpreter already claimed");
        halt().await
    };
    #[cfg(not(feature = "tflm"))]
    let engine = PersistenceEngine::new(scaler);

    let clock = EmbassyClock;
    let mut scheduler = match Scheduler::start(engine, scaler, &mut display, &clock) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            console::fatal(&err);
            halt().await
        }
    };

    info!("Tensor arena used: {} bytes", scheduler.arena_used_bytes());
    info!("System ready, sampling every {} s", SAMPLE_INTERVAL_MS / 1000);
    info!("Waiting for a full time window ({} samples)...", WINDOW_SIZE);

    // =========================================================================
    // Sampling loop
    // =========================================================================
    loop {
        if let Some(report) = scheduler.poll(&clock, &mut sensors, &mut display) {
            console::report(&report);
        }
        Timer::after_millis(POLL_INTERVAL_MS).await;
    }
}

#[cfg(not(target_arch = "arm"))]
fn main() {
    eprintln!("pico2 is firmware: build it with `--target thumbv8m.main-none-eabihf`");
    eprintln!("host tests live in the library: cargo test --lib");
}
