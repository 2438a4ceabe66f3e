//! Application configuration.
//!
//! - `model`: Window/tensor shape, sampling cadence and the standardization table
//! - `hardware`: I2C buses, pins and device addresses
//! - `layout`: OLED geometry and text rows

pub mod hardware;
pub mod layout;
pub mod model;

// Re-export model constants at config level for convenience
pub use model::{
    HORIZON_MINUTES,
    INPUT_LEN,
    NUM_FEATURES,
    NUM_HORIZONS,
    POLL_INTERVAL_MS,
    SAMPLE_INTERVAL_MS,
    SCALER_MEAN,
    SCALER_SCALE,
    WINDOW_SIZE,
};
pub use layout::TEXT_LINE_LEN;
