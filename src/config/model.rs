//! Model input/output shape and sampling cadence.
//!
//! These values are a contract with the trained model artifact: the window length,
//! the feature order and the scaler table must match what the network was trained on.
//! None of them are runtime-configurable.

// =============================================================================
// Tensor Shape
// =============================================================================

/// Number of time steps in the input window.
pub const WINDOW_SIZE: usize = 10;

/// Features per time step: `[Temp_AHT20, Humid_AHT20, Temp_BMP280, Press_BMP280]`.
pub const NUM_FEATURES: usize = 4;

/// Number of forecast horizons produced by the model.
pub const NUM_HORIZONS: usize = 3;

/// Flat input tensor length (`[1, WINDOW_SIZE, NUM_FEATURES]`).
pub const INPUT_LEN: usize = WINDOW_SIZE * NUM_FEATURES;

/// Forecast horizon of each output, in minutes, in output order.
pub const HORIZON_MINUTES: [u16; NUM_HORIZONS] = [5, 10, 15];

// =============================================================================
// Timing
// =============================================================================

/// Interval between sensor samples in milliseconds.
/// The model was trained on data logged at this cadence.
pub const SAMPLE_INTERVAL_MS: u64 = 31_000;

/// Sleep between scheduler polls in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// Standardization (Z-score) Parameters
// =============================================================================
// Exported from the scaler fitted during training, in feature order.

/// Per-feature mean.
pub const SCALER_MEAN: [f32; NUM_FEATURES] = [
    20.276_101,  // Temp_AHT20_C
    66.718_63,   // Humid_AHT20_pct
    21.759_548,  // Temp_BMP280_C
    918.015_285, // Press_BMP280_hPa
];

/// Per-feature scale (standard deviation). Must be non-zero.
pub const SCALER_SCALE: [f32; NUM_FEATURES] = [
    3.294_128,  // Temp_AHT20_C
    13.480_684, // Humid_AHT20_pct
    3.191_886,  // Temp_BMP280_C
    2.106_629,  // Press_BMP280_hPa
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_len_matches_shape() {
        assert_eq!(INPUT_LEN, 40);
    }

    #[test]
    fn test_horizons_increasing() {
        assert!(HORIZON_MINUTES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_scaler_scale_non_zero() {
        assert!(SCALER_SCALE.iter().all(|s| *s != 0.0 && s.is_finite()));
    }
}
