//! Window → input tensor marshaling.
//!
//! The model input is `[1, WINDOW_SIZE, NUM_FEATURES]` float32, row-major: element
//! `t * NUM_FEATURES + f` is feature `f` of time step `t`. Nothing at runtime can detect a
//! layout mismatch (the model just predicts garbage), so the known-answer tests below are
//! the only guard.

use crate::config::{INPUT_LEN, NUM_FEATURES, WINDOW_SIZE};
use crate::features::FeatureVector;

/// Engine input buffer does not have the expected number of elements.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct LengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Flatten a time-ordered window into the model's linear input layout.
pub fn flatten(window: &[FeatureVector; WINDOW_SIZE]) -> [f32; INPUT_LEN] {
    let mut out = [0.0; INPUT_LEN];
    for (t, step) in window.iter().enumerate() {
        out[t * NUM_FEATURES..(t + 1) * NUM_FEATURES].copy_from_slice(step);
    }
    out
}

/// Copy a time-ordered window straight into an engine-owned input buffer.
pub fn write_input(
    window: &[FeatureVector; WINDOW_SIZE],
    input: &mut [f32],
) -> Result<(), LengthMismatch> {
    if input.len() != INPUT_LEN {
        return Err(LengthMismatch {
            expected: INPUT_LEN,
            actual: input.len(),
        });
    }
    for (dst, step) in input.chunks_exact_mut(NUM_FEATURES).zip(window) {
        dst.copy_from_slice(step);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_window() -> [FeatureVector; WINDOW_SIZE] {
        let mut window = [[0.0; NUM_FEATURES]; WINDOW_SIZE];
        for (t, step) in window.iter_mut().enumerate() {
            for (f, value) in step.iter_mut().enumerate() {
                *value = (t * 100 + f) as f32;
            }
        }
        window
    }

    #[test]
    fn test_flatten_is_time_major() {
        let flat = flatten(&numbered_window());
        for t in 0..WINDOW_SIZE {
            for f in 0..NUM_FEATURES {
                assert_eq!(flat[t * NUM_FEATURES + f], (t * 100 + f) as f32);
            }
        }
    }

    #[test]
    fn test_flatten_known_answer_prefix() {
        let flat = flatten(&numbered_window());
        assert_eq!(&flat[..6], &[0.0, 1.0, 2.0, 3.0, 100.0, 101.0]);
        assert_eq!(flat[INPUT_LEN - 1], 903.0);
    }

    #[test]
    fn test_flatten_zero_window() {
        let flat = flatten(&[[0.0; NUM_FEATURES]; WINDOW_SIZE]);
        assert_eq!(flat, [0.0; INPUT_LEN]);
    }

    #[test]
    fn test_write_input_matches_flatten() {
        let window = numbered_window();
        let mut input = [f32::NAN; INPUT_LEN];
        write_input(&window, &mut input).unwrap();
        assert_eq!(input, flatten(&window));
    }

    #[test]
    fn test_write_input_rejects_wrong_length() {
        let window = numbered_window();
        let mut short = [0.0; INPUT_LEN - 1];
        assert_eq!(
            write_input(&window, &mut short),
            Err(LengthMismatch {
                expected: INPUT_LEN,
                actual: INPUT_LEN - 1
            })
        );
        // Untouched on error
        assert!(short.iter().all(|v| *v == 0.0));
    }
}
