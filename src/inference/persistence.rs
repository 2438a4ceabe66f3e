//! Persistence-forecast engine for bring-up without the interpreter.
//!
//! Predicts that the AHT20 temperature stays where it is: every horizon gets the newest
//! step of the input window, mapped back to °C. It honours the same buffer/status contract
//! as the real interpreter (no tensors before `init`), so the whole sampling → display
//! pipeline can be exercised on hardware before the C++ library is available.

use core::mem::size_of;

use super::{InferenceEngine, InitError, InvokeError};
use crate::config::{INPUT_LEN, NUM_FEATURES, NUM_HORIZONS};
use crate::features::Feature;
use crate::scaler::Scaler;

/// Status returned by `invoke` before `init` succeeded.
const NOT_INITIALIZED: i32 = -1;

/// "Tomorrow will be like today" forecaster.
pub struct PersistenceEngine {
    scaler: Scaler,
    input: [f32; INPUT_LEN],
    output: [f32; NUM_HORIZONS],
    initialized: bool,
}

impl PersistenceEngine {
    /// `scaler` must be the one used to standardize the window.
    pub const fn new(scaler: Scaler) -> Self {
        Self {
            scaler,
            input: [0.0; INPUT_LEN],
            output: [0.0; NUM_HORIZONS],
            initialized: false,
        }
    }
}

impl InferenceEngine for PersistenceEngine {
    fn init(&mut self) -> Result<(), InitError> {
        self.initialized = true;
        Ok(())
    }

    fn input_buffer(&mut self) -> Option<&mut [f32]> { self.initialized.then_some(&mut self.input[..]) }

    fn output_buffer(&self) -> Option<&[f32]> { self.initialized.then_some(&self.output[..]) }

    fn invoke(&mut self) -> Result<(), InvokeError> {
        if !self.initialized {
            return Err(InvokeError { code: NOT_INITIALIZED });
        }
        let newest = INPUT_LEN - NUM_FEATURES + Feature::TempAht20.index();
        let celsius = self.scaler.destandardize(self.input[newest], Feature::TempAht20);
        self.output = [celsius; NUM_HORIZONS];
        Ok(())
    }

    fn arena_used_bytes(&self) -> usize { size_of::<[f32; INPUT_LEN]>() + size_of::<[f32; NUM_HORIZONS]>() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tensors_before_init() {
        let mut engine = PersistenceEngine::new(Scaler::trained().unwrap());
        assert!(engine.input_buffer().is_none());
        assert!(engine.output_buffer().is_none());
        assert_eq!(engine.invoke(), Err(InvokeError { code: NOT_INITIALIZED }));
    }

    #[test]
    fn test_forecasts_latest_temperature() {
        let scaler = Scaler::trained().unwrap();
        let mut engine = PersistenceEngine::new(scaler);
        engine.init().unwrap();

        let input = engine.input_buffer().unwrap();
        input[0] = scaler.standardize(5.0, Feature::TempAht20); // oldest step, ignored
        input[INPUT_LEN - NUM_FEATURES] = scaler.standardize(23.5, Feature::TempAht20);
        engine.invoke().unwrap();

        let output = engine.output_buffer().unwrap();
        assert_eq!(output.len(), NUM_HORIZONS);
        for value in output {
            assert!((value - 23.5).abs() < 1e-3);
        }
    }

    #[test]
    fn test_arena_bytes() {
        let engine = PersistenceEngine::new(Scaler::trained().unwrap());
        assert_eq!(engine.arena_used_bytes(), (INPUT_LEN + NUM_HORIZONS) * 4);
    }
}
