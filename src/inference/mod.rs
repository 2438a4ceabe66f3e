//! Inference engine seam.
//!
//! The network itself runs inside an external interpreter the firmware only drives:
//! initialize once, write the flat input tensor, invoke, read the flat output tensor.
//! [`InferenceEngine`] is that contract; [`predict`] is the one place that drives it.
//!
//! # Backends
//!
//! - [`TflmEngine`] (feature `tflm`): TensorFlow Lite Micro through its C wrapper.
//! - [`PersistenceEngine`]: bring-up backend that forecasts "no change", used when the
//!   interpreter library is not linked.

use core::fmt;

use crate::config::{HORIZON_MINUTES, NUM_HORIZONS, WINDOW_SIZE};
use crate::features::FeatureVector;
use crate::tensor::{self, LengthMismatch};

pub mod persistence;
#[cfg(feature = "tflm")]
pub mod tflm;

pub use persistence::PersistenceEngine;
#[cfg(feature = "tflm")]
pub use tflm::TflmEngine;

/// Name of the engine the firmware runs with this feature set.
#[cfg(feature = "tflm")]
pub const BACKEND: &str = "TFLite Micro";
#[cfg(not(feature = "tflm"))]
pub const BACKEND: &str = "persistence forecast (no TFLM)";

// =============================================================================
// Errors
// =============================================================================

/// Interpreter start-up failure. Always fatal: without a model there is nothing to run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum InitError {
    /// 1: model data not found.
    ModelMissing,
    /// 2: model schema version does not match the interpreter.
    SchemaMismatch,
    /// 3: `AllocateTensors` failed, usually the arena is too small.
    AllocateTensors,
    /// 4: input or output tensor pointer is null.
    NullTensors,
    /// 5: input tensor is not float32.
    InputType,
    /// 6: output tensor is not float32.
    OutputType,
    /// Any other non-zero status.
    Unknown(i32),
}

impl InitError {
    /// Map a wrapper status code. `0` is success.
    pub const fn from_code(code: i32) -> Result<(), Self> {
        match code {
            0 => Ok(()),
            1 => Err(Self::ModelMissing),
            2 => Err(Self::SchemaMismatch),
            3 => Err(Self::AllocateTensors),
            4 => Err(Self::NullTensors),
            5 => Err(Self::InputType),
            6 => Err(Self::OutputType),
            other => Err(Self::Unknown(other)),
        }
    }

    /// Numeric status as reported by the wrapper (shown on the error screen).
    pub const fn code(self) -> i32 {
        match self {
            Self::ModelMissing => 1,
            Self::SchemaMismatch => 2,
            Self::AllocateTensors => 3,
            Self::NullTensors => 4,
            Self::InputType => 5,
            Self::OutputType => 6,
            Self::Unknown(code) => code,
        }
    }

    /// Human readable cause for the console.
    pub const fn description(self) -> &'static str {
        match self {
            Self::ModelMissing => "model not found",
            Self::SchemaMismatch => "incompatible schema version",
            Self::AllocateTensors => "AllocateTensors failed (memory?)",
            Self::NullTensors => "input/output tensors are null",
            Self::InputType => "wrong input tensor type",
            Self::OutputType => "wrong output tensor type",
            Self::Unknown(_) => "unknown error",
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "init error {}: {}", self.code(), self.description())
    }
}

/// Non-zero status returned by a single invocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct InvokeError {
    pub code: i32,
}

/// A prediction attempt failed. Recoverable: the cycle is dropped and the display kept.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum InferenceError {
    /// Engine handed out no input or output buffer.
    InvalidTensors,
    /// Input buffer has the wrong number of elements.
    InputLength(LengthMismatch),
    /// Output buffer holds fewer values than there are horizons.
    OutputLength { expected: usize, actual: usize },
    /// The interpreter reported an error.
    Invoke(InvokeError),
}

impl From<InvokeError> for InferenceError {
    fn from(err: InvokeError) -> Self { Self::Invoke(err) }
}

impl From<LengthMismatch> for InferenceError {
    fn from(err: LengthMismatch) -> Self { Self::InputLength(err) }
}

// =============================================================================
// Engine Trait
// =============================================================================

/// Black-box interpreter driven by the scheduler.
///
/// Buffers are owned by the engine. `input_buffer`/`output_buffer` return `None` when the
/// engine has no valid tensors (e.g. before `init`).
pub trait InferenceEngine {
    /// Load the model and allocate tensors.
    fn init(&mut self) -> Result<(), InitError>;

    /// Writable flat input tensor.
    fn input_buffer(&mut self) -> Option<&mut [f32]>;

    /// Readable flat output tensor.
    fn output_buffer(&self) -> Option<&[f32]>;

    /// Run the model on the current input tensor.
    fn invoke(&mut self) -> Result<(), InvokeError>;

    /// Bytes of the tensor arena in use (diagnostic only).
    fn arena_used_bytes(&self) -> usize;
}

// =============================================================================
// Forecast
// =============================================================================

/// Predicted temperature (°C) at each horizon, in increasing horizon order.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Forecast {
    celsius: [f32; NUM_HORIZONS],
}

impl Forecast {
    /// Wrap raw horizon values.
    pub const fn new(celsius: [f32; NUM_HORIZONS]) -> Self { Self { celsius } }

    /// Read the first `NUM_HORIZONS` values of an engine output tensor.
    pub fn from_output(output: &[f32]) -> Result<Self, InferenceError> {
        let Some(values) = output.get(..NUM_HORIZONS) else {
            return Err(InferenceError::OutputLength {
                expected: NUM_HORIZONS,
                actual: output.len(),
            });
        };
        let mut celsius = [0.0; NUM_HORIZONS];
        celsius.copy_from_slice(values);
        Ok(Self { celsius })
    }

    /// Values in horizon order.
    pub const fn celsius(&self) -> &[f32; NUM_HORIZONS] { &self.celsius }

    /// `(minutes ahead, °C)` pairs in horizon order.
    pub fn horizons(&self) -> impl Iterator<Item = (u16, f32)> + '_ {
        HORIZON_MINUTES.iter().copied().zip(self.celsius.iter().copied())
    }
}

/// Marshal `window` into the engine, invoke it and collect the forecast.
pub fn predict<E: InferenceEngine + ?Sized>(
    engine: &mut E,
    window: &[FeatureVector; WINDOW_SIZE],
) -> Result<Forecast, InferenceError> {
    let input = engine.input_buffer().ok_or(InferenceError::InvalidTensors)?;
    tensor::write_input(window, input)?;

    engine.invoke()?;

    let output = engine.output_buffer().ok_or(InferenceError::InvalidTensors)?;
    Forecast::from_output(output)
}

// =============================================================================
// Unit Tests
// =============================================================================
