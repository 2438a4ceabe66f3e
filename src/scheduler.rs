//! Sampling scheduler: the firmware's main loop body.
//!
//! The scheduler owns everything that persists between cycles (engine, scaler,
//! window and the time of the last cycle). Sensors, display and clock are borrowed per
//! call, so the same code runs against the RP2350 peripherals and against host fakes.
//!
//! # Cycle
//!
//! ```text
//! poll() every 100 ms
//!   └─ ≥ 31 s since last cycle?
//!        read A, read B ──fail──▶ SensorFailed (window untouched)
//!        standardize, push
//!        window full? ──no──▶ Collecting(n/10)
//!        marshal → invoke → read 3 outputs ──fail──▶ InferenceFailed (display untouched)
//!        show forecast ─────▶ Forecast
//!   └─ last cycle time = now, whatever the outcome
//! ```

use core::fmt;

use crate::config::SAMPLE_INTERVAL_MS;
use crate::display::{PresentError, TextDisplay, screens};
use crate::inference::{self, Forecast, InferenceEngine, InferenceError, InitError};
use crate::scaler::{Scaler, ScalerError};
use crate::sensors::{RawSample, SampleSource, SensorError};
use crate::window::{PushOutcome, SlidingWindow};

// =============================================================================
// Clock
// =============================================================================

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// =============================================================================
// Reports
// =============================================================================

/// The system could not be brought up. Fatal: the firmware halts.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum StartupError {
    /// Compiled-in standardization table is unusable.
    Scaler(ScalerError),
    /// Inference engine failed to initialize.
    Engine(InitError),
}

impl From<ScalerError> for StartupError {
    fn from(err: ScalerError) -> Self { Self::Scaler(err) }
}

impl From<InitError> for StartupError {
    fn from(err: InitError) -> Self { Self::Engine(err) }
}

impl fmt::Display for StartupError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Scaler(ScalerError::ZeroScale(feature)) => write!(f, "scaler: zero scale for {}", feature.name()),
            Self::Scaler(ScalerError::NonFinite(feature)) => write!(f, "scaler: non-finite entry for {}", feature.name()),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

/// Outcome of one sampling cycle.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum CycleReport {
    /// A sensor read failed; nothing was stored.
    SensorFailed(SensorError),
    /// Sample stored, window not full yet.
    Collecting { sample: RawSample, collected: usize },
    /// Forecast produced. `display` is the result of showing it.
    Forecast {
        sample: RawSample,
        forecast: Forecast,
        window_completed: bool,
        display: Result<(), PresentError>,
    },
    /// Sample stored but the prediction failed; the previous forecast stays on screen.
    InferenceFailed {
        sample: RawSample,
        error: InferenceError,
        window_completed: bool,
    },
}

impl CycleReport {
    /// The readings taken this cycle, if both sensors answered.
    pub const fn sample(&self) -> Option<&RawSample> {
        match self {
            Self::SensorFailed(_) => None,
            Self::Collecting { sample, .. } | Self::Forecast { sample, .. } | Self::InferenceFailed { sample, .. } => {
                Some(sample)
            }
        }
    }

    /// True if this cycle's push filled the window for the first time.
    pub const fn window_completed(&self) -> bool {
        matches!(
            self,
            Self::Forecast {
                window_completed: true,
                ..
            } | Self::InferenceFailed {
                window_completed: true,
                ..
            }
        )
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Sampling loop state.
pub struct Scheduler<E> {
    engine: E,
    scaler: Scaler,
    window: SlidingWindow,
    last_sample_ms: u64,
}

impl<E: InferenceEngine> Scheduler<E> {
    /// Initialize `engine` and show the ready screen.
    ///
    /// On failure the fatal screen is shown and the error returned; no scheduler exists,
    /// so no sensor is ever read. The first cycle runs one full interval after start.
    pub fn start<D, C>(
        mut engine: E,
        scaler: Scaler,
        display: &mut D,
        clock: &C,
    ) -> Result<Self, StartupError>
    where
        D: TextDisplay + ?Sized,
        C: Clock + ?Sized,
    {
        if let Err(err) = engine.init() {
            // The error screen is best effort; the init failure is what gets reported.
            screens::show_fatal(display, err).ok();
            return Err(StartupError::Engine(err));
        }
        screens::show_ready(display).ok();

        Ok(Self {
            engine,
            scaler,
            window: SlidingWindow::new(),
            last_sample_ms: clock.now_ms(),
        })
    }

    /// Run one cycle if the sampling interval has elapsed.
    ///
    /// Returns `None` when it is not time yet. The interval restarts after every cycle,
    /// including failed ones.
    pub fn poll<C, S, D>(
        &mut self,
        clock: &C,
        sensors: &mut S,
        display: &mut D,
    ) -> Option<CycleReport>
    where
        C: Clock + ?Sized,
        S: SampleSource + ?Sized,
        D: TextDisplay + ?Sized,
    {
        if clock.now_ms().saturating_sub(self.last_sample_ms) < SAMPLE_INTERVAL_MS {
            return None;
        }
        let report = self.cycle(sensors, display);
        self.last_sample_ms = clock.now_ms();
        Some(report)
    }

    fn cycle<S, D>(
        &mut self,
        sensors: &mut S,
        display: &mut D,
    ) -> CycleReport
    where
        S: SampleSource + ?Sized,
        D: TextDisplay + ?Sized,
    {
        let sample = match sensors.read_sample() {
            Ok(sample) => sample,
            Err(err) => return CycleReport::SensorFailed(err),
        };

        let mut vector = sample.features();
        self.scaler.standardize_in_place(&mut vector);
        let window_completed = self.window.push(vector) == PushOutcome::BecameFull;

        let Some(snapshot) = self.window.snapshot() else {
            return CycleReport::Collecting {
                sample,
                collected: self.window.len(),
            };
        };

        match inference::predict(&mut self.engine, &snapshot) {
            Ok(forecast) => CycleReport::Forecast {
                sample,
                forecast,
                window_completed,
                display: screens::show_forecast(display, &forecast),
            },
            Err(error) => CycleReport::InferenceFailed {
                sample,
                error,
                window_completed,
            },
        }
    }

    /// Tensor arena usage reported by the engine.
    pub fn arena_used_bytes(&self) -> usize { self.engine.arena_used_bytes() }
}

// =============================================================================
// Unit Tests
// =============================================================================
