//! Fixed screens shown by the firmware.
//!
//! ```text
//! y    Boot              Ready              Forecast           Fatal
//!  0   TinyML Temp       READY!             Temp Prediction    ERROR!
//! 16   CNN 1D Model      Collecting data    +5m: 21.3C
//! 20                                                           TFLM Init: 3
//! 28                     time window        +10m: 21.4C
//! 32   Initializing...
//! 40                     (10 samples)       +15m: 21.6C
//! ```

use core::fmt::Write;

use heapless::String;

use super::{PresentError, TextDisplay};
use crate::config::TEXT_LINE_LEN;
use crate::config::layout::{COL_LEFT, ROW_BOOT_STATUS, ROW_ERROR_DETAIL, ROW_FIRST, ROW_TITLE, body_row};
use crate::inference::{Forecast, InitError};

/// One formatted display line.
pub type Line = String<TEXT_LINE_LEN>;

/// Clear, draw every `(text, row)` at the left margin, flush.
fn present<D: TextDisplay + ?Sized>(
    display: &mut D,
    lines: &[(&str, i32)],
) -> Result<(), PresentError> {
    display.clear();
    for (text, row) in lines {
        display.draw_text(text, COL_LEFT, *row)?;
    }
    display.flush()
}

/// Splash shown while the engine starts.
pub fn show_boot<D: TextDisplay + ?Sized>(display: &mut D) -> Result<(), PresentError> {
    present(
        display,
        &[("TinyML Temp", ROW_TITLE), ("CNN 1D Model", ROW_FIRST), ("Initializing...", ROW_BOOT_STATUS)],
    )
}

/// Engine is up; waiting for the first full window.
pub fn show_ready<D: TextDisplay + ?Sized>(display: &mut D) -> Result<(), PresentError> {
    present(
        display,
        &[
            ("READY!", ROW_TITLE),
            ("Collecting data", body_row(0)),
            ("time window", body_row(1)),
            ("(10 samples)", body_row(2)),
        ],
    )
}

/// Engine start-up failed. Stays on screen until reset.
pub fn show_fatal<D: TextDisplay + ?Sized>(
    display: &mut D,
    error: InitError,
) -> Result<(), PresentError> {
    let mut detail = Line::new();
    write!(detail, "TFLM Init: {}", error.code()).ok();
    present(display, &[("ERROR!", ROW_TITLE), (detail.as_str(), ROW_ERROR_DETAIL)])
}

/// Latest forecast, one line per horizon.
pub fn show_forecast<D: TextDisplay + ?Sized>(
    display: &mut D,
    forecast: &Forecast,
) -> Result<(), PresentError> {
    display.clear();
    display.draw_text("Temp Prediction", COL_LEFT, ROW_TITLE)?;
    for (i, (minutes, celsius)) in forecast.horizons().enumerate() {
        display.draw_text(&horizon_line(minutes, celsius), COL_LEFT, body_row(i))?;
    }
    display.flush()
}

/// `+5m: 21.3C`. Values too long for a line are cut at the last field that fits.
pub fn horizon_line(
    minutes: u16,
    celsius: f32,
) -> Line {
    let mut line = Line::new();
    write!(line, "+{minutes}m: {celsius:.1}C").ok();
    line
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every frame that is flushed.
    #[derive(Default)]
    pub(crate) struct RecordingDisplay {
        pending: Vec<(std::string::String, i32, i32)>,
        pub frames: Vec<Vec<(std::string::String, i32, i32)>>,
        pub fail_flush: bool,
    }

    impl RecordingDisplay {
        /// Text of the last flushed frame, top to bottom.
        pub(crate) fn last_text(&self) -> Vec<&str> {
            self.frames.last().map(|f| f.iter().map(|(t, _, _)| t.as_str()).collect()).unwrap_or_default()
        }

        pub(crate) fn last_rows(&self) -> Vec<i32> {
            self.frames.last().map(|f| f.iter().map(|(_, _, y)| *y).collect()).unwrap_or_default()
        }
    }

    impl TextDisplay for RecordingDisplay {
        fn clear(&mut self) { self.pending.clear(); }

        fn draw_text(
            &mut self,
            text: &str,
            x: i32,
            y: i32,
        ) -> Result<(), PresentError> {
            self.pending.push((text.into(), x, y));
            Ok(())
        }

        fn flush(&mut self) -> Result<(), PresentError> {
            if self.fail_flush {
                return Err(PresentError::Flush);
            }
            self.frames.push(self.pending.clone());
            Ok(())
        }
    }

    #[test]
    fn test_horizon_line_format() {
        assert_eq!(horizon_line(5, 1.0).as_str(), "+5m: 1.0C");
        assert_eq!(horizon_line(15, 21.66).as_str(), "+15m: 21.7C");
        assert_eq!(horizon_line(10, -3.24).as_str(), "+10m: -3.2C");
    }

    #[test]
    fn test_horizon_line_overflow_is_cut() {
        let line = horizon_line(5, f32::MAX);
        assert!(line.len() <= TEXT_LINE_LEN);
        assert!(line.starts_with("+5m"));
    }

    #[test]
    fn test_boot_screen() {
        let mut display = RecordingDisplay::default();
        show_boot(&mut display).unwrap();
        assert_eq!(display.last_text(), vec!["TinyML Temp", "CNN 1D Model", "Initializing..."]);
        assert_eq!(display.last_rows(), vec![0, 16, 32]);
    }

    #[test]
    fn test_ready_screen() {
        let mut display = RecordingDisplay::default();
        show_ready(&mut display).unwrap();
        assert_eq!(display.last_text(), vec!["READY!", "Collecting data", "time window", "(10 samples)"]);
        assert_eq!(display.last_rows(), vec![0, 16, 28, 40]);
    }

    #[test]
    fn test_fatal_screen() {
        let mut display = RecordingDisplay::default();
        show_fatal(&mut display, InitError::AllocateTensors).unwrap();
        assert_eq!(display.last_text(), vec!["ERROR!", "TFLM Init: 3"]);
        assert_eq!(display.last_rows(), vec![0, 20]);
    }

    #[test]
    fn test_forecast_screen() {
        let mut display = RecordingDisplay::default();
        show_forecast(&mut display, &Forecast::new([1.0, 2.0, 3.0])).unwrap();
        assert_eq!(display.last_text(), vec!["Temp Prediction", "+5m: 1.0C", "+10m: 2.0C", "+15m: 3.0C"]);
        assert_eq!(display.last_rows(), vec![0, 16, 28, 40]);
    }

    #[test]
    fn test_flush_error_propagates() {
        let mut display = RecordingDisplay {
            fail_flush: true,
            ..Default::default()
        };
        assert_eq!(show_ready(&mut display), Err(PresentError::Flush));
        assert!(display.frames.is_empty());
    }
}
