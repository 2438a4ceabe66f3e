//! SSD1306 128x64 monochrome OLED in buffered graphics mode.

use display_interface::WriteOnlyDataCommand;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use profont::PROFONT_7_POINT;
use ssd1306::Ssd1306;
use ssd1306::mode::{BufferedGraphicsMode, DisplayConfig};
use ssd1306::prelude::{DisplayRotation, DisplaySize128x64};

use super::{PresentError, TextDisplay};

/// Status text: ProFont 7pt, lit pixels on a dark background.
pub const TEXT_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&PROFONT_7_POINT, BinaryColor::On);

/// Draw `text` with its top edge at `y`.
pub fn draw_line<D>(
    target: &mut D,
    text: &str,
    x: i32,
    y: i32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(text, Point::new(x, y), TEXT_STYLE, Baseline::Top).draw(target)?;
    Ok(())
}

type Driver<DI> = Ssd1306<DI, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// OLED driver with a local frame buffer.
pub struct Oled<DI> {
    driver: Driver<DI>,
}

impl<DI: WriteOnlyDataCommand> Oled<DI> {
    pub fn new(interface: DI) -> Self {
        Self {
            driver: Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0).into_buffered_graphics_mode(),
        }
    }

    /// Run the controller init sequence and blank the panel.
    pub fn init(&mut self) -> Result<(), PresentError> {
        self.driver.init().map_err(|_| PresentError::Init)?;
        self.driver.clear_buffer();
        self.driver.flush().map_err(|_| PresentError::Flush)
    }
}

impl<DI: WriteOnlyDataCommand> TextDisplay for Oled<DI> {
    fn clear(&mut self) { self.driver.clear_buffer(); }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
    ) -> Result<(), PresentError> {
        draw_line(&mut self.driver, text, x, y).map_err(|_| PresentError::Draw)
    }

    fn flush(&mut self) -> Result<(), PresentError> { self.driver.flush().map_err(|_| PresentError::Flush) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use display_interface::{DataFormat, DisplayError};
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;

    #[derive(Default)]
    struct Traffic {
        commands: usize,
        data_bytes: usize,
    }

    /// Panel interface that counts what the driver sends.
    struct FakeInterface {
        traffic: Rc<RefCell<Traffic>>,
        fail: bool,
    }

    fn payload_len(format: DataFormat<'_>) -> usize {
        match format {
            DataFormat::U8(bytes) => bytes.len(),
            DataFormat::U8Iter(iter) => iter.count(),
            _ => 0,
        }
    }

    impl WriteOnlyDataCommand for FakeInterface {
        fn send_commands(
            &mut self,
            cmd: DataFormat<'_>,
        ) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::BusWriteError);
            }
            self.traffic.borrow_mut().commands += payload_len(cmd);
            Ok(())
        }

        fn send_data(
            &mut self,
            buf: DataFormat<'_>,
        ) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::BusWriteError);
            }
            self.traffic.borrow_mut().data_bytes += payload_len(buf);
            Ok(())
        }
    }

    fn oled(fail: bool) -> (Oled<FakeInterface>, Rc<RefCell<Traffic>>) {
        let traffic = Rc::new(RefCell::new(Traffic::default()));
        let interface = FakeInterface {
            traffic: Rc::clone(&traffic),
            fail,
        };
        (Oled::new(interface), traffic)
    }

    #[test]
    fn test_init_sends_configuration() {
        let (mut display, traffic) = oled(false);
        assert_eq!(display.init(), Ok(()));
        assert!(traffic.borrow().commands > 0);
    }

    #[test]
    fn test_init_bus_failure() {
        let (mut display, _) = oled(true);
        assert_eq!(display.init(), Err(PresentError::Init));
    }

    #[test]
    fn test_text_frame_round_trip() {
        let (mut display, _) = oled(false);
        display.init().unwrap();
        display.clear();
        assert_eq!(display.draw_text("Temp Prediction", 0, 0), Ok(()));
        assert_eq!(TextDisplay::flush(&mut display), Ok(()));
    }

    #[test]
    fn test_flush_bus_failure() {
        let (mut display, _) = oled(true);
        display.clear();
        display.draw_text("ERROR!", 0, 0).unwrap();
        assert_eq!(TextDisplay::flush(&mut display), Err(PresentError::Flush));
    }

    #[test]
    fn test_draw_line_starts_at_row() {
        let mut display = MockDisplay::<BinaryColor>::new();
        draw_line(&mut display, "+5m", 0, 16).unwrap();

        let area = display.affected_area();
        assert!(!area.is_zero_sized());
        assert!(area.top_left.y >= 16);
        assert!(area.top_left.x >= 0);
    }

    #[test]
    fn test_title_row_is_on_screen() {
        let mut display = MockDisplay::<BinaryColor>::new();
        draw_line(&mut display, "ERROR!", 0, 0).unwrap();

        let area = display.affected_area();
        assert!(!area.is_zero_sized());
        assert!(area.top_left.y >= 0);
        assert!(area.bottom_right().is_some_and(|p| p.y < 16));
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let mut display = MockDisplay::<BinaryColor>::new();
        draw_line(&mut display, "", 0, 0).unwrap();
        assert!(display.affected_area().is_zero_sized());
    }
}
