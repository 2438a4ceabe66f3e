//! Text presentation on the status OLED.
//!
//! The scheduler only needs three primitives (clear, draw a line of text, push the frame),
//! captured by [`TextDisplay`]. [`oled::Oled`] implements it on an SSD1306;
//! [`screens`] composes the fixed screens on top of it.

pub mod oled;
pub mod screens;

pub use oled::Oled;

/// A frame could not be drawn or sent to the panel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum PresentError {
    /// Controller did not accept the init sequence.
    Init,
    /// Text could not be rendered into the frame buffer.
    Draw,
    /// Frame buffer transfer failed.
    Flush,
}

/// Minimal buffered text surface.
///
/// `clear` and `draw_text` only touch the frame buffer; nothing is visible until `flush`.
pub trait TextDisplay {
    /// Blank the frame buffer.
    fn clear(&mut self);

    /// Draw one line of text with its top-left corner at `(x, y)`.
    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
    ) -> Result<(), PresentError>;

    /// Send the frame buffer to the panel.
    fn flush(&mut self) -> Result<(), PresentError>;
}
