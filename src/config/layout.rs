//! OLED layout constants (SSD1306, 128x64, ProFont 7pt).
//!
//! Rows are the top edge of each text line in pixels.

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 64;

/// Vertical distance between stacked status lines.
pub const LINE_HEIGHT: i32 = 12;

/// Longest text line that is ever formatted for the display.
pub const TEXT_LINE_LEN: usize = 24;

/// Title row.
pub const ROW_TITLE: i32 = 0;

/// First row below the title (leaves a gap under the title on the yellow band of two-tone panels).
pub const ROW_FIRST: i32 = 16;

/// Row of the error detail on the fatal screen.
pub const ROW_ERROR_DETAIL: i32 = 20;

/// Status line of the boot screen.
pub const ROW_BOOT_STATUS: i32 = 32;

/// Left margin.
pub const COL_LEFT: i32 = 0;

/// Row of the n-th line below the title (0-based).
#[inline]
pub const fn body_row(line: usize) -> i32 { ROW_FIRST + LINE_HEIGHT * line as i32 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_rows() {
        assert_eq!(body_row(0), 16);
        assert_eq!(body_row(1), 28);
        assert_eq!(body_row(2), 40);
    }

    #[test]
    fn test_rows_fit_on_screen() {
        assert!(body_row(3) < SCREEN_HEIGHT as i32);
    }
}
