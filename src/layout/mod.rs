//! Text layout for the terminal surface
//!
//! Everything here works in pixels but knows nothing about how glyphs are
//! drawn. Widths come from a [`TextMeasurer`]; the algorithms take a plain
//! `Fn(&str) -> f64` so they can be exercised without a canvas.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ TextMeasurer │ -> │  wrap/cursor │ -> │  scrollback  │
//! │  (pixels)    │    │  (sub-lines) │    │  (suffix)    │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```

pub mod cursor;
pub mod scrollback;
pub mod wrap;

pub use cursor::{break_chars, locate_cursor, CursorPosition};
pub use scrollback::fit_scrollback;
pub use wrap::wrap_words;

use serde::{Deserialize, Serialize};

/// A font as the canvas understands it: size in pixels plus a family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub size_px: f64,
    pub family: String,
}

impl FontSpec {
    pub fn monospace(size_px: f64) -> Self {
        Self {
            size_px,
            family: "monospace".to_string(),
        }
    }

    /// CSS shorthand, e.g. `18px monospace`
    pub fn css(&self) -> String {
        format!("{}px {}", self.size_px, self.family)
    }
}

/// Source of rendered string widths
pub trait TextMeasurer {
    /// Width in pixels of `text` drawn with `font`
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64;
}

/// Fixed-advance measurer for hosts without a real font stack.
///
/// Every character advances `font.size_px * ratio` pixels. 0.6 is the usual
/// advance/em ratio of monospace faces.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    pub ratio: f64,
}

impl MonospaceMeasurer {
    pub fn new() -> Self {
        Self { ratio: 0.6 }
    }

    pub fn with_ratio(ratio: f64) -> Self {
        Self { ratio }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * font.size_px * self.ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_css() {
        assert_eq!(FontSpec::monospace(18.0).css(), "18px monospace");
    }

    #[test]
    fn test_monospace_measurer() {
        let m = MonospaceMeasurer::with_ratio(0.5);
        let font = FontSpec::monospace(20.0);
        assert_eq!(m.measure_width("", &font), 0.0);
        assert_eq!(m.measure_width("abcd", &font), 40.0);
        // Counts characters, not bytes
        assert_eq!(m.measure_width("┃", &font), 10.0);
    }
}
