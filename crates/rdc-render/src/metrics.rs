//! Text measurement without a font rasterizer.
//!
//! Widths are a fixed fraction of the font size per character, which is close
//! enough for a sans-serif face to place right-aligned columns and size the
//! canvas. Heights follow the usual 1.25 line spacing.

use rdc_core::{Size, StyledSpan, TextMeasure, split_lines};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateMeasurer {
    /// Font size for spans that don't set one.
    pub default_font_size: f32,
    /// Advance per character, as a fraction of the font size.
    pub char_width: f32,
    /// Natural line height, as a fraction of the line's largest font size.
    pub line_spacing: f32,
}

impl Default for EstimateMeasurer {
    fn default() -> Self {
        Self {
            default_font_size: 16.0,
            char_width: 0.55,
            line_spacing: 1.25,
        }
    }
}

impl EstimateMeasurer {
    pub fn with_font_size(default_font_size: f32) -> Self {
        Self {
            default_font_size,
            ..Self::default()
        }
    }

    pub fn font_size(&self, span: &StyledSpan) -> f32 {
        span.font_size.unwrap_or(self.default_font_size)
    }

    /// Width of one line of spans.
    pub fn line_width(&self, line: &[StyledSpan]) -> f32 {
        line.iter()
            .map(|span| span.text.chars().count() as f32 * self.font_size(span) * self.char_width)
            .sum()
    }

    /// Natural height of one line: the largest font on it, spaced.
    pub fn line_height(&self, line: &[StyledSpan]) -> f32 {
        let largest = line
            .iter()
            .map(|span| self.font_size(span))
            .fold(None, |max: Option<f32>, size| Some(max.map_or(size, |m| m.max(size))))
            .unwrap_or(self.default_font_size);
        largest * self.line_spacing
    }
}

impl TextMeasure for EstimateMeasurer {
    fn measure(&self, spans: &[StyledSpan], line_height: Option<f32>) -> Size {
        split_lines(spans).iter().fold(Size::default(), |size, line| Size {
            width: size.width.max(self.line_width(line)),
            height: size.height + line_height.unwrap_or_else(|| self.line_height(line)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sized(text: &str, size: f32) -> StyledSpan {
        StyledSpan {
            font_size: Some(size),
            ..StyledSpan::plain(text)
        }
    }

    #[test]
    fn unsized_span_uses_default_font() {
        let size = EstimateMeasurer::default().measure(&[StyledSpan::plain("abcd")], None);
        assert_eq!(size, Size { width: 4.0 * 16.0 * 0.55, height: 20.0 });
    }

    #[test]
    fn largest_font_sets_line_height() {
        let size = EstimateMeasurer::default().measure(&[sized("a", 40.0), StyledSpan::plain("b")], None);
        assert_eq!(size.height, 50.0);
    }

    #[test]
    fn lines_stack_and_widest_wins() {
        let spans = [sized("ab", 20.0), StyledSpan::plain("\n"), sized("abcdef", 20.0)];
        let size = EstimateMeasurer::default().measure(&spans, None);
        assert_eq!(size.height, 50.0);
        assert_eq!(size.width, 6.0 * 20.0 * 0.55);
    }

    #[test]
    fn explicit_line_height_overrides() {
        let spans = [sized("a", 40.0), StyledSpan::plain("\n"), StyledSpan::plain("b")];
        let size = EstimateMeasurer::default().measure(&spans, Some(12.0));
        assert_eq!(size.height, 24.0);
    }

    #[test]
    fn empty_text_is_one_line() {
        let size = EstimateMeasurer::with_font_size(20.0).measure(&[], None);
        assert_eq!(size, Size { width: 0.0, height: 25.0 });
    }
}
