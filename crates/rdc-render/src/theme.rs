use rdc_core::Color;

/// Colors and type for rendered notes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTheme {
    pub background: Color,
    /// Fill for spans without a color of their own.
    pub text_color: Color,
    pub font_family: String,
    pub default_font_size: f32,
    /// Canvas width; columns are pushed to its edges.
    pub page_width: f32,
}

impl RenderTheme {
    /// Dark card, as the notes were designed for.
    pub fn dark() -> Self {
        Self {
            background: Color::from_argb(0xFF12_1212),
            text_color: Color::WHITE,
            font_family: "Roboto, system-ui, sans-serif".to_string(),
            default_font_size: 16.0,
            page_width: 400.0,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::WHITE,
            text_color: Color::BLACK,
            ..Self::dark()
        }
    }
}

impl Default for RenderTheme {
    fn default() -> Self {
        Self::dark()
    }
}
