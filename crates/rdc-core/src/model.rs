//! Core data model for scratch-notes documents.
//!
//! A notes document is a flat, ordered list of blocks (text lines, two-column
//! rows, spacers and stacks) framed by a set of layout options. Documents are
//! built by the parser and never mutated afterwards; a changed source text
//! produces a whole new `Document`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use winnow::combinator::{delimited, eof, opt};
use winnow::prelude::*;
use winnow::token::take_while;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Self = Self::from_argb(0xFFFF_0000);
    pub const GREEN: Self = Self::from_argb(0xFF4C_AF50);
    pub const BLUE: Self = Self::from_argb(0xFF21_96F3);
    pub const WHITE: Self = Self::from_argb(0xFFFF_FFFF);
    pub const BLACK: Self = Self::from_argb(0xFF00_0000);
    pub const GRAY: Self = Self::from_argb(0xFF88_8888);
    pub const YELLOW: Self = Self::from_argb(0xFFFF_EB3B);
    pub const CYAN: Self = Self::from_argb(0xFF00_BCD4);
    pub const MAGENTA: Self = Self::from_argb(0xFFE9_1E63);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a packed `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 0xFF
    }

    /// Look up a named color, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "gray" | "grey" => Self::GRAY,
            "yellow" => Self::YELLOW,
            "cyan" => Self::CYAN,
            "magenta" => Self::MAGENTA,
            _ => return None,
        };
        Some(color)
    }

    /// Parse a hex color: `RRGGBB` or `AARRGGBB`, with or without a leading `#`.
    ///
    /// Six digits are fully opaque; eight digits carry alpha in the leading byte.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let mut input = hex;
        let digits = hex_literal.parse_next(&mut input).ok()?;
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Self::from_argb(0xFF00_0000 | value)),
            8 => Some(Self::from_argb(value)),
            _ => None,
        }
    }

    /// Resolve a color as written in a notes document: a name or a hex literal.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_name(s).or_else(|| Self::from_hex(s))
    }

    /// `#RRGGBB` when opaque, `#AARRGGBB` otherwise.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:08X}", self.to_argb())
        }
    }
}

fn hex_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited(
        opt('#'),
        take_while(1.., |c: char| c.is_ascii_hexdigit()),
        eof,
    )
    .parse_next(input)
}

// ─── Styled text ─────────────────────────────────────────────────────────

/// A run of text with its own style. Unset attributes use the renderer's defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyledSpan {
    pub text: String,
    pub font_size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Color>,
}

impl StyledSpan {
    /// Unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Same style, different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A sequence of styled spans. Each span keeps its own style; nothing
/// carries over from one span into the next.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichText {
    spans: SmallVec<[StyledSpan; 1]>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, span: StyledSpan) {
        self.spans.push(span);
    }

    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn lines(&self) -> Vec<Vec<StyledSpan>> {
        split_lines(&self.spans)
    }
}

impl FromIterator<StyledSpan> for RichText {
    fn from_iter<I: IntoIterator<Item = StyledSpan>>(iter: I) -> Self {
        Self {
            spans: iter.into_iter().collect(),
        }
    }
}

/// Split spans into lines at every `\n`, cutting spans where needed.
///
/// Empty pieces left over from a cut are dropped, so a bare `"\n"` span is
/// only a line break. A span that was empty to begin with is kept: it still
/// carries a font size the line has to make room for.
pub fn split_lines(spans: &[StyledSpan]) -> Vec<Vec<StyledSpan>> {
    let mut lines = vec![Vec::new()];
    for span in spans {
        let pieces: SmallVec<[&str; 2]> = span.text.split('\n').collect();
        let whole = pieces.len() == 1;
        for (i, piece) in pieces.iter().enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if whole || !piece.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push(span.with_text(*piece));
                }
            }
        }
    }
    lines
}

// ─── Blocks ──────────────────────────────────────────────────────────────

/// One row of a rows-stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StackRow {
    Text { span: StyledSpan },
    Columns { left: StyledSpan, right: StyledSpan },
}

/// One renderable unit of a notes document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A single styled line.
    Text { span: StyledSpan },

    /// Two spans pushed to the left and right edges.
    Columns { left: StyledSpan, right: StyledSpan },

    /// Empty vertical space of `amount × base unit`. Never negative.
    Newline { amount: f32 },

    /// A stack with no `columns` items, merged into one multi-line text.
    /// `line_height` of `None` leaves line spacing to the renderer.
    TextStack {
        content: RichText,
        line_height: Option<f32>,
    },

    /// A stack with at least one `columns` item. Rows advance by
    /// `row height × row_mult`, overlapping when `row_mult < 1`.
    RowsStack { rows: Vec<StackRow>, row_mult: f32 },
}

impl Block {
    /// Short kind name, used in logs and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Text { .. } => "text",
            Block::Columns { .. } => "columns",
            Block::Newline { .. } => "newline",
            Block::TextStack { .. } => "text-stack",
            Block::RowsStack { .. } => "rows-stack",
        }
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// Horizontal margin and inner padding around the rendered notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub margin_h: i32,
    pub padding_h: i32,
    pub padding_v: i32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            margin_h: 0,
            padding_h: 12,
            padding_v: 6,
        }
    }
}

impl LayoutOptions {
    /// Overlay the fields a `layout` node sets; absent fields keep their value.
    #[must_use]
    pub fn apply(self, patch: &LayoutPatch) -> Self {
        Self {
            margin_h: patch.margin_h.unwrap_or(self.margin_h),
            padding_h: patch.padding_h.unwrap_or(self.padding_h),
            padding_v: patch.padding_v.unwrap_or(self.padding_v),
        }
    }
}

/// The fields present in one `layout` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutPatch {
    pub margin_h: Option<i32>,
    pub padding_h: Option<i32>,
    pub padding_v: Option<i32>,
}

/// A parsed notes document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub layout: LayoutOptions,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
