//! Plain-text rendering for terminals.
//!
//! Styles are dropped. Columns are padded so the right entry ends at
//! `width`, and spacers become blank lines at one line per 4 units.

use rdc_core::{Block, Document, StackRow, StyledSpan, round_half_up};

/// Spacer amount that makes one blank line.
const UNITS_PER_LINE: f32 = 4.0;

/// Most blank lines a single spacer prints.
const MAX_BLANK_LINES: usize = 50;

pub fn render_plain(doc: &Document, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();

    for block in &doc.blocks {
        match block {
            Block::Text { span } => lines.extend(span.text.split('\n').map(str::to_string)),
            Block::Columns { left, right } => lines.push(columns(left, right, width)),
            Block::Newline { amount } => {
                let blank = round_half_up(amount / UNITS_PER_LINE).clamp(0.0, MAX_BLANK_LINES as f32) as usize;
                lines.extend(std::iter::repeat_n(String::new(), blank));
            }
            Block::TextStack { content, .. } => lines.extend(
                content
                    .lines()
                    .iter()
                    .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>()),
            ),
            Block::RowsStack { rows, .. } => lines.extend(rows.iter().map(|row| match row {
                StackRow::Text { span } => span.text.clone(),
                StackRow::Columns { left, right } => columns(left, right, width),
            })),
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// `left` and `right` on one line, at least one space apart.
fn columns(left: &StyledSpan, right: &StyledSpan, width: usize) -> String {
    let used = left.text.chars().count() + right.text.chars().count();
    let gap = width.saturating_sub(used).max(1);
    format!("{}{}{}", left.text, " ".repeat(gap), right.text)
}
