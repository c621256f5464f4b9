//! Block layout engine.
//!
//! Blocks flow top to bottom with no gap between them. A `Newline` is
//! `amount × base_unit` of empty space. Rows of a rows-stack are packed with
//! the stack's row multiplier: each row advances the cursor by its rounded,
//! scaled height, and the last row always contributes its full height.
//!
//! Text measurement belongs to the host; it is supplied through `TextMeasure`.

use crate::model::*;

/// Natural size of measured content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Measures styled text the way the host renderer will draw it.
pub trait TextMeasure {
    /// Natural size of `spans`, which may contain line breaks. When
    /// `line_height` is set every line is exactly that tall.
    fn measure(&self, spans: &[StyledSpan], line_height: Option<f32>) -> Size;
}

/// Layout parameters that don't come from the document itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Height of a `newline` spacer with amount 1.
    pub base_unit: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { base_unit: 4.0 }
    }
}

// ─── Stack packing ───────────────────────────────────────────────────────

/// Round to the nearest whole unit, ties toward positive infinity.
pub fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

/// Row offsets inside a stack, relative to the stack's top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackPlacement {
    pub offsets: Vec<f32>,
    pub total_height: f32,
}

/// Pack rows of the given natural heights.
///
/// Every row but the last advances the cursor by
/// `round_half_up(height × row_mult)`. The stack is as tall as the last row's
/// offset plus its full height, so the final line is never clipped.
pub fn stack_offsets(heights: &[f32], row_mult: f32) -> StackPlacement {
    let Some((last, rest)) = heights.split_last() else {
        return StackPlacement::default();
    };

    let mut offsets = Vec::with_capacity(heights.len());
    let mut y = 0.0;
    for height in rest {
        offsets.push(y);
        y += round_half_up(height * row_mult);
    }
    offsets.push(y);

    StackPlacement {
        offsets,
        total_height: y + last,
    }
}

// ─── Document flow ───────────────────────────────────────────────────────

/// One row of a placed rows-stack; `y` is relative to the stack's top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedRow {
    pub y: f32,
    pub height: f32,
}

/// A block with its vertical position in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock<'a> {
    pub block: &'a Block,
    pub y: f32,
    pub height: f32,
    /// Row placements, only for `Block::RowsStack`.
    pub rows: Vec<PlacedRow>,
}

/// Every block placed, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentLayout<'a> {
    pub blocks: Vec<PlacedBlock<'a>>,
    pub height: f32,
}

/// Lay out a whole document.
pub fn layout_document<'a>(
    doc: &'a Document,
    config: &LayoutConfig,
    measurer: &dyn TextMeasure,
) -> DocumentLayout<'a> {
    layout_blocks(&doc.blocks, config, measurer)
}

/// Place `blocks` one after another starting at y = 0.
///
/// A block whose height overflows to infinity takes no space.
pub fn layout_blocks<'a>(
    blocks: &'a [Block],
    config: &LayoutConfig,
    measurer: &dyn TextMeasure,
) -> DocumentLayout<'a> {
    let mut y = 0.0;
    let mut placed = Vec::with_capacity(blocks.len());

    for block in blocks {
        let (height, rows) = measure_block(block, config, measurer);
        let height = if height.is_finite() { height } else { 0.0 };
        log::trace!("{} at y={y} h={height}", block.kind_name());
        placed.push(PlacedBlock {
            block,
            y,
            height,
            rows,
        });
        y = (y + height).min(f32::MAX);
    }

    DocumentLayout {
        blocks: placed,
        height: y,
    }
}

fn measure_block(block: &Block, config: &LayoutConfig, measurer: &dyn TextMeasure) -> (f32, Vec<PlacedRow>) {
    match block {
        Block::Text { span } => (measure_span(measurer, span), Vec::new()),
        Block::Columns { left, right } => (measure_columns(measurer, left, right), Vec::new()),
        Block::Newline { amount } => (amount * config.base_unit, Vec::new()),
        Block::TextStack {
            content,
            line_height,
        } => (measurer.measure(content.spans(), *line_height).height, Vec::new()),
        Block::RowsStack { rows, row_mult } => {
            let heights: Vec<f32> = rows
                .iter()
                .map(|row| match row {
                    StackRow::Text { span } => measure_span(measurer, span),
                    StackRow::Columns { left, right } => measure_columns(measurer, left, right),
                })
                .collect();
            let placement = stack_offsets(&heights, *row_mult);
            let rows = placement
                .offsets
                .iter()
                .zip(&heights)
                .map(|(&y, &height)| PlacedRow { y, height })
                .collect();
            (placement.total_height, rows)
        }
    }
}

fn measure_span(measurer: &dyn TextMeasure, span: &StyledSpan) -> f32 {
    measurer.measure(std::slice::from_ref(span), None).height
}

fn measure_columns(measurer: &dyn TextMeasure, left: &StyledSpan, right: &StyledSpan) -> f32 {
    measure_span(measurer, left).max(measure_span(measurer, right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use pretty_assertions::assert_eq;

    /// Every line is `font_size` tall (default 20), or the explicit line height.
    struct FixedLines;

    impl TextMeasure for FixedLines {
        fn measure(&self, spans: &[StyledSpan], line_height: Option<f32>) -> Size {
            let height = split_lines(spans)
                .iter()
                .map(|line| {
                    line_height.unwrap_or_else(|| {
                        line.iter()
                            .filter_map(|s| s.font_size)
                            .fold(20.0, f32::max)
                    })
                })
                .sum();
            Size { width: 0.0, height }
        }
    }

    #[test]
    fn half_overlap_of_two_rows() {
        let placement = stack_offsets(&[40.0, 40.0], 0.5);
        assert_eq!(placement.offsets, vec![0.0, 20.0]);
        assert_eq!(placement.total_height, 60.0);
    }

    #[test]
    fn unit_multiplier_is_single_spacing() {
        let placement = stack_offsets(&[10.0, 20.0, 30.0], 1.0);
        assert_eq!(placement.offsets, vec![0.0, 10.0, 30.0]);
        assert_eq!(placement.total_height, 60.0);
    }

    #[test]
    fn multiplier_above_one_adds_gap() {
        let placement = stack_offsets(&[20.0, 20.0], 1.5);
        assert_eq!(placement.offsets, vec![0.0, 30.0]);
        assert_eq!(placement.total_height, 50.0);
    }

    #[test]
    fn last_row_counts_in_full() {
        let placement = stack_offsets(&[40.0], 0.1);
        assert_eq!(placement.offsets, vec![0.0]);
        assert_eq!(placement.total_height, 40.0);
    }

    #[test]
    fn empty_stack_places_nothing() {
        assert_eq!(stack_offsets(&[], 0.5), StackPlacement::default());
    }

    #[test]
    fn advances_round_half_up() {
        // 25 × 0.5 = 12.5 → 13, 27 × 0.5 = 13.5 → 14
        let placement = stack_offsets(&[25.0, 27.0, 10.0], 0.5);
        assert_eq!(placement.offsets, vec![0.0, 13.0, 27.0]);
        assert_eq!(round_half_up(12.5), 13.0);
        assert_eq!(round_half_up(12.49), 12.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }

    #[test]
    fn blocks_flow_without_gap() {
        let doc = parse_document(
            r#"[{"text":"a","size":30},{"newline":2.5},{"columns":[{"text":"l"},{"text":"r","size":24}]}]"#,
        )
        .unwrap();
        let layout = layout_document(&doc, &LayoutConfig::default(), &FixedLines);

        let ys: Vec<(f32, f32)> = layout.blocks.iter().map(|b| (b.y, b.height)).collect();
        assert_eq!(ys, vec![(0.0, 30.0), (30.0, 10.0), (40.0, 24.0)]);
        assert_eq!(layout.height, 64.0);
    }

    #[test]
    fn text_stack_uses_line_height() {
        let doc = parse_document(r#"[{"stack":{"lineHeight":12,"items":[{"text":"A"},{"text":"B"},{"text":"C"}]}}]"#)
            .unwrap();
        let layout = layout_document(&doc, &LayoutConfig::default(), &FixedLines);
        assert_eq!(layout.blocks[0].height, 36.0);
    }

    #[test]
    fn rows_stack_places_rows() {
        let doc = parse_document(
            r#"[{"text":"top","size":10},
                {"stack":{"rowMult":0.5,"items":[
                    {"columns":[{"text":"a","size":40},{"text":"b"}]},
                    {"text":"c","size":40}
                ]}}]"#,
        )
        .unwrap();
        let layout = layout_document(&doc, &LayoutConfig::default(), &FixedLines);
        let stack = &layout.blocks[1];
        assert_eq!(stack.y, 10.0);
        assert_eq!(stack.height, 60.0);
        assert_eq!(
            stack.rows,
            vec![
                PlacedRow { y: 0.0, height: 40.0 },
                PlacedRow { y: 20.0, height: 40.0 },
            ]
        );
    }

    #[test]
    fn newline_scales_with_base_unit() {
        let doc = parse_document(r#"[{"newline":2.5}]"#).unwrap();
        let config = LayoutConfig { base_unit: 8.0 };
        let layout = layout_document(&doc, &config, &FixedLines);
        assert_eq!(layout.height, 20.0);
    }

    #[test]
    fn overflowing_newline_takes_no_space() {
        let doc = parse_document(r#"[{"text":"a"},{"newline":1e300},{"text":"b"}]"#).unwrap();
        let layout = layout_document(&doc, &LayoutConfig::default(), &FixedLines);
        let ys: Vec<(f32, f32)> = layout.blocks.iter().map(|b| (b.y, b.height)).collect();
        assert_eq!(ys, vec![(0.0, 20.0), (20.0, 0.0), (20.0, 20.0)]);
        assert_eq!(layout.height, 40.0);
    }

    #[test]
    fn document_height_stays_finite() {
        let doc = parse_document(r#"[{"newline":3e37},{"newline":3e37},{"newline":3e37}]"#).unwrap();
        let layout = layout_document(&doc, &LayoutConfig::default(), &FixedLines);
        assert!(layout.height.is_finite());
    }
}
