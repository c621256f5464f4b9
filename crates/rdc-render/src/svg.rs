//! SVG export of a laid-out notes document.
//!
//! The card sits `marginH` in from both canvas edges; content is inset a
//! further `paddingH` and starts `paddingV` from the top. Every text line is
//! one `<text>` element with a `<tspan>` per styled span.

use crate::metrics::EstimateMeasurer;
use crate::theme::RenderTheme;
use rdc_core::{
    Block, Color, Document, LayoutConfig, PlacedBlock, StackRow, StyledSpan, layout_document, split_lines,
};

fn color_to_svg(c: Color) -> String {
    if c.is_opaque() {
        format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
    } else {
        format!("rgba({}, {}, {}, {:.3})", c.r, c.g, c.b, c.a as f32 / 255.0)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Horizontal anchor of a text line.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    Start,
    End,
}

struct Canvas<'a> {
    out: String,
    theme: &'a RenderTheme,
    measurer: EstimateMeasurer,
    left: f32,
    right: f32,
}

pub fn render_svg(doc: &Document, config: &LayoutConfig, theme: &RenderTheme) -> String {
    let measurer = EstimateMeasurer::with_font_size(theme.default_font_size);
    let layout = layout_document(doc, config, &measurer);

    let margin = doc.layout.margin_h as f32;
    let padding_h = doc.layout.padding_h as f32;
    let padding_v = doc.layout.padding_v as f32;

    let width = theme.page_width;
    let height = layout.height + padding_v * 2.0;

    let mut canvas = Canvas {
        out: String::new(),
        theme,
        measurer,
        left: margin + padding_h,
        right: width - margin - padding_h,
    };

    canvas.out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    ));
    canvas.out.push_str("<style>\n");
    canvas
        .out
        .push_str(&format!("  text {{ font-family: {}; }}\n", theme.font_family));
    canvas.out.push_str("</style>\n");
    canvas.out.push_str(&format!(
        "<rect x=\"{margin}\" y=\"0\" width=\"{}\" height=\"{height}\" fill=\"{}\" />\n",
        (width - margin * 2.0).max(0.0),
        color_to_svg(theme.background)
    ));
    canvas
        .out
        .push_str(&format!("<g transform=\"translate(0, {padding_v})\">\n"));

    for placed in &layout.blocks {
        canvas.block(placed);
    }

    canvas.out.push_str("</g>\n</svg>");
    log::debug!("rendered {} blocks to a {width}x{height} svg", layout.blocks.len());
    canvas.out
}

impl Canvas<'_> {
    fn block(&mut self, placed: &PlacedBlock<'_>) {
        match placed.block {
            Block::Text { span } => self.span(span, placed.y, placed.height, Anchor::Start),
            Block::Columns { left, right } => self.columns(left, right, placed.y, placed.height),
            Block::Newline { .. } => {}
            Block::TextStack {
                content,
                line_height,
            } => {
                let mut y = placed.y;
                for line in content.lines() {
                    let height = line_height.unwrap_or_else(|| self.measurer.line_height(&line));
                    self.line(&line, y, height, Anchor::Start);
                    y += height;
                }
            }
            Block::RowsStack { rows, .. } => {
                for (row, at) in rows.iter().zip(&placed.rows) {
                    let y = placed.y + at.y;
                    match row {
                        StackRow::Text { span } => self.span(span, y, at.height, Anchor::Start),
                        StackRow::Columns { left, right } => self.columns(left, right, y, at.height),
                    }
                }
            }
        }
    }

    fn columns(&mut self, left: &StyledSpan, right: &StyledSpan, y: f32, height: f32) {
        self.span(left, y, height, Anchor::Start);
        self.span(right, y, height, Anchor::End);
    }

    /// A single span that may hold line breaks. One line fills the whole box;
    /// several lines stack from `top` at their natural height.
    fn span(&mut self, span: &StyledSpan, top: f32, height: f32, anchor: Anchor) {
        let lines = split_lines(std::slice::from_ref(span));
        if let [line] = lines.as_slice() {
            self.line(line, top, height, anchor);
            return;
        }
        let mut y = top;
        for line in &lines {
            let line_height = self.measurer.line_height(line);
            self.line(line, y, line_height, anchor);
            y += line_height;
        }
    }

    /// One line of spans in the box `[top, top + height)`, baseline centred.
    fn line(&mut self, spans: &[StyledSpan], top: f32, height: f32, anchor: Anchor) {
        if spans.iter().all(StyledSpan::is_empty) {
            return;
        }

        let font_size = spans
            .iter()
            .map(|s| self.measurer.font_size(s))
            .fold(0.0, f32::max);
        let baseline = top + height / 2.0 + font_size * 0.35;
        let (x, text_anchor) = match anchor {
            Anchor::Start => (self.left, "start"),
            Anchor::End => (self.right, "end"),
        };

        self.out.push_str(&format!(
            "  <text x=\"{x}\" y=\"{baseline}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{text_anchor}\">",
            self.theme.default_font_size,
            color_to_svg(self.theme.text_color)
        ));
        for span in spans {
            self.out.push_str("<tspan");
            if let Some(size) = span.font_size {
                self.out.push_str(&format!(" font-size=\"{size}\""));
            }
            if span.bold {
                self.out.push_str(" font-weight=\"bold\"");
            }
            if span.italic {
                self.out.push_str(" font-style=\"italic\"");
            }
            if let Some(color) = span.color {
                self.out.push_str(&format!(" fill=\"{}\"", color_to_svg(color)));
            }
            self.out.push_str(&format!(">{}</tspan>", escape(&span.text)));
        }
        self.out.push_str("</text>\n");
    }
}
