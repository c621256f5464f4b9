//! Integration tests: the default scratch notes through both renderers.

use pretty_assertions::assert_eq;
use rdc_core::{DEFAULT_NOTES, LayoutConfig, parse_document};
use rdc_render::*;

#[test]
fn default_notes_render_to_svg() {
    let doc = parse_document(DEFAULT_NOTES).unwrap();
    let svg = render_svg(&doc, &LayoutConfig::default(), &RenderTheme::dark());

    assert!(svg.starts_with("<svg "));
    assert!(svg.contains("<rect x=\"50\" "));
    assert!(svg.contains(">Pull Roll</tspan>"));
    assert!(svg.contains(">Feed Gate</tspan>"));
    assert!(svg.contains("fill=\"#FFEB3B\""));
    assert_eq!(svg.matches("<svg").count(), 1);
}

#[test]
fn svg_output_is_repeatable() {
    let doc = parse_document(DEFAULT_NOTES).unwrap();
    let theme = RenderTheme::light();
    let config = LayoutConfig { base_unit: 8.0 };
    assert_eq!(render_svg(&doc, &config, &theme), render_svg(&doc, &config, &theme));
}

#[test]
fn default_notes_render_to_plain_text() {
    let doc = parse_document(DEFAULT_NOTES).unwrap();
    let text = render_plain(&doc, 24);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Pull Roll      Feed Gate"));
    assert_eq!(lines.next(), Some("C: .103             .284"));
    assert!(text.ends_with('\n'));
}
