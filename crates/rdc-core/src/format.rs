//! Canonical formatting for notes documents: validate → normalize → pretty JSON.
//!
//! Consumed by the CLI `notes fmt` command before a document is saved.

use crate::error::FormatError;
use crate::parser::{NodeShape, classify, parse_array, parse_document};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

// ─── Config ──────────────────────────────────────────────────────────────

/// Configuration for `format_document`.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Fold every `layout` node into a single one at the start of the
    /// document. The merged node yields the same `LayoutOptions`. Default: **true**.
    pub merge_layout: bool,

    /// Spaces per indentation level. Default: **4**.
    pub indent: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            merge_layout: true,
            indent: 4,
        }
    }
}

// ─── Pipeline ────────────────────────────────────────────────────────────

/// Validate a notes document and re-emit it as canonical, pretty-printed JSON.
///
/// Idempotent, and the output always parses to the same `Document` as the input.
///
/// # Errors
/// Returns the parse error if the input is not a valid notes document.
pub fn format_document(text: &str, config: &FormatConfig) -> Result<String, FormatError> {
    parse_document(text)?;
    let mut nodes = parse_array(text)?;

    if config.merge_layout {
        nodes = merge_layout_nodes(nodes);
    }

    let indent = " ".repeat(config.indent);
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    Value::Array(nodes)
        .serialize(&mut ser)
        .map_err(|e| FormatError::malformed(format!("cannot serialize document: {e}")))?;

    let mut formatted = String::from_utf8(out)
        .map_err(|e| FormatError::malformed(format!("formatter produced invalid UTF-8: {e}")))?;
    formatted.push('\n');
    Ok(formatted)
}

/// Move all `layout` nodes into one leading node.
///
/// A later numeric field replaces an earlier one; a later non-numeric field
/// never replaces anything, since the parser ignores it.
fn merge_layout_nodes(nodes: Vec<Value>) -> Vec<Value> {
    let mut merged: Option<Map<String, Value>> = None;
    let mut rest = Vec::with_capacity(nodes.len());

    for node in nodes {
        let layout = match node.as_object().map(classify) {
            Some(NodeShape::Layout(Value::Object(layout))) => Some(layout.clone()),
            _ => None,
        };
        let Some(layout) = layout else {
            rest.push(node);
            continue;
        };
        let target = merged.get_or_insert_with(Map::new);
        for (key, value) in layout {
            if value.is_number() || !target.contains_key(&key) {
                target.insert(key, value);
            }
        }
    }

    match merged {
        Some(layout) => {
            let mut head = Map::new();
            head.insert("layout".to_string(), Value::Object(layout));
            std::iter::once(Value::Object(head)).chain(rest).collect()
        }
        None => rest,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LayoutOptions;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_default_notes_is_stable() {
        let input = include_str!("../assets/default_notes.json");
        let output = format_document(input, &FormatConfig::default()).expect("format failed");
        assert_eq!(output, input);
    }

    #[test]
    fn format_is_idempotent() {
        let input = r#"[{"text":"a"},{"layout":{"marginH":3}},{"stack":{"items":[{"text":"b"}],"lineMult":0.8}}]"#;
        let config = FormatConfig::default();
        let first = format_document(input, &config).expect("first format failed");
        let second = format_document(&first, &config).expect("second format failed");
        assert_eq!(first, second, "format must be idempotent");
    }

    #[test]
    fn format_keeps_key_order() {
        let output = format_document(r#"[{"text":"a","size":12,"bold":true}]"#, &FormatConfig::default()).unwrap();
        let text = output.find("\"text\"").unwrap();
        let size = output.find("\"size\"").unwrap();
        let bold = output.find("\"bold\"").unwrap();
        assert!(text < size && size < bold, "keys reordered:\n{output}");
    }

    #[test]
    fn merge_layout_hoists_and_merges() {
        let input = r#"[{"text":"a"},{"layout":{"marginH":10}},{"layout":{"paddingH":30,"marginH":"x"}}]"#;
        let output = format_document(input, &FormatConfig::default()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        let nodes = value.as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["layout"]["marginH"], 10);
        assert_eq!(nodes[0]["layout"]["paddingH"], 30);
        assert_eq!(nodes[1]["text"], "a");

        let before = parse_document(input).unwrap();
        let after = parse_document(&output).unwrap();
        assert_eq!(before, after);
        assert_eq!(
            after.layout,
            LayoutOptions {
                margin_h: 10,
                padding_h: 30,
                padding_v: 6,
            }
        );
    }

    #[test]
    fn merge_can_be_disabled() {
        let input = r#"[{"text":"a"},{"layout":{"marginH":10}}]"#;
        let config = FormatConfig {
            merge_layout: false,
            indent: 2,
        };
        let output = format_document(input, &config).unwrap();
        assert!(output.starts_with("[\n  {\n    \"text\""), "got:\n{output}");
    }

    #[test]
    fn format_rejects_invalid_documents() {
        let err = format_document(r#"[{"text":"a","color":"nope"}]"#, &FormatConfig::default()).unwrap_err();
        assert_eq!(err, FormatError::UnknownColor("nope".into()));
    }
}
