//! Lint diagnostics for notes documents.
//!
//! Reports things that parse fine but probably don't do what the author
//! meant: keys the renderer ignores, settings that have no effect on the
//! stack kind they sit on, repeated `layout` nodes. Never modifies the text.

use crate::error::FormatError;
use crate::parser::{NodeShape, Object, classify, parse_array, parse_document};
use serde_json::Value;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Likely a mistake.
    Warning,
    /// Style suggestion.
    Info,
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    /// Where in the document, e.g. `[3].stack.items[1]`.
    pub path: String,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "unknown-key", "empty-stack").
    pub rule: &'static str,
}

const SPAN_KEYS: &[&str] = &["text", "size", "bold", "italic", "color"];
const LAYOUT_KEYS: &[&str] = &["marginH", "paddingH", "paddingV"];
const STACK_KEYS: &[&str] = &["items", "lineMult", "rowMult", "lineHeight"];

// ─── Public API ──────────────────────────────────────────────────────────

/// Validate `input` and run all lint rules over it.
///
/// # Errors
/// Returns the parse error when the document is invalid; lint only runs on
/// documents that parse.
pub fn lint_source(input: &str) -> Result<Vec<LintDiagnostic>, FormatError> {
    parse_document(input)?;
    let nodes = parse_array(input)?;

    let mut diags = Vec::new();
    lint_repeated_layout(&nodes, &mut diags);
    for (index, node) in nodes.iter().enumerate() {
        if let Some(obj) = node.as_object() {
            lint_node(&format!("[{index}]"), obj, &mut diags);
        }
    }
    Ok(diags)
}

// ─── Rules ───────────────────────────────────────────────────────────────

/// Warn when more than one `layout` node appears; later ones silently win.
fn lint_repeated_layout(nodes: &[Value], diags: &mut Vec<LintDiagnostic>) {
    let layout_nodes: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.as_object().is_some_and(|o| matches!(classify(o), NodeShape::Layout(_))))
        .map(|(i, _)| i)
        .collect();

    for index in layout_nodes.iter().skip(1) {
        diags.push(LintDiagnostic {
            path: format!("[{index}]"),
            message: format!(
                "Another `layout` node (first at [{}]); fields set here override the earlier ones.",
                layout_nodes[0]
            ),
            severity: LintSeverity::Warning,
            rule: "repeated-layout",
        });
    }
}

fn lint_node(path: &str, obj: &Object, diags: &mut Vec<LintDiagnostic>) {
    match classify(obj) {
        NodeShape::Layout(layout) => {
            check_keys(path, obj, &["layout"], diags);
            if let Some(layout) = layout.as_object() {
                check_keys(&format!("{path}.layout"), layout, LAYOUT_KEYS, diags);
            }
        }
        NodeShape::Newline(_) => check_keys(path, obj, &["newline"], diags),
        NodeShape::Columns(columns) => {
            check_keys(path, obj, &["columns"], diags);
            lint_columns(path, columns, diags);
        }
        NodeShape::Stack(stack) => {
            check_keys(path, obj, &["stack"], diags);
            if let Some(stack) = stack.as_object() {
                lint_stack(&format!("{path}.stack"), stack, diags);
            }
        }
        NodeShape::Span => {
            check_keys(path, obj, SPAN_KEYS, diags);
            if obj.get("text").is_none_or(|t| t.as_str() == Some("")) {
                diags.push(LintDiagnostic {
                    path: path.to_string(),
                    message: "Text node without text renders as an empty line; use `newline` for spacing."
                        .to_string(),
                    severity: LintSeverity::Info,
                    rule: "empty-text",
                });
            }
        }
    }
}

fn lint_columns(path: &str, columns: &Value, diags: &mut Vec<LintDiagnostic>) {
    for (i, entry) in columns.as_array().into_iter().flatten().enumerate() {
        if let Some(entry) = entry.as_object() {
            check_keys(&format!("{path}.columns[{i}]"), entry, SPAN_KEYS, diags);
        }
    }
}

fn lint_stack(path: &str, stack: &Object, diags: &mut Vec<LintDiagnostic>) {
    check_keys(path, stack, STACK_KEYS, diags);

    let items: Vec<&Object> = stack
        .get("items")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .collect();

    if items.is_empty() {
        diags.push(LintDiagnostic {
            path: path.to_string(),
            message: "Stack has no items.".to_string(),
            severity: LintSeverity::Warning,
            rule: "empty-stack",
        });
    }

    let has_columns = items.iter().any(|item| item.contains_key("columns"));
    if has_columns && stack.contains_key("lineHeight") {
        diags.push(LintDiagnostic {
            path: path.to_string(),
            message: "`lineHeight` has no effect on a stack with `columns` rows; use `rowMult`.".to_string(),
            severity: LintSeverity::Warning,
            rule: "ignored-line-height",
        });
    }
    if !has_columns && stack.contains_key("rowMult") {
        diags.push(LintDiagnostic {
            path: path.to_string(),
            message: "`rowMult` has no effect on a text-only stack; use `lineMult` or `lineHeight`."
                .to_string(),
            severity: LintSeverity::Warning,
            rule: "ignored-row-mult",
        });
    }

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{path}.items[{i}]");
        match item.get("columns") {
            Some(columns) => {
                check_keys(&item_path, item, &["columns"], diags);
                lint_columns(&item_path, columns, diags);
            }
            None => check_keys(&item_path, item, SPAN_KEYS, diags),
        }
    }
}

/// Info for every key outside `allowed`.
fn check_keys(path: &str, obj: &Object, allowed: &[&str], diags: &mut Vec<LintDiagnostic>) {
    for key in obj.keys().filter(|k| !allowed.contains(&k.as_str())) {
        diags.push(LintDiagnostic {
            path: path.to_string(),
            message: format!("Unknown key `{key}` is ignored (expected one of: {}).", allowed.join(", ")),
            severity: LintSeverity::Info,
            rule: "unknown-key",
        });
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(input: &str) -> Vec<&'static str> {
        lint_source(input).unwrap().into_iter().map(|d| d.rule).collect()
    }

    #[test]
    fn lint_repeated_layout() {
        let diags = lint_source(r#"[{"layout":{"marginH":1}},{"text":"a"},{"layout":{"paddingH":2}}]"#).unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "repeated-layout");
        assert_eq!(diags[0].path, "[2]");
    }

    #[test]
    fn lint_unknown_keys() {
        let diags = lint_source(r#"[{"text":"a","colour":"red"}]"#).unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "unknown-key");
        assert!(diags[0].message.contains("colour"));
    }

    #[test]
    fn lint_unknown_key_in_stack_item() {
        let diags = lint_source(r#"[{"stack":{"items":[{"text":"a","weight":700}]}}]"#).unwrap();
        assert_eq!(diags[0].path, "[0].stack.items[0]");
    }

    #[test]
    fn lint_row_mult_on_text_stack() {
        assert_eq!(
            rules(r#"[{"stack":{"rowMult":0.5,"items":[{"text":"a"}]}}]"#),
            vec!["ignored-row-mult"]
        );
    }

    #[test]
    fn lint_line_height_on_rows_stack() {
        assert_eq!(
            rules(r#"[{"stack":{"lineHeight":20,"items":[{"columns":[{"text":"a"},{"text":"b"}]}]}}]"#),
            vec!["ignored-line-height"]
        );
    }

    #[test]
    fn lint_empty_stack_and_text() {
        assert_eq!(
            rules(r#"[{"stack":{"items":[]}},{"size":12}]"#),
            vec!["empty-stack", "empty-text"]
        );
    }

    #[test]
    fn lint_invalid_document_is_an_error() {
        assert!(lint_source(r#"[{"columns":[{}]}]"#).is_err());
    }

    #[test]
    fn lint_clean_document_no_diags() {
        let input = include_str!("../assets/default_notes.json");
        let diags = lint_source(input).unwrap();
        assert!(diags.is_empty(), "clean document should have no diagnostics: {diags:?}");
    }
}
