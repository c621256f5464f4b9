//! Parser for scratch-notes JSON → `Document`.
//!
//! The source is a JSON array of objects. Each object is classified once, by
//! the first marker key it carries in priority order `layout` → `newline` →
//! `columns` → `stack`; anything else is a plain text span. `layout` nodes are
//! not blocks: they fold, field by field, into the document's `LayoutOptions`.

use crate::error::FormatError;
use crate::model::*;
use serde_json::{Map, Value};

pub(crate) type Object = Map<String, Value>;

/// Font size assumed for text-stack items without an explicit `size`.
pub const DEFAULT_STACK_FONT_SIZE: f32 = 16.0;

/// `newline` value used when the field is not a number.
const DEFAULT_NEWLINE: f64 = 1.0;

/// Parse a notes document.
///
/// Pure: the same text always yields an equal `Document`.
///
/// # Errors
/// Returns the first `FormatError` found; no partial document is produced.
#[must_use = "parsing result should be used"]
pub fn parse_document(input: &str) -> Result<Document, FormatError> {
    let nodes = parse_array(input)?;

    let parsed = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| parse_node(index, node))
        .collect::<Result<Vec<_>, _>>()?;

    let layout = parsed
        .iter()
        .filter_map(|node| match node {
            ParsedNode::Layout(patch) => Some(patch),
            ParsedNode::Block(_) => None,
        })
        .fold(LayoutOptions::default(), |layout, patch| layout.apply(patch));

    let blocks: Vec<Block> = parsed
        .into_iter()
        .filter_map(|node| match node {
            ParsedNode::Block(block) => Some(block),
            ParsedNode::Layout(_) => None,
        })
        .collect();

    log::debug!("parsed notes document: {} blocks, {layout:?}", blocks.len());
    Ok(Document { layout, blocks })
}

/// Read the top-level array. Items are checked for object-ness by the caller.
pub(crate) fn parse_array(input: &str) -> Result<Vec<Value>, FormatError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| FormatError::malformed(format!("invalid JSON: {e}")))?;
    match value {
        Value::Array(nodes) => Ok(nodes),
        other => Err(FormatError::malformed(format!(
            "top level must be an array, found {}",
            json_type(&other)
        ))),
    }
}

// ─── Classification ──────────────────────────────────────────────────────

/// Which shape a top-level (or stack item) object has.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NodeShape<'a> {
    Layout(&'a Value),
    Newline(&'a Value),
    Columns(&'a Value),
    Stack(&'a Value),
    Span,
}

pub(crate) fn classify(obj: &Object) -> NodeShape<'_> {
    if let Some(v) = obj.get("layout") {
        NodeShape::Layout(v)
    } else if let Some(v) = obj.get("newline") {
        NodeShape::Newline(v)
    } else if let Some(v) = obj.get("columns") {
        NodeShape::Columns(v)
    } else if let Some(v) = obj.get("stack") {
        NodeShape::Stack(v)
    } else {
        NodeShape::Span
    }
}

enum ParsedNode {
    Layout(LayoutPatch),
    Block(Block),
}

fn parse_node(index: usize, node: &Value) -> Result<ParsedNode, FormatError> {
    let obj = node
        .as_object()
        .ok_or_else(|| FormatError::malformed(format!("item {index}: array items must be objects")))?;

    let parsed = match classify(obj) {
        NodeShape::Layout(value) => ParsedNode::Layout(parse_layout(index, value)?),
        NodeShape::Newline(value) => {
            let amount = value.as_f64().unwrap_or(DEFAULT_NEWLINE).max(0.0) as f32;
            ParsedNode::Block(Block::Newline { amount })
        }
        NodeShape::Columns(value) => {
            let (left, right) = parse_columns(value, &format!("item {index}"))?;
            ParsedNode::Block(Block::Columns { left, right })
        }
        NodeShape::Stack(value) => ParsedNode::Block(parse_stack(index, value)?),
        NodeShape::Span => ParsedNode::Block(Block::Text {
            span: make_span(obj)?,
        }),
    };

    if log::log_enabled!(log::Level::Trace) {
        match &parsed {
            ParsedNode::Layout(patch) => log::trace!("item {index}: layout {patch:?}"),
            ParsedNode::Block(block) => log::trace!("item {index}: {}", block.kind_name()),
        }
    }
    Ok(parsed)
}

// ─── Node parsers ────────────────────────────────────────────────────────

pub(crate) fn parse_layout(index: usize, value: &Value) -> Result<LayoutPatch, FormatError> {
    let obj = value
        .as_object()
        .ok_or_else(|| FormatError::malformed(format!("item {index}: `layout` must be an object")))?;
    Ok(LayoutPatch {
        margin_h: int_field(obj, "marginH"),
        padding_h: int_field(obj, "paddingH"),
        padding_v: int_field(obj, "paddingV"),
    })
}

fn parse_columns(value: &Value, context: &str) -> Result<(StyledSpan, StyledSpan), FormatError> {
    let items = value
        .as_array()
        .ok_or_else(|| FormatError::malformed(format!("{context}: `columns` must be an array")))?;
    let [left, right] = items.as_slice() else {
        return Err(FormatError::InvalidColumnsShape {
            found: items.len(),
            context: context.to_string(),
        });
    };
    let left = as_object(left, || format!("{context}: columns entries must be objects"))?;
    let right = as_object(right, || format!("{context}: columns entries must be objects"))?;
    Ok((make_span(left)?, make_span(right)?))
}

fn parse_stack(index: usize, value: &Value) -> Result<Block, FormatError> {
    let stack = value
        .as_object()
        .ok_or_else(|| FormatError::malformed(format!("item {index}: `stack` must be an object")))?;
    let items = stack
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| FormatError::malformed(format!("item {index}: `stack` needs an `items` array")))?
        .iter()
        .enumerate()
        .map(|(row, item)| {
            as_object(item, || format!("item {index}, stack row {row}: stack items must be objects"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if items.iter().any(|item| item.contains_key("columns")) {
        rows_stack(index, stack, &items)
    } else {
        text_stack(stack, &items)
    }
}

/// Stack with at least one `columns` item: every item becomes its own row.
fn rows_stack(index: usize, stack: &Object, items: &[&Object]) -> Result<Block, FormatError> {
    let rows = items
        .iter()
        .enumerate()
        .map(|(row, item)| match item.get("columns") {
            Some(columns) => {
                let (left, right) = parse_columns(columns, &format!("item {index}, stack row {row}"))?;
                Ok(StackRow::Columns { left, right })
            }
            None => Ok(StackRow::Text {
                span: make_span(item)?,
            }),
        })
        .collect::<Result<Vec<_>, FormatError>>()?;

    // `rowMult` wins over `lineMult` whenever the key exists, even if unusable.
    let row_mult = match stack.get("rowMult").or_else(|| stack.get("lineMult")) {
        Some(v) => v.as_f64().unwrap_or(1.0),
        None => 1.0,
    };

    Ok(Block::RowsStack {
        rows,
        row_mult: row_mult as f32,
    })
}

/// Stack of plain spans: one text with a line break between items.
fn text_stack(stack: &Object, items: &[&Object]) -> Result<Block, FormatError> {
    let mut content = RichText::new();
    let mut max_size = DEFAULT_STACK_FONT_SIZE;

    for (i, item) in items.iter().enumerate() {
        let span = make_span(item)?;
        if let Some(size) = span.font_size {
            max_size = max_size.max(size);
        }
        content.push(span);
        if i + 1 < items.len() {
            content.push(StyledSpan::plain("\n"));
        }
    }

    let line_height = match (stack.get("lineHeight").and_then(Value::as_f64), stack.get("lineMult")) {
        (Some(height), _) => Some(height as f32),
        (None, Some(mult)) => Some(max_size * mult.as_f64().unwrap_or(1.0) as f32),
        (None, None) => None,
    };

    Ok(Block::TextStack {
        content,
        line_height,
    })
}

/// Build a span from `text`/`size`/`bold`/`italic`/`color`.
pub(crate) fn make_span(obj: &Object) -> Result<StyledSpan, FormatError> {
    let text = match obj.get("text") {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    };
    let font_size = obj
        .get("size")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .map(|s| s as f32);
    let color = match obj.get("color") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => resolve_color(s)?,
        Some(other) => return Err(FormatError::UnknownColor(other.to_string())),
    };

    Ok(StyledSpan {
        text,
        font_size,
        bold: bool_field(obj, "bold"),
        italic: bool_field(obj, "italic"),
        color,
    })
}

/// Blank means "no color"; anything else must resolve.
pub fn resolve_color(s: &str) -> Result<Option<Color>, FormatError> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    Color::parse(s)
        .map(Some)
        .ok_or_else(|| FormatError::UnknownColor(s.to_string()))
}

// ─── Field helpers ───────────────────────────────────────────────────────

fn as_object<'a>(value: &'a Value, msg: impl FnOnce() -> String) -> Result<&'a Object, FormatError> {
    value.as_object().ok_or_else(|| FormatError::malformed(msg()))
}

/// Integer fields truncate toward zero; non-numbers count as absent.
fn int_field(obj: &Object, key: &str) -> Option<i32> {
    let v = obj.get(key)?;
    v.as_i64()
        .map(|n| n.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        .or_else(|| v.as_f64().map(|f| f.trunc() as i32))
}

fn bool_field(obj: &Object, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
