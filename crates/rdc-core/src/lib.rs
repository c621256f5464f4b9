pub mod error;
pub mod format;
pub mod layout;
pub mod lint;
pub mod model;
pub mod parser;
pub mod session;

pub use error::FormatError;
pub use format::{FormatConfig, format_document};
pub use layout::{
    DocumentLayout, LayoutConfig, PlacedBlock, PlacedRow, Size, StackPlacement, TextMeasure,
    layout_blocks, layout_document, round_half_up, stack_offsets,
};
pub use lint::{LintDiagnostic, LintSeverity, lint_source};
pub use model::*;
pub use parser::parse_document;
pub use session::NotesSession;

/// Scratch notes a fresh database starts with.
pub const DEFAULT_NOTES: &str = include_str!("../assets/default_notes.json");
