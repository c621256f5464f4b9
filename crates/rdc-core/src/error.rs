//! Errors raised while reading a notes document.

use thiserror::Error;

/// Why a notes document was rejected.
///
/// Parsing never recovers partially: any of these aborts the whole parse and
/// the caller keeps whatever document it showed before.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Not JSON, not a top-level array of objects, or a node with the wrong shape.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A `columns` array with anything other than two entries.
    #[error("`columns` must have exactly 2 items, found {found} ({context})")]
    InvalidColumnsShape { found: usize, context: String },

    /// A color that is neither a known name nor 6/8 hex digits.
    #[error("unknown color `{0}`")]
    UnknownColor(String),
}

impl FormatError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_single_line() {
        let errors = [
            FormatError::malformed("item 2: array items must be objects"),
            FormatError::InvalidColumnsShape {
                found: 3,
                context: "item 0".into(),
            },
            FormatError::UnknownColor("notacolor".into()),
        ];
        for err in errors {
            let msg = err.to_string();
            assert!(!msg.contains('\n'), "multi-line message: {msg}");
        }
    }

    #[test]
    fn columns_message_names_count_and_location() {
        let err = FormatError::InvalidColumnsShape {
            found: 1,
            context: "item 4, stack row 2".into(),
        };
        assert_eq!(
            err.to_string(),
            "`columns` must have exactly 2 items, found 1 (item 4, stack row 2)"
        );
    }
}
