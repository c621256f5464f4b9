//! Editing session for the scratch-notes document.
//!
//! Holds the source text together with the last document that parsed. While
//! the text is invalid the session keeps showing the last good document and
//! reports the error next to it, instead of going blank.

use crate::error::FormatError;
use crate::model::Document;
use crate::parser::parse_document;

/// Source text, last good document, and the current parse error if any.
#[derive(Debug, Clone, Default)]
pub struct NotesSession {
    text: String,
    document: Document,
    error: Option<FormatError>,
}

impl NotesSession {
    /// Start an empty session (`[]`).
    pub fn new() -> Self {
        Self {
            text: "[]".to_string(),
            ..Self::default()
        }
    }

    /// Start from stored text. An invalid text leaves the document empty and
    /// records the error.
    pub fn from_text(text: &str) -> Self {
        let mut session = Self::default();
        // The error stays queryable through `error()`.
        let _ = session.set_text(text);
        session
    }

    /// Replace the source text and re-parse it.
    ///
    /// On failure the previous document stays current. Setting the same text
    /// again is a no-op that reports the existing state.
    pub fn set_text(&mut self, text: &str) -> Result<&Document, &FormatError> {
        if text != self.text || (self.text.is_empty() && self.error.is_none()) {
            self.text = text.to_string();
            match parse_document(text) {
                Ok(document) => {
                    self.document = document;
                    self.error = None;
                }
                Err(err) => {
                    log::warn!("notes text rejected, keeping last good document: {err}");
                    self.error = Some(err);
                }
            }
        }

        match &self.error {
            Some(err) => Err(err),
            None => Ok(&self.document),
        }
    }

    /// Accept `draft` only if it parses; otherwise nothing changes.
    ///
    /// # Errors
    /// Returns the draft's parse error.
    pub fn try_commit(&mut self, draft: &str) -> Result<(), FormatError> {
        let document = parse_document(draft)?;
        self.text = draft.to_string();
        self.document = document;
        self.error = None;
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last document that parsed successfully.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn error(&self) -> Option<&FormatError> {
        self.error.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}
