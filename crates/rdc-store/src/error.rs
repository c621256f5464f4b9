use rdc_core::FormatError;
use std::path::PathBuf;
use thiserror::Error;

use crate::preset::PresetId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access database file at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("database file at {} is not valid: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no preset with id {0}")]
    NotFound(PresetId),

    #[error("scratch notes rejected: {0}")]
    InvalidNotes(#[from] FormatError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(StoreError::NotFound(7).to_string(), "no preset with id 7");

        let err = StoreError::from(FormatError::UnknownColor("puce".into()));
        assert_eq!(err.to_string(), "scratch notes rejected: unknown color `puce`");

        let err = StoreError::io("/tmp/x.json", std::io::Error::other("denied"));
        assert_eq!(err.to_string(), "failed to access database file at /tmp/x.json: denied");
    }
}
