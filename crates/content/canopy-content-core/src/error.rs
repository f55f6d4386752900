use std::path::PathBuf;

use thiserror::Error;

/// Validation failure inside one entry, before collection context is known.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{path}`: {message}")]
pub struct FieldError {
    /// Dotted path with list indices, e.g. `packages[1].features`.
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{collection}/{entry}: invalid field `{field}`: {message}")]
    Invalid {
        collection: String,
        entry: String,
        field: String,
        message: String,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ContentError {
    pub(crate) fn invalid(collection: &str, entry: &str, err: FieldError) -> Self {
        Self::Invalid {
            collection: collection.to_string(),
            entry: entry.to_string(),
            field: err.path,
            message: err.message,
        }
    }

    /// Offending field path for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}
