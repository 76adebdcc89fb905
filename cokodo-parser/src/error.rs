//! Error types for cokodo-parser.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// No registered parser has this name.
    #[error("unknown tool '{name}' (expected one of: {known})")]
    UnknownTool { name: String, known: String },

    /// A detected instruction file could not be read as UTF-8 text.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ParseError {
    ParseError::Io {
        path: path.into(),
        source,
    }
}
