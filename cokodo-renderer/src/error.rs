//! Error types for cokodo-renderer.

use std::path::PathBuf;

use thiserror::Error;

use cokodo_core::TreeError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("unknown adapter '{name}' (expected one of: {known})")]
    UnknownAdapter { name: String, known: String },

    #[error("adapter io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
