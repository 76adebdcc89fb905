//! Error types for cokodo-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from protocol tree operations.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Underlying I/O failure, annotated with the path that failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest JSON did not match the expected shape.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An operation required a manifest and none was present.
    #[error("manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// The protocol directory itself does not exist.
    #[error("protocol directory not found at {path}")]
    ProtocolNotFound { path: PathBuf },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Convenience constructor for [`TreeError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TreeError {
    TreeError::Io {
        path: path.into(),
        source,
    }
}
