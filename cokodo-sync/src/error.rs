//! Error types for cokodo-sync.

use std::path::PathBuf;

use thiserror::Error;

use cokodo_core::TreeError;

/// All errors that can arise from checksum and sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the protocol tree model.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (manifest rewrite).
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest root is not a JSON object and cannot carry checksums.
    #[error("manifest at {path} is not a JSON object")]
    ManifestShape { path: PathBuf },

    /// The local protocol directory does not exist.
    #[error("local protocol directory not found at {path}")]
    LocalMissing { path: PathBuf },

    /// The remote (reference) protocol directory does not exist.
    #[error("remote protocol directory not found at {path}")]
    RemoteMissing { path: PathBuf },

    /// No protocol source could provide a reference tree.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Failures of a single protocol source, or of the whole chain.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source cannot provide a tree (missing directory, no manifest, ...).
    #[error("source '{name}' unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    /// Materialising the bundled protocol failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every configured source failed.
    #[error("no protocol source available:\n{}", .failures.join("\n"))]
    Exhausted { failures: Vec<String> },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
