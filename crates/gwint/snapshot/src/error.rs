//! Snapshot loading errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse snapshot document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid manifest: {detail}")]
    InvalidManifest { detail: String },
}

pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;
