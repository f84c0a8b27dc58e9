//! CLI error types

use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot loading or parsing error
    #[error(transparent)]
    Snapshot(#[from] gwint_snapshot::SnapshotError),

    /// Policy catalog error (duplicate CRD registration)
    #[error(transparent)]
    Catalog(#[from] gwint_policy::CatalogError),

    /// Unknown resource type argument
    #[error("Unrecognized RESOURCE_TYPE: {0}")]
    UnrecognizedResourceType(String),

    /// Resource not found in the snapshot
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML config parsing error
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
