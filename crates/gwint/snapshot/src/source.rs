//! Where snapshots come from.
//!
//! The calculator never does I/O; a [`SnapshotSource`] produces the
//! immutable [`ClusterSnapshot`] it works over. The file source reads a
//! multi-document YAML dump; other sources (a live API server, a test
//! fixture) implement the same trait.

use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot::ClusterSnapshot;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load(&self) -> SnapshotResult<ClusterSnapshot>;
}

/// Loads a snapshot from a YAML file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn load(&self) -> SnapshotResult<ClusterSnapshot> {
        if !self.path.exists() {
            return Err(SnapshotError::NotFound {
                path: self.path.display().to_string(),
            });
        }
        let text = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = ClusterSnapshot::parse_str(&text)?;
        info!(path = %self.path.display(), "Loaded cluster snapshot");
        Ok(snapshot)
    }
}

/// Serves a pre-built snapshot, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshot: ClusterSnapshot,
}

impl StaticSource {
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn load(&self) -> SnapshotResult<ClusterSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source_loads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "kind: GatewayClass\nmetadata: {{name: gc1}}\n"
        )
        .unwrap();

        let snapshot = FileSource::new(file.path()).load().await.unwrap();
        assert_eq!(snapshot.graph.resources().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let err = FileSource::new("/nonexistent/snapshot.yaml")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound { .. }));
    }
}
