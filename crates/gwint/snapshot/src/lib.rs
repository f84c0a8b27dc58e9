//! gwint Snapshot - cluster state loading and resource graph construction
//!
//! Turns a multi-document YAML dump of Gateway API objects into the
//! immutable inputs the policy calculator consumes: a
//! [`gwint_types::GraphSnapshot`] of parent/child edges, the declared
//! policy CRDs, and the policy instances attached to each target.

#![deny(unsafe_code)]

pub mod error;
pub mod manifest;
pub mod snapshot;
pub mod source;

pub use error::{SnapshotError, SnapshotResult};
pub use manifest::ManifestDoc;
pub use snapshot::{ClusterSnapshot, ResourceQuery};
pub use source::{FileSource, SnapshotSource, StaticSource};
