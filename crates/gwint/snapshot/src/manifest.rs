//! On-disk manifest schema for cluster snapshots.
//!
//! A snapshot is a multi-document YAML stream. Each document carries a
//! `kind` discriminator; Gateway API resources describe the hierarchy,
//! `PolicyCRD` documents declare policy kinds, and `Policy` documents
//! attach policy values to targets.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use gwint_types::PolicyValue;

/// One document of the snapshot stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum ManifestDoc {
    GatewayClass {
        metadata: Metadata,
    },
    Gateway {
        metadata: Metadata,
        #[serde(default)]
        spec: GatewaySpec,
    },
    #[serde(rename = "HTTPRoute")]
    HttpRoute {
        metadata: Metadata,
        #[serde(default)]
        spec: RouteSpec,
    },
    Backend {
        metadata: Metadata,
    },
    #[serde(rename = "PolicyCRD")]
    PolicyCrd {
        metadata: Metadata,
        spec: CrdSpec,
    },
    Policy {
        metadata: Metadata,
        spec: PolicyDocSpec,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySpec {
    #[serde(default)]
    pub gateway_class_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    #[serde(default)]
    pub parent_refs: Vec<NamedRef>,
    #[serde(default)]
    pub backend_refs: Vec<NamedRef>,
}

/// Reference to another object by name; namespace defaults to the
/// referring object's namespace.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdSpec {
    pub group: String,
    pub kind: String,
    pub scope: ScopeSpec,
    #[serde(default)]
    pub target_kinds: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum ScopeSpec {
    DirectOnly,
    Inheritable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocSpec {
    pub group_kind: GroupKindSpec,
    pub target_ref: TargetRefSpec,
    #[serde(default)]
    pub values: PolicyValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupKindSpec {
    pub group: String,
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetRefSpec {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}
