//! Identities for Gateway API objects participating in the hierarchy.
//!
//! Resource kinds are a closed enum rather than free-form strings so that
//! dispatch over kinds is exhaustive and adding a kind is a data change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A resource kind that participates in the policy attachment hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ResourceKind {
    GatewayClass,
    Gateway,
    #[serde(rename = "HTTPRoute")]
    HttpRoute,
    Backend,
}

/// Lookup table from command-line spellings to kinds.
///
/// Both singular and plural forms are accepted, matching the CLI contract.
const KIND_SPELLINGS: &[(&str, ResourceKind)] = &[
    ("gatewayclass", ResourceKind::GatewayClass),
    ("gatewayclasses", ResourceKind::GatewayClass),
    ("gateway", ResourceKind::Gateway),
    ("gateways", ResourceKind::Gateway),
    ("httproute", ResourceKind::HttpRoute),
    ("httproutes", ResourceKind::HttpRoute),
    ("backend", ResourceKind::Backend),
    ("backends", ResourceKind::Backend),
];

impl ResourceKind {
    /// All kinds, ordered from the hierarchy root down to the leaves.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::GatewayClass,
        ResourceKind::Gateway,
        ResourceKind::HttpRoute,
        ResourceKind::Backend,
    ];

    /// Whether resources of this kind live inside a namespace.
    ///
    /// GatewayClass is cluster-scoped; everything else is namespaced.
    pub fn is_namespaced(&self) -> bool {
        !matches!(self, ResourceKind::GatewayClass)
    }

    /// The Kubernetes-style kind string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::GatewayClass => "GatewayClass",
            ResourceKind::Gateway => "Gateway",
            ResourceKind::HttpRoute => "HTTPRoute",
            ResourceKind::Backend => "Backend",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a resource-type argument matches no known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized resource type: {0}")]
pub struct UnknownResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        KIND_SPELLINGS
            .iter()
            .find(|(spelling, _)| *spelling == lowered)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| UnknownResourceKind(s.to_string()))
    }
}

/// Identity of any Gateway API object participating in the hierarchy.
///
/// Cluster-scoped resources carry an empty namespace.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Reference to a cluster-scoped resource (no namespace).
    pub fn cluster_scoped(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::new(kind, "", name)
    }

    /// The `namespace/name` form used in user-facing output, or just the
    /// name for cluster-scoped resources.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.qualified_name())
    }
}

/// Group plus kind of a policy CRD, e.g. `TimeoutPolicy.networking.example`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GroupKind {
    pub group: String,
    pub kind: String,
}

impl GroupKind {
    pub fn new(group: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.kind)
        } else {
            write!(f, "{}.{}", self.kind, self.group)
        }
    }
}
