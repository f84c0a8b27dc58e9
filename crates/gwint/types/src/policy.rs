//! Policy CRD and instance models, plus the effective-policy result type.

use crate::resource::{GroupKind, ResourceKind, ResourceRef};
use crate::value::PolicyValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How instances of a policy kind apply across the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InheritanceScope {
    /// The policy applies only to the resource it directly targets.
    DirectOnly,
    /// The policy also applies to descendants of its target.
    Inheritable,
}

/// A known policy CRD: which kinds it may target and how it propagates.
///
/// Immutable once loaded from the cluster snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCrd {
    pub group_kind: GroupKind,
    pub target_kinds: BTreeSet<ResourceKind>,
    pub scope: InheritanceScope,
}

impl PolicyCrd {
    pub fn new(
        group_kind: GroupKind,
        target_kinds: impl IntoIterator<Item = ResourceKind>,
        scope: InheritanceScope,
    ) -> Self {
        Self {
            group_kind,
            target_kinds: target_kinds.into_iter().collect(),
            scope,
        }
    }

    pub fn supports_target(&self, kind: ResourceKind) -> bool {
        self.target_kinds.contains(&kind)
    }

    pub fn is_inheritable(&self) -> bool {
        self.scope == InheritanceScope::Inheritable
    }
}

/// A policy object attached to a target resource.
///
/// Immutable once loaded. The creation timestamp and name provide the
/// deterministic tie-break when multiple instances of the same kind
/// target the same resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyInstance {
    pub group_kind: GroupKind,
    pub namespace: String,
    pub name: String,
    pub target: ResourceRef,
    pub created_at: DateTime<Utc>,
    pub spec: PolicyValue,
}

impl PolicyInstance {
    /// Identity used in provenance records and diagnostics.
    pub fn policy_ref(&self) -> PolicyRef {
        PolicyRef {
            group_kind: self.group_kind.clone(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }

    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.namespace, self.name)
        }
    }
}

/// Identity of a policy instance, as recorded in provenance.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PolicyRef {
    pub group_kind: GroupKind,
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for PolicyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{} {}", self.group_kind, self.name)
        } else {
            write!(f, "{} {}/{}", self.group_kind, self.namespace, self.name)
        }
    }
}

/// The fully merged, precedence-resolved view of all applicable policies
/// of one kind for one resource.
///
/// `provenance` maps dot-joined field paths to the policy instance whose
/// value survived merging at that path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectivePolicy {
    pub target: ResourceRef,
    pub group_kind: GroupKind,
    pub value: PolicyValue,
    pub provenance: BTreeMap<String, PolicyRef>,
}

impl EffectivePolicy {
    /// An effective policy with no contributing instances.
    pub fn empty(target: ResourceRef, group_kind: GroupKind) -> Self {
        Self {
            target,
            group_kind,
            value: PolicyValue::empty(),
            provenance: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty_object() || self.value.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_instance() -> PolicyInstance {
        PolicyInstance {
            group_kind: GroupKind::new("example.com", "TimeoutPolicy"),
            namespace: "default".to_string(),
            name: "p1".to_string(),
            target: ResourceRef::new(ResourceKind::Gateway, "default", "gw1"),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            spec: PolicyValue::empty(),
        }
    }

    #[test]
    fn test_crd_target_support() {
        let crd = PolicyCrd::new(
            GroupKind::new("example.com", "TimeoutPolicy"),
            [ResourceKind::Gateway, ResourceKind::HttpRoute],
            InheritanceScope::Inheritable,
        );
        assert!(crd.supports_target(ResourceKind::Gateway));
        assert!(!crd.supports_target(ResourceKind::Backend));
        assert!(crd.is_inheritable());
    }

    #[test]
    fn test_policy_ref_display() {
        let instance = sample_instance();
        assert_eq!(
            instance.policy_ref().to_string(),
            "TimeoutPolicy.example.com default/p1"
        );
    }

    #[test]
    fn test_empty_effective_policy() {
        let ep = EffectivePolicy::empty(
            ResourceRef::new(ResourceKind::HttpRoute, "default", "r1"),
            GroupKind::new("example.com", "TimeoutPolicy"),
        );
        assert!(ep.is_empty());
        assert!(ep.provenance.is_empty());
    }
}
