//! Index of policy CRDs and policy instances by target reference.
//!
//! Built once per invocation from the cluster snapshot and read-only for
//! the duration of a calculation.

use crate::error::{CatalogError, Result};
use crate::warning::Warning;
use gwint_types::{GroupKind, PolicyCrd, PolicyInstance, ResourceRef};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Indexes known policy CRD definitions and the instances attached to
/// each target resource.
#[derive(Debug, Clone, Default)]
pub struct PolicyCatalog {
    crds: BTreeMap<GroupKind, PolicyCrd>,
    by_target: BTreeMap<ResourceRef, Vec<PolicyInstance>>,
}

impl PolicyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a policy CRD. Registering the same group+kind twice is a
    /// contract violation.
    pub fn register_crd(&mut self, crd: PolicyCrd) -> Result<()> {
        if self.crds.contains_key(&crd.group_kind) {
            return Err(CatalogError::DuplicateCrd {
                group_kind: crd.group_kind,
            });
        }
        debug!(crd = %crd.group_kind, scope = ?crd.scope, "Registered policy CRD");
        self.crds.insert(crd.group_kind.clone(), crd);
        Ok(())
    }

    /// Index a policy instance by its target reference.
    ///
    /// Instances whose kind is unregistered, or whose target kind the CRD
    /// does not support, are dropped with a warning rather than an error:
    /// partial cluster state must not abort the whole calculation.
    pub fn register_instance(&mut self, instance: PolicyInstance) -> Option<Warning> {
        let Some(crd) = self.crds.get(&instance.group_kind) else {
            warn!(
                policy = %instance.policy_ref(),
                "Dropping policy instance: kind not registered"
            );
            return Some(Warning::UnknownPolicyKind {
                instance: instance.policy_ref(),
                detail: format!("policy kind {} is not registered", instance.group_kind),
            });
        };

        if !crd.supports_target(instance.target.kind) {
            warn!(
                policy = %instance.policy_ref(),
                target = %instance.target,
                "Dropping policy instance: target kind not supported by CRD"
            );
            return Some(Warning::UnknownPolicyKind {
                instance: instance.policy_ref(),
                detail: format!(
                    "{} does not support target kind {}",
                    instance.group_kind, instance.target.kind
                ),
            });
        }

        let entry = self.by_target.entry(instance.target.clone()).or_default();
        entry.push(instance);
        // Deterministic tie-break: creation timestamp, then name.
        entry.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        None
    }

    /// All instances targeting the given resource, across every registered
    /// CRD, ordered by (creation timestamp asc, name asc).
    pub fn policies_targeting(&self, target: &ResourceRef) -> Vec<&PolicyInstance> {
        self.by_target
            .get(target)
            .map(|instances| instances.iter().collect())
            .unwrap_or_default()
    }

    pub fn crd_for(&self, group_kind: &GroupKind) -> Option<&PolicyCrd> {
        self.crds.get(group_kind)
    }

    /// All registered CRDs, in deterministic order.
    pub fn crds(&self) -> impl Iterator<Item = &PolicyCrd> {
        self.crds.values()
    }

    /// All indexed instances, ordered by (kind, namespace, name).
    pub fn instances(&self) -> Vec<&PolicyInstance> {
        let mut all: Vec<&PolicyInstance> = self.by_target.values().flatten().collect();
        all.sort_by(|a, b| {
            a.group_kind
                .cmp(&b.group_kind)
                .then_with(|| a.namespace.cmp(&b.namespace))
                .then_with(|| a.name.cmp(&b.name))
        });
        all
    }

    /// Look up a single instance by namespace and name, the way the
    /// describe command addresses policies.
    pub fn instance_named(&self, namespace: &str, name: &str) -> Option<&PolicyInstance> {
        self.by_target
            .values()
            .flatten()
            .find(|p| p.namespace == namespace && p.name == name)
    }
}
