//! Effective policy computation: precedence resolution across the hierarchy.
//!
//! For one (target resource, policy kind) pair the calculator walks the
//! precedence tiers — the target itself first, then each ancestor out to
//! the root — and folds their policies through the structural merge so
//! that nearer tiers always win. Direct policies (tier 0) apply regardless
//! of the CRD's inheritance scope; ancestor policies apply only when the
//! kind is `Inheritable`.

use crate::catalog::PolicyCatalog;
use crate::hierarchy::{ancestor_chains, AncestorChain};
use crate::merge::{leaf_paths, merge, MergeEvent};
use crate::warning::Warning;
use gwint_types::{
    EffectivePolicy, GraphSnapshot, GroupKind, PolicyCrd, PolicyRef, PolicyValue, ResourceRef,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Effective policy for one parent chain of the target.
///
/// `parent` is set only when the target has multiple parent chains, to
/// identify which chain the result belongs to. There is no implicit merge
/// across parents; see [`EffectivePolicyCalculator::compute_union`] for
/// the explicit opt-in.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectivePolicyResult {
    pub parent: Option<ResourceRef>,
    pub policy: EffectivePolicy,
}

/// Result of one calculation: one entry per parent chain, plus every
/// non-fatal finding made along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub results: Vec<EffectivePolicyResult>,
    pub warnings: Vec<Warning>,
}

/// A merged value tree with per-leaf provenance, the unit the calculator
/// accumulates tier by tier.
#[derive(Debug, Clone)]
struct Layer {
    value: PolicyValue,
    provenance: BTreeMap<String, PolicyRef>,
}

/// Orchestrates catalog, hierarchy resolution, and structural merging
/// into per-target effective policies.
///
/// Pure over its two read-only inputs: identical snapshots produce
/// identical results and provenance, irrespective of input ordering.
#[derive(Debug, Clone, Copy)]
pub struct EffectivePolicyCalculator<'a> {
    catalog: &'a PolicyCatalog,
    graph: &'a GraphSnapshot,
}

impl<'a> EffectivePolicyCalculator<'a> {
    pub fn new(catalog: &'a PolicyCatalog, graph: &'a GraphSnapshot) -> Self {
        Self { catalog, graph }
    }

    /// Compute the effective policy of `group_kind` for `target`, one
    /// result per parent chain.
    pub fn compute(&self, target: &ResourceRef, group_kind: &GroupKind) -> Computation {
        debug!(target = %target, kind = %group_kind, "Computing effective policy");

        let Some(crd) = self.catalog.crd_for(group_kind) else {
            return Computation {
                results: vec![EffectivePolicyResult {
                    parent: None,
                    policy: EffectivePolicy::empty(target.clone(), group_kind.clone()),
                }],
                warnings: vec![Warning::NoApplicablePolicy {
                    target: target.clone(),
                    group_kind: group_kind.clone(),
                }],
            };
        };

        let resolution = ancestor_chains(target, self.graph);
        let mut warnings = resolution.warnings;
        let multi_parent = resolution.chains.len() > 1;

        let mut results = Vec::with_capacity(resolution.chains.len());
        for chain in &resolution.chains {
            let (policy, chain_warnings) = self.compute_chain(target, chain, crd);
            warnings.extend(chain_warnings);
            results.push(EffectivePolicyResult {
                parent: if multi_parent {
                    chain.first().cloned()
                } else {
                    None
                },
                policy,
            });
        }

        dedup_warnings(&mut warnings);
        Computation { results, warnings }
    }

    /// Batch variant over a sequence of targets, order-preserving.
    pub fn compute_batch(
        &self,
        targets: &[ResourceRef],
        group_kind: &GroupKind,
    ) -> Vec<Computation> {
        targets
            .iter()
            .map(|target| self.compute(target, group_kind))
            .collect()
    }

    /// Explicit union across parent chains: the first chain (in the
    /// deterministic chain order) defines a field, later chains only fill
    /// fields not already set, and overlaps are reported as ambiguous.
    pub fn compute_union(
        &self,
        target: &ResourceRef,
        group_kind: &GroupKind,
    ) -> (EffectivePolicy, Vec<Warning>) {
        let computation = self.compute(target, group_kind);
        let mut warnings = computation.warnings;
        let mut results = computation.results.into_iter();

        let Some(first) = results.next() else {
            return (
                EffectivePolicy::empty(target.clone(), group_kind.clone()),
                warnings,
            );
        };

        let mut union = first.policy;
        for result in results {
            let merged = merge(&result.policy.value, &union.value);
            for event in &merged.events {
                let path = event.path().to_string();
                let kept = owner_at(&union.provenance, &path);
                let ignored = owner_at(&result.policy.provenance, &path);
                if let (Some(kept), Some(ignored)) = (kept, ignored) {
                    // Both chains inheriting the same instance (e.g. a
                    // shared GatewayClass policy) is not an ambiguity.
                    if kept != ignored {
                        warnings.push(Warning::AmbiguousPolicy {
                            target: target.clone(),
                            path,
                            kept,
                            ignored,
                        });
                    }
                }
            }
            union.value = merged.value;
            let leaves: BTreeSet<String> = leaf_paths(&union.value).into_iter().collect();
            union.provenance.retain(|path, _| leaves.contains(path));
            for leaf in &leaves {
                if !union.provenance.contains_key(leaf) {
                    if let Some(source) = owner_at(&result.policy.provenance, leaf) {
                        union.provenance.insert(leaf.clone(), source);
                    }
                }
            }
        }

        dedup_warnings(&mut warnings);
        (union, warnings)
    }

    /// Fold the precedence tiers of one chain, farthest tier first so the
    /// target's own policies are applied last and win every conflict.
    fn compute_chain(
        &self,
        target: &ResourceRef,
        chain: &AncestorChain,
        crd: &PolicyCrd,
    ) -> (EffectivePolicy, Vec<Warning>) {
        let group_kind = &crd.group_kind;
        let mut warnings = Vec::new();

        // Tiers nearest-first: the target itself, then each ancestor.
        // Direct policies always apply; DirectOnly kinds never propagate
        // from an ancestor to a descendant.
        let mut tiers: Vec<Layer> = Vec::new();
        if let Some(layer) = self.premerge_tier(target, group_kind, &mut warnings) {
            tiers.push(layer);
        }
        if crd.is_inheritable() {
            for ancestor in chain {
                if let Some(layer) = self.premerge_tier(ancestor, group_kind, &mut warnings) {
                    tiers.push(layer);
                }
            }
        }

        let mut acc: Option<Layer> = None;
        for tier in tiers.into_iter().rev() {
            acc = Some(match acc {
                None => tier,
                Some(base) => layer_onto(&base, &tier, &mut warnings),
            });
        }

        let policy = match acc {
            Some(layer) => EffectivePolicy {
                target: target.clone(),
                group_kind: group_kind.clone(),
                value: layer.value,
                provenance: layer.provenance,
            },
            // Absence of any policy at any tier is not an error.
            None => EffectivePolicy::empty(target.clone(), group_kind.clone()),
        };
        (policy, warnings)
    }

    /// Pre-merge the same-kind policies attached to one resource.
    ///
    /// The catalog's deterministic order (oldest, then alphabetical)
    /// decides ownership: the first instance defines a field, later
    /// instances only add fields not already set. Overlaps are reported
    /// as ambiguous, never silently resolved by recency.
    fn premerge_tier(
        &self,
        resource: &ResourceRef,
        group_kind: &GroupKind,
        warnings: &mut Vec<Warning>,
    ) -> Option<Layer> {
        let instances: Vec<_> = self
            .catalog
            .policies_targeting(resource)
            .into_iter()
            .filter(|p| &p.group_kind == group_kind)
            .collect();

        let mut iter = instances.into_iter();
        let first = iter.next()?;

        let mut value = first.spec.clone();
        let mut provenance: BTreeMap<String, PolicyRef> = leaf_paths(&value)
            .into_iter()
            .map(|path| (path, first.policy_ref()))
            .collect();

        for instance in iter {
            // The accumulated value is the overlay so fields already
            // defined keep their original owner.
            let merged = merge(&instance.spec, &value);
            for event in &merged.events {
                let path = event.path().to_string();
                let kept = owner_at(&provenance, &path).unwrap_or_else(|| first.policy_ref());
                warnings.push(Warning::AmbiguousPolicy {
                    target: resource.clone(),
                    path,
                    kept,
                    ignored: instance.policy_ref(),
                });
            }
            value = merged.value;

            let leaves: BTreeSet<String> = leaf_paths(&value).into_iter().collect();
            provenance.retain(|path, _| leaves.contains(path));
            for leaf in leaves {
                provenance
                    .entry(leaf)
                    .or_insert_with(|| instance.policy_ref());
            }
        }

        Some(Layer { value, provenance })
    }
}

/// Merge a nearer (higher-precedence) layer onto the accumulated base,
/// carrying provenance forward: the overlay owns every path it set, the
/// base keeps whatever survived.
fn layer_onto(base: &Layer, overlay: &Layer, warnings: &mut Vec<Warning>) -> Layer {
    let merged = merge(&base.value, &overlay.value);

    for event in &merged.events {
        if let MergeEvent::TypeConflict {
            path,
            base_kind,
            override_kind,
        } = event
        {
            warnings.push(Warning::MergeConflict {
                path: path.clone(),
                base_kind: *base_kind,
                override_kind: *override_kind,
                source: owner_at(&overlay.provenance, path),
            });
        }
    }

    let mut provenance = base.provenance.clone();
    for (path, source) in &overlay.provenance {
        stamp(&mut provenance, path, source.clone());
    }

    let leaves: BTreeSet<String> = leaf_paths(&merged.value).into_iter().collect();
    provenance.retain(|path, _| leaves.contains(path));
    for leaf in &leaves {
        if !provenance.contains_key(leaf) {
            // A leaf both maps miss exactly was a surviving base leaf the
            // overlay stamped an enclosing (empty-object) path over.
            let source =
                owner_at(&base.provenance, leaf).or_else(|| owner_at(&overlay.provenance, leaf));
            if let Some(source) = source {
                provenance.insert(leaf.clone(), source);
            }
        }
    }

    Layer {
        value: merged.value,
        provenance,
    }
}

/// Record `source` as the owner of `path`, evicting entries the new
/// assignment shadows (the path itself, anything underneath it, and any
/// ancestor whose subtree it replaces).
fn stamp(provenance: &mut BTreeMap<String, PolicyRef>, path: &str, source: PolicyRef) {
    provenance.retain(|existing, _| !paths_overlap(existing, path));
    provenance.insert(path.to_string(), source);
}

fn paths_overlap(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return true;
    }
    a == b || a.starts_with(&format!("{}.", b)) || b.starts_with(&format!("{}.", a))
}

/// The instance owning `path` in a provenance map: an exact entry, an
/// ancestor entry (the path sits inside a wholly-owned subtree), or any
/// descendant entry (the path is an object whose leaves are owned).
fn owner_at(provenance: &BTreeMap<String, PolicyRef>, path: &str) -> Option<PolicyRef> {
    if let Some(source) = provenance.get(path) {
        return Some(source.clone());
    }
    let mut prefix = path.to_string();
    while let Some(idx) = prefix.rfind('.') {
        prefix.truncate(idx);
        if let Some(source) = provenance.get(&prefix) {
            return Some(source.clone());
        }
    }
    provenance
        .iter()
        .find(|(candidate, _)| path.is_empty() || candidate.starts_with(&format!("{}.", path)))
        .map(|(_, source)| source.clone())
}

/// Drop exact duplicate warnings while preserving order. Multi-chain
/// computations revisit tier 0 once per chain and would otherwise repeat
/// its findings.
fn dedup_warnings(warnings: &mut Vec<Warning>) {
    let mut seen: Vec<Warning> = Vec::new();
    warnings.retain(|warning| {
        if seen.contains(warning) {
            false
        } else {
            seen.push(warning.clone());
            true
        }
    });
}
