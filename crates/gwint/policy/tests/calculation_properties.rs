//! Property tests: effective policy calculation must be deterministic,
//! idempotent, and faithful to the precedence rules on arbitrary inputs.

use chrono::{TimeZone, Utc};
use gwint_policy::{leaf_paths, merge, EffectivePolicyCalculator, PolicyCatalog};
use gwint_types::{
    GraphSnapshot, GroupKind, InheritanceScope, PolicyCrd, PolicyInstance, PolicyValue,
    ResourceKind, ResourceRef,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Generate a scalar policy value.
fn arb_scalar() -> impl Strategy<Value = PolicyValue> {
    prop_oneof![
        Just(PolicyValue::Null),
        any::<bool>().prop_map(PolicyValue::Bool),
        (-1000i64..1000).prop_map(|n| PolicyValue::Number(n as f64)),
        "[a-z]{1,8}".prop_map(PolicyValue::String),
    ]
}

/// Generate an arbitrary policy value tree, bounded in depth and width.
fn arb_value() -> impl Strategy<Value = PolicyValue> {
    arb_scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(PolicyValue::List),
            prop::collection::btree_map("[a-d]{1,3}", inner, 0..4)
                .prop_map(PolicyValue::Object),
        ]
    })
}

/// Generate a non-empty object, the shape a policy spec always has.
fn arb_spec() -> impl Strategy<Value = PolicyValue> {
    prop::collection::btree_map("[a-d]{1,3}", arb_value(), 1..4).prop_map(PolicyValue::Object)
}

fn timeout_kind() -> GroupKind {
    GroupKind::new("example.com", "TimeoutPolicy")
}

fn inheritable_crd() -> PolicyCrd {
    PolicyCrd::new(
        timeout_kind(),
        [
            ResourceKind::GatewayClass,
            ResourceKind::Gateway,
            ResourceKind::HttpRoute,
        ],
        InheritanceScope::Inheritable,
    )
}

/// GatewayClass gc1 ← Gateway gw1 ← HTTPRoute r1.
fn linear_graph() -> GraphSnapshot {
    let class = ResourceRef::cluster_scoped(ResourceKind::GatewayClass, "gc1");
    let gateway = ResourceRef::new(ResourceKind::Gateway, "default", "gw1");
    let route = ResourceRef::new(ResourceKind::HttpRoute, "default", "r1");

    let mut graph = GraphSnapshot::new();
    for r in [class.clone(), gateway.clone(), route.clone()] {
        graph.insert_resource(r);
    }
    graph.set_gateway_class(gateway.clone(), class);
    graph.link_route_to_gateway(route, gateway);
    graph
}

/// One instance per hierarchy tier, each with an arbitrary spec.
fn tiered_instances(specs: Vec<PolicyValue>) -> Vec<PolicyInstance> {
    let targets = [
        ResourceRef::cluster_scoped(ResourceKind::GatewayClass, "gc1"),
        ResourceRef::new(ResourceKind::Gateway, "default", "gw1"),
        ResourceRef::new(ResourceKind::HttpRoute, "default", "r1"),
    ];
    specs
        .into_iter()
        .zip(targets)
        .enumerate()
        .map(|(i, (spec, target))| PolicyInstance {
            group_kind: timeout_kind(),
            namespace: "default".to_string(),
            name: format!("p{}", i),
            target,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, i as u32).unwrap(),
            spec,
        })
        .collect()
}

fn catalog_of(instances: &[PolicyInstance]) -> PolicyCatalog {
    let mut catalog = PolicyCatalog::new();
    catalog.register_crd(inheritable_crd()).unwrap();
    for instance in instances {
        assert!(catalog.register_instance(instance.clone()).is_none());
    }
    catalog
}

/// Look up the value at a dot-joined path, if the tree still has one there.
fn value_at<'a>(value: &'a PolicyValue, path: &str) -> Option<&'a PolicyValue> {
    if path.is_empty() {
        return Some(value);
    }
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Merging is a pure function of its inputs.
    #[test]
    fn merge_is_deterministic(base in arb_spec(), overlay in arb_spec()) {
        let first = merge(&base, &overlay);
        let second = merge(&base, &overlay);
        prop_assert_eq!(first, second);
    }

    /// Merging a tree onto itself reproduces the tree.
    #[test]
    fn merge_onto_self_is_identity(value in arb_spec()) {
        let merged = merge(&value, &value);
        prop_assert_eq!(merged.value, value);
    }

    /// Every leaf of the overlay survives the merge with its own value:
    /// the higher-precedence side is never lost, whatever the base holds.
    /// (An empty overlay object is not a value, just structure, and may
    /// legitimately absorb base fields.)
    #[test]
    fn overlay_leaves_always_win(base in arb_spec(), overlay in arb_spec()) {
        let merged = merge(&base, &overlay);
        for path in leaf_paths(&overlay) {
            let original = value_at(&overlay, &path);
            if original.is_some_and(|v| v.is_empty_object()) {
                continue;
            }
            let survived = value_at(&merged.value, &path);
            prop_assert_eq!(survived, original, "overlay lost path {}", path);
        }
    }

    /// Merging the same overlay twice changes nothing after the first
    /// application.
    #[test]
    fn merge_is_idempotent_over_overlay(base in arb_spec(), overlay in arb_spec()) {
        let once = merge(&base, &overlay);
        let twice = merge(&once.value, &overlay);
        prop_assert_eq!(once.value, twice.value);
    }

    /// The calculation does not depend on catalog registration order.
    #[test]
    fn calculation_is_permutation_invariant(
        specs in prop::collection::vec(arb_spec(), 3),
        order in prop::sample::select(vec![
            [0usize, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0],
        ]),
    ) {
        let graph = linear_graph();
        let route = ResourceRef::new(ResourceKind::HttpRoute, "default", "r1");
        let instances = tiered_instances(specs);

        let baseline = catalog_of(&instances);
        let permuted_instances: Vec<PolicyInstance> =
            order.iter().map(|&i| instances[i].clone()).collect();
        let permuted = catalog_of(&permuted_instances);

        let a = EffectivePolicyCalculator::new(&baseline, &graph)
            .compute(&route, &timeout_kind());
        let b = EffectivePolicyCalculator::new(&permuted, &graph)
            .compute(&route, &timeout_kind());
        prop_assert_eq!(a, b);
    }

    /// Recomputing over the same immutable inputs yields identical results.
    #[test]
    fn calculation_is_idempotent(specs in prop::collection::vec(arb_spec(), 3)) {
        let graph = linear_graph();
        let route = ResourceRef::new(ResourceKind::HttpRoute, "default", "r1");
        let catalog = catalog_of(&tiered_instances(specs));
        let calculator = EffectivePolicyCalculator::new(&catalog, &graph);

        let first = calculator.compute(&route, &timeout_kind());
        let second = calculator.compute(&route, &timeout_kind());
        prop_assert_eq!(first, second);
    }

    /// Every leaf of the direct (nearest-tier) policy spec survives into
    /// the effective value verbatim.
    #[test]
    fn direct_tier_always_wins(specs in prop::collection::vec(arb_spec(), 3)) {
        let graph = linear_graph();
        let route = ResourceRef::new(ResourceKind::HttpRoute, "default", "r1");
        let instances = tiered_instances(specs);
        let direct_spec = instances[2].spec.clone();
        let catalog = catalog_of(&instances);

        let computation = EffectivePolicyCalculator::new(&catalog, &graph)
            .compute(&route, &timeout_kind());
        prop_assert_eq!(computation.results.len(), 1);
        let effective = &computation.results[0].policy.value;
        for path in leaf_paths(&direct_spec) {
            let original = value_at(&direct_spec, &path);
            if original.is_some_and(|v| v.is_empty_object()) {
                continue;
            }
            prop_assert_eq!(
                value_at(effective, &path),
                original,
                "direct policy lost path {}", path
            );
        }
    }

    /// Every provenance entry points at a path that exists in the
    /// effective value, and every leaf of the value has an owner.
    #[test]
    fn provenance_covers_exactly_the_leaves(
        specs in prop::collection::vec(arb_spec(), 3),
    ) {
        let graph = linear_graph();
        let route = ResourceRef::new(ResourceKind::HttpRoute, "default", "r1");
        let catalog = catalog_of(&tiered_instances(specs));

        let computation = EffectivePolicyCalculator::new(&catalog, &graph)
            .compute(&route, &timeout_kind());
        let policy = &computation.results[0].policy;

        let leaves: BTreeMap<String, ()> = leaf_paths(&policy.value)
            .into_iter()
            .map(|p| (p, ()))
            .collect();
        for path in policy.provenance.keys() {
            prop_assert!(leaves.contains_key(path), "stale provenance at {}", path);
        }
        for leaf in leaves.keys() {
            prop_assert!(
                policy.provenance.contains_key(leaf),
                "leaf {} has no provenance", leaf
            );
        }
    }
}
