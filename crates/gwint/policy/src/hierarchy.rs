//! Ancestor chain resolution over a materialized resource graph.
//!
//! Chains follow the static Gateway API relationship rules: HTTPRoute →
//! parent Gateway(s), Gateway → GatewayClass, Backend → referencing
//! HTTPRoute(s) and onward. A resource with several parents yields one
//! chain per parent path; the calculator treats each chain independently.

use crate::warning::Warning;
use gwint_types::{GraphSnapshot, ResourceRef};
use tracing::{debug, warn};

/// Ordered ancestors of one resource, nearest ancestor first, ending at
/// the root or at the first unresolved reference.
pub type AncestorChain = Vec<ResourceRef>;

/// Upper bound on chain length. The Gateway API hierarchy is at most
/// Backend → HTTPRoute → Gateway → GatewayClass; anything deeper means
/// the snapshot is malformed and resolution stops rather than recursing.
pub const MAX_CHAIN_DEPTH: usize = 4;

/// All ancestor chains of a target, plus any findings made along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainResolution {
    /// One chain per parent path, in deterministic order. A resource with
    /// no resolvable parent yields a single empty chain.
    pub chains: Vec<AncestorChain>,
    pub warnings: Vec<Warning>,
}

/// Resolve the ancestor chains of `target` over the supplied snapshot.
///
/// Pure function: no cluster access, no caching. A referenced ancestor
/// absent from the snapshot ends the chain there — a dangling reference
/// is legitimate transient cluster state, not an error. Cycles cannot
/// occur in the real object model but are broken defensively, truncating
/// the chain at the repetition point with a warning.
pub fn ancestor_chains(target: &ResourceRef, graph: &GraphSnapshot) -> ChainResolution {
    let mut chains = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = vec![target.clone()];

    walk(target, graph, &mut seen, &mut Vec::new(), &mut chains, &mut warnings);

    chains.sort();
    chains.dedup();
    debug!(target = %target, chains = chains.len(), "Resolved ancestor chains");
    ChainResolution { chains, warnings }
}

fn walk(
    current: &ResourceRef,
    graph: &GraphSnapshot,
    seen: &mut Vec<ResourceRef>,
    chain: &mut AncestorChain,
    chains: &mut Vec<AncestorChain>,
    warnings: &mut Vec<Warning>,
) {
    let mut extended = false;

    if chain.len() < MAX_CHAIN_DEPTH {
        for parent in graph.parents_of(current) {
            if !graph.contains(&parent) {
                // Dangling reference: the chain ends here.
                debug!(parent = %parent, "Referenced ancestor absent from snapshot");
                continue;
            }
            if seen.contains(&parent) {
                warnings.push(Warning::CycleDetected { at: parent.clone() });
                continue;
            }
            extended = true;
            seen.push(parent.clone());
            chain.push(parent.clone());
            walk(&parent, graph, seen, chain, chains, warnings);
            chain.pop();
            seen.pop();
        }
    } else {
        warn!(at = %current, "Ancestor chain exceeds hierarchy depth; truncating");
    }

    if !extended {
        chains.push(chain.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwint_types::ResourceKind;

    fn class(name: &str) -> ResourceRef {
        ResourceRef::cluster_scoped(ResourceKind::GatewayClass, name)
    }

    fn gateway(name: &str) -> ResourceRef {
        ResourceRef::new(ResourceKind::Gateway, "default", name)
    }

    fn route(name: &str) -> ResourceRef {
        ResourceRef::new(ResourceKind::HttpRoute, "default", name)
    }

    fn backend(name: &str) -> ResourceRef {
        ResourceRef::new(ResourceKind::Backend, "default", name)
    }

    fn linear_graph() -> GraphSnapshot {
        let mut graph = GraphSnapshot::new();
        for r in [class("gc1"), gateway("gw1"), route("r1"), backend("svc1")] {
            graph.insert_resource(r);
        }
        graph.set_gateway_class(gateway("gw1"), class("gc1"));
        graph.link_route_to_gateway(route("r1"), gateway("gw1"));
        graph.link_backend_to_route(backend("svc1"), route("r1"));
        graph
    }

    #[test]
    fn test_route_chain_is_gateway_then_class() {
        let resolution = ancestor_chains(&route("r1"), &linear_graph());
        assert_eq!(
            resolution.chains,
            vec![vec![gateway("gw1"), class("gc1")]]
        );
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_backend_chain_goes_through_its_route() {
        let resolution = ancestor_chains(&backend("svc1"), &linear_graph());
        assert_eq!(
            resolution.chains,
            vec![vec![route("r1"), gateway("gw1"), class("gc1")]]
        );
    }

    #[test]
    fn test_root_has_one_empty_chain() {
        let resolution = ancestor_chains(&class("gc1"), &linear_graph());
        assert_eq!(resolution.chains, vec![Vec::<ResourceRef>::new()]);
    }

    #[test]
    fn test_dangling_reference_ends_the_chain() {
        let mut graph = GraphSnapshot::new();
        graph.insert_resource(route("r1"));
        graph.insert_resource(gateway("gw1"));
        graph.link_route_to_gateway(route("r1"), gateway("gw1"));
        // gw1's class reference points at a resource not in the snapshot.
        graph.set_gateway_class(gateway("gw1"), class("missing"));

        let resolution = ancestor_chains(&route("r1"), &graph);
        assert_eq!(resolution.chains, vec![vec![gateway("gw1")]]);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_multi_parent_route_yields_one_chain_per_parent() {
        let mut graph = linear_graph();
        graph.insert_resource(gateway("gw2"));
        graph.insert_resource(class("gc2"));
        graph.set_gateway_class(gateway("gw2"), class("gc2"));
        graph.link_route_to_gateway(route("r1"), gateway("gw2"));

        let resolution = ancestor_chains(&route("r1"), &graph);
        assert_eq!(resolution.chains.len(), 2);
        assert!(resolution
            .chains
            .contains(&vec![gateway("gw1"), class("gc1")]));
        assert!(resolution
            .chains
            .contains(&vec![gateway("gw2"), class("gc2")]));
    }

    #[test]
    fn test_cycle_truncates_with_warning() {
        let mut graph = GraphSnapshot::new();
        let (a, b) = (gateway("a"), gateway("b"));
        graph.insert_resource(a.clone());
        graph.insert_resource(b.clone());
        // Adversarial input: two gateways claiming each other as class.
        graph.set_gateway_class(a.clone(), b.clone());
        graph.set_gateway_class(b.clone(), a.clone());

        let resolution = ancestor_chains(&a, &graph);
        assert_eq!(resolution.chains, vec![vec![b]]);
        assert_eq!(
            resolution.warnings,
            vec![Warning::CycleDetected { at: a }]
        );
    }

    #[test]
    fn test_self_cycle_terminates() {
        let mut graph = GraphSnapshot::new();
        let a = gateway("a");
        graph.insert_resource(a.clone());
        graph.set_gateway_class(a.clone(), a.clone());

        let resolution = ancestor_chains(&a, &graph);
        assert_eq!(resolution.chains, vec![Vec::<ResourceRef>::new()]);
        assert_eq!(
            resolution.warnings,
            vec![Warning::CycleDetected { at: a }]
        );
    }

    #[test]
    fn test_depth_bound_holds_on_adversarial_graphs() {
        // A long synthetic chain of gateways pointing at gateways.
        let mut graph = GraphSnapshot::new();
        let refs: Vec<ResourceRef> = (0..10).map(|i| gateway(&format!("g{}", i))).collect();
        for r in &refs {
            graph.insert_resource(r.clone());
        }
        for pair in refs.windows(2) {
            graph.set_gateway_class(pair[0].clone(), pair[1].clone());
        }

        let resolution = ancestor_chains(&refs[0], &graph);
        assert_eq!(resolution.chains.len(), 1);
        assert_eq!(resolution.chains[0].len(), MAX_CHAIN_DEPTH);
    }
}
