//! Materialized parent/child edges of the Gateway API resource graph.
//!
//! The snapshot collaborator resolves spec fields (`parentRefs`,
//! `gatewayClassName`, backend references) into explicit edges once per
//! invocation; the hierarchy resolver then walks them without touching
//! any spec payloads. The snapshot is read-only after construction.

use crate::resource::{ResourceKind, ResourceRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable view of the resource graph for one invocation.
///
/// Edges may point at resources absent from the snapshot; a dangling
/// reference is legitimate transient cluster state, and chain resolution
/// simply stops there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    resources: BTreeSet<ResourceRef>,
    route_parents: BTreeMap<ResourceRef, BTreeSet<ResourceRef>>,
    gateway_class: BTreeMap<ResourceRef, ResourceRef>,
    backend_routes: BTreeMap<ResourceRef, BTreeSet<ResourceRef>>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_resource(&mut self, resource: ResourceRef) {
        self.resources.insert(resource);
    }

    pub fn contains(&self, resource: &ResourceRef) -> bool {
        self.resources.contains(resource)
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResourceRef> {
        self.resources.iter()
    }

    /// Resources of one kind, in deterministic order.
    pub fn resources_of_kind(&self, kind: ResourceKind) -> Vec<ResourceRef> {
        self.resources
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect()
    }

    /// Record an HTTPRoute → Gateway parent edge.
    pub fn link_route_to_gateway(&mut self, route: ResourceRef, gateway: ResourceRef) {
        self.route_parents.entry(route).or_default().insert(gateway);
    }

    /// Record a Gateway → GatewayClass edge.
    pub fn set_gateway_class(&mut self, gateway: ResourceRef, class: ResourceRef) {
        self.gateway_class.insert(gateway, class);
    }

    /// Record a Backend → HTTPRoute edge (the route references the backend).
    pub fn link_backend_to_route(&mut self, backend: ResourceRef, route: ResourceRef) {
        self.backend_routes.entry(backend).or_default().insert(route);
    }

    /// Declared parents of a resource, per the static relationship rules:
    /// HTTPRoute → parent Gateways, Gateway → GatewayClass, Backend →
    /// referencing HTTPRoutes. GatewayClass is the root and has none.
    ///
    /// Returned in deterministic order. Dangling refs are included; the
    /// caller decides whether an absent parent ends the chain.
    pub fn parents_of(&self, resource: &ResourceRef) -> Vec<ResourceRef> {
        match resource.kind {
            ResourceKind::GatewayClass => Vec::new(),
            ResourceKind::Gateway => self
                .gateway_class
                .get(resource)
                .cloned()
                .into_iter()
                .collect(),
            ResourceKind::HttpRoute => self
                .route_parents
                .get(resource)
                .map(|parents| parents.iter().cloned().collect())
                .unwrap_or_default(),
            ResourceKind::Backend => self
                .backend_routes
                .get(resource)
                .map(|routes| routes.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str) -> ResourceRef {
        ResourceRef::new(ResourceKind::HttpRoute, "default", name)
    }

    fn gateway(name: &str) -> ResourceRef {
        ResourceRef::new(ResourceKind::Gateway, "default", name)
    }

    #[test]
    fn test_parents_dispatch_by_kind() {
        let mut graph = GraphSnapshot::new();
        let gc = ResourceRef::cluster_scoped(ResourceKind::GatewayClass, "gc1");
        graph.set_gateway_class(gateway("gw1"), gc.clone());
        graph.link_route_to_gateway(route("r1"), gateway("gw1"));

        assert_eq!(graph.parents_of(&route("r1")), vec![gateway("gw1")]);
        assert_eq!(graph.parents_of(&gateway("gw1")), vec![gc.clone()]);
        assert!(graph.parents_of(&gc).is_empty());
    }

    #[test]
    fn test_multi_parent_routes_are_ordered_and_deduped() {
        let mut graph = GraphSnapshot::new();
        graph.link_route_to_gateway(route("r1"), gateway("gw2"));
        graph.link_route_to_gateway(route("r1"), gateway("gw1"));
        graph.link_route_to_gateway(route("r1"), gateway("gw2"));

        assert_eq!(
            graph.parents_of(&route("r1")),
            vec![gateway("gw1"), gateway("gw2")]
        );
    }

    #[test]
    fn test_backend_parents_are_referencing_routes() {
        let mut graph = GraphSnapshot::new();
        let backend = ResourceRef::new(ResourceKind::Backend, "default", "svc1");
        graph.link_backend_to_route(backend.clone(), route("r1"));

        assert_eq!(graph.parents_of(&backend), vec![route("r1")]);
    }

    #[test]
    fn test_resources_of_kind() {
        let mut graph = GraphSnapshot::new();
        graph.insert_resource(route("r2"));
        graph.insert_resource(route("r1"));
        graph.insert_resource(gateway("gw1"));

        assert_eq!(
            graph.resources_of_kind(ResourceKind::HttpRoute),
            vec![route("r1"), route("r2")]
        );
    }
}
