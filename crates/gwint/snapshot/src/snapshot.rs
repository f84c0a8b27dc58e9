//! Materialized cluster state: the resource graph plus every policy CRD
//! and policy instance declared in the snapshot.

use crate::error::{SnapshotError, SnapshotResult};
use crate::manifest::{ManifestDoc, ScopeSpec};
use chrono::{DateTime, Utc};
use gwint_types::{
    GraphSnapshot, GroupKind, InheritanceScope, PolicyCrd, PolicyInstance, ResourceKind,
    ResourceRef,
};
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, warn};

/// Namespace filter for listing resources, mirroring the CLI's
/// `-n`/`--all-namespaces` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceQuery {
    Namespace(String),
    All,
}

impl ResourceQuery {
    /// Cluster-scoped resources match every namespace filter.
    pub fn matches(&self, resource: &ResourceRef) -> bool {
        match self {
            ResourceQuery::All => true,
            ResourceQuery::Namespace(ns) => {
                resource.namespace.is_empty() || &resource.namespace == ns
            }
        }
    }
}

/// An immutable, point-in-time view of the cluster.
///
/// Everything the calculator needs is materialized here; no further I/O
/// happens once a snapshot is built.
#[derive(Debug, Clone, Default)]
pub struct ClusterSnapshot {
    pub graph: GraphSnapshot,
    pub crds: Vec<PolicyCrd>,
    pub policies: Vec<PolicyInstance>,
}

impl ClusterSnapshot {
    /// Parse a multi-document YAML stream into a snapshot.
    ///
    /// Documents with an unrecognized `kind` are skipped with a log line
    /// rather than failing the load: snapshots taken from real clusters
    /// carry plenty of unrelated objects.
    pub fn parse_str(text: &str) -> SnapshotResult<Self> {
        let mut docs = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = serde_yaml::Value::deserialize(document)?;
            if value.is_null() {
                continue;
            }
            let Some(kind) = value.get("kind").and_then(|k| k.as_str()) else {
                return Err(SnapshotError::InvalidManifest {
                    detail: "document has no kind field".to_string(),
                });
            };
            match kind {
                "GatewayClass" | "Gateway" | "HTTPRoute" | "Backend" | "PolicyCRD"
                | "Policy" => {
                    docs.push(serde_yaml::from_value::<ManifestDoc>(value)?);
                }
                other => {
                    debug!(kind = other, "Skipping unrelated document kind");
                }
            }
        }
        Self::from_documents(docs)
    }

    /// Assemble the graph, CRD list, and policy list from parsed documents.
    pub fn from_documents(docs: Vec<ManifestDoc>) -> SnapshotResult<Self> {
        let mut snapshot = ClusterSnapshot::default();

        // First pass: declare resources so references can be validated
        // against the full set.
        for doc in &docs {
            if let Some(resource) = declared_resource(doc) {
                snapshot.graph.insert_resource(resource);
            }
        }

        // Second pass: relationships and policy objects. References to
        // undeclared resources are recorded as-is; chain resolution treats
        // them as dangling.
        for doc in docs {
            match doc {
                ManifestDoc::GatewayClass { .. } | ManifestDoc::Backend { .. } => {}
                ManifestDoc::Gateway { metadata, spec } => {
                    if let Some(class_name) = spec.gateway_class_name {
                        let gateway = ResourceRef::new(
                            ResourceKind::Gateway,
                            &effective_namespace(&metadata.namespace),
                            &metadata.name,
                        );
                        let class =
                            ResourceRef::cluster_scoped(ResourceKind::GatewayClass, &class_name);
                        snapshot.graph.set_gateway_class(gateway, class);
                    }
                }
                ManifestDoc::HttpRoute { metadata, spec } => {
                    let namespace = effective_namespace(&metadata.namespace);
                    let route =
                        ResourceRef::new(ResourceKind::HttpRoute, &namespace, &metadata.name);
                    for parent in spec.parent_refs {
                        let gateway = ResourceRef::new(
                            ResourceKind::Gateway,
                            parent.namespace.as_deref().unwrap_or(&namespace),
                            &parent.name,
                        );
                        snapshot
                            .graph
                            .link_route_to_gateway(route.clone(), gateway);
                    }
                    for backend in spec.backend_refs {
                        let backend = ResourceRef::new(
                            ResourceKind::Backend,
                            backend.namespace.as_deref().unwrap_or(&namespace),
                            &backend.name,
                        );
                        snapshot
                            .graph
                            .link_backend_to_route(backend, route.clone());
                    }
                }
                ManifestDoc::PolicyCrd { metadata, spec } => {
                    let mut target_kinds = Vec::new();
                    for kind in &spec.target_kinds {
                        match ResourceKind::from_str(kind) {
                            Ok(kind) => target_kinds.push(kind),
                            Err(err) => {
                                warn!(crd = %metadata.name, %err, "Skipping unknown target kind");
                            }
                        }
                    }
                    let scope = match spec.scope {
                        ScopeSpec::DirectOnly => InheritanceScope::DirectOnly,
                        ScopeSpec::Inheritable => InheritanceScope::Inheritable,
                    };
                    snapshot.crds.push(PolicyCrd::new(
                        GroupKind::new(&spec.group, &spec.kind),
                        target_kinds,
                        scope,
                    ));
                }
                ManifestDoc::Policy { metadata, spec } => {
                    let kind = match ResourceKind::from_str(&spec.target_ref.kind) {
                        Ok(kind) => kind,
                        Err(err) => {
                            warn!(policy = %metadata.name, %err, "Dropping policy with unknown target kind");
                            continue;
                        }
                    };
                    let namespace = effective_namespace(&metadata.namespace);
                    let target = if kind.is_namespaced() {
                        ResourceRef::new(
                            kind,
                            spec.target_ref.namespace.as_deref().unwrap_or(&namespace),
                            &spec.target_ref.name,
                        )
                    } else {
                        ResourceRef::cluster_scoped(kind, &spec.target_ref.name)
                    };
                    snapshot.policies.push(PolicyInstance {
                        group_kind: GroupKind::new(
                            &spec.group_kind.group,
                            &spec.group_kind.kind,
                        ),
                        namespace,
                        name: metadata.name,
                        target,
                        created_at: metadata
                            .creation_timestamp
                            .unwrap_or(DateTime::<Utc>::MIN_UTC),
                        spec: spec.values,
                    });
                }
            }
        }

        debug!(
            resources = snapshot.graph.resources().count(),
            crds = snapshot.crds.len(),
            policies = snapshot.policies.len(),
            "Snapshot assembled"
        );
        Ok(snapshot)
    }

    /// Declared resources of one kind matching a namespace filter, in
    /// deterministic order.
    pub fn resources_matching(
        &self,
        kind: ResourceKind,
        query: &ResourceQuery,
    ) -> Vec<ResourceRef> {
        self.graph
            .resources_of_kind(kind)
            .into_iter()
            .filter(|r| query.matches(r))
            .collect()
    }

    /// Look up one declared resource by kind, namespace, and name.
    pub fn get_resource(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Option<ResourceRef> {
        let resource = if kind.is_namespaced() {
            ResourceRef::new(kind, namespace, name)
        } else {
            ResourceRef::cluster_scoped(kind, name)
        };
        self.graph.contains(&resource).then_some(resource)
    }
}

fn declared_resource(doc: &ManifestDoc) -> Option<ResourceRef> {
    match doc {
        ManifestDoc::GatewayClass { metadata } => Some(ResourceRef::cluster_scoped(
            ResourceKind::GatewayClass,
            &metadata.name,
        )),
        ManifestDoc::Gateway { metadata, .. } => Some(ResourceRef::new(
            ResourceKind::Gateway,
            &effective_namespace(&metadata.namespace),
            &metadata.name,
        )),
        ManifestDoc::HttpRoute { metadata, .. } => Some(ResourceRef::new(
            ResourceKind::HttpRoute,
            &effective_namespace(&metadata.namespace),
            &metadata.name,
        )),
        ManifestDoc::Backend { metadata } => Some(ResourceRef::new(
            ResourceKind::Backend,
            &effective_namespace(&metadata.namespace),
            &metadata.name,
        )),
        ManifestDoc::PolicyCrd { .. } | ManifestDoc::Policy { .. } => None,
    }
}

fn effective_namespace(namespace: &str) -> String {
    if namespace.is_empty() {
        "default".to_string()
    } else {
        namespace.to_string()
    }
}
