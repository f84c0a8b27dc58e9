//! gwint Types - Core types for Gateway API policy inspection
//!
//! gwint inspects a Gateway API resource graph (GatewayClasses, Gateways,
//! HTTPRoutes, Backends) and the generic Policy custom resources attached
//! to them, and answers: "what configuration actually applies to resource
//! X once inheritance and overrides are resolved?"
//!
//! ## Architectural Boundaries
//!
//! - **gwint-types** owns: resource identities, the schema-free policy
//!   value tree, policy CRD/instance models, and the materialized graph
//!   snapshot the engine walks.
//! - **gwint-policy** owns: catalog indexing, hierarchy resolution, the
//!   structural merge, and effective policy computation.
//! - **gwint-snapshot** owns: producing one immutable snapshot per
//!   invocation from whatever backs the cluster view.
//!
//! ## Key Concepts
//!
//! - **ResourceRef**: (kind, namespace, name) identity of a graph member
//! - **PolicyValue**: tagged-variant field tree carried by policy payloads
//! - **PolicyCrd**: a policy kind, its supported targets, and its scope
//! - **EffectivePolicy**: merged view plus per-field provenance

#![deny(unsafe_code)]

pub mod graph;
pub mod policy;
pub mod resource;
pub mod value;

// Re-export main types
pub use graph::GraphSnapshot;
pub use policy::{EffectivePolicy, InheritanceScope, PolicyCrd, PolicyInstance, PolicyRef};
pub use resource::{GroupKind, ResourceKind, ResourceRef, UnknownResourceKind};
pub use value::PolicyValue;
