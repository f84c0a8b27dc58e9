//! Command implementations.

pub mod describe;
pub mod get;

use crate::error::{CliError, CliResult};
use crate::output::print_warning;
use gwint_policy::PolicyCatalog;
use gwint_snapshot::{ClusterSnapshot, ResourceQuery};
use gwint_types::ResourceKind;
use std::str::FromStr;

/// Everything a command needs: the loaded snapshot, the indexed policy
/// catalog, and the effective namespace filter.
pub struct Context {
    pub snapshot: ClusterSnapshot,
    pub catalog: PolicyCatalog,
    pub query: ResourceQuery,
}

impl Context {
    /// Build the catalog from the snapshot's declarations. CRD
    /// registration failures are fatal; instance-level problems are
    /// printed and the calculation proceeds without the offender.
    pub fn build(snapshot: ClusterSnapshot, query: ResourceQuery) -> CliResult<Self> {
        let mut catalog = PolicyCatalog::new();
        for crd in &snapshot.crds {
            catalog.register_crd(crd.clone())?;
        }
        for policy in &snapshot.policies {
            if let Some(warning) = catalog.register_instance(policy.clone()) {
                print_warning(&warning.to_string());
            }
        }
        Ok(Self {
            snapshot,
            catalog,
            query,
        })
    }
}

/// What a RESOURCE_TYPE argument names: policy objects, policy CRDs, or
/// one of the hierarchy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Policies,
    PolicyCrds,
    Resource(ResourceKind),
}

/// Parse a RESOURCE_TYPE argument. Accepts singular and plural spellings,
/// case-insensitively.
pub fn parse_target_type(arg: &str) -> CliResult<TargetType> {
    match arg.to_ascii_lowercase().as_str() {
        "policy" | "policies" => Ok(TargetType::Policies),
        "policycrd" | "policycrds" => Ok(TargetType::PolicyCrds),
        other => ResourceKind::from_str(other)
            .map(TargetType::Resource)
            .map_err(|_| CliError::UnrecognizedResourceType(arg.to_string())),
    }
}
