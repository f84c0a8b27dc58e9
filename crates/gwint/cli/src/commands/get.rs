//! `gwint get` - list resources, policies, and policy CRDs.

use crate::commands::{Context, TargetType};
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use gwint_types::{PolicyCrd, PolicyInstance, ResourceRef};
use serde::Serialize;
use tabled::Tabled;

/// Table row for policy instances
#[derive(Debug, Serialize, Tabled)]
struct PolicyRow {
    namespace: String,
    name: String,
    kind: String,
    target: String,
}

impl From<&PolicyInstance> for PolicyRow {
    fn from(policy: &PolicyInstance) -> Self {
        Self {
            namespace: policy.namespace.clone(),
            name: policy.name.clone(),
            kind: policy.group_kind.to_string(),
            target: policy.target.to_string(),
        }
    }
}

/// Table row for policy CRDs
#[derive(Debug, Serialize, Tabled)]
struct CrdRow {
    kind: String,
    scope: String,
    targets: String,
}

impl From<&PolicyCrd> for CrdRow {
    fn from(crd: &PolicyCrd) -> Self {
        Self {
            kind: crd.group_kind.to_string(),
            scope: format!("{:?}", crd.scope),
            targets: crd
                .target_kinds
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Table row for hierarchy resources
#[derive(Debug, Serialize, Tabled)]
struct ResourceRow {
    namespace: String,
    name: String,
    policies: usize,
}

/// Execute a get command
pub fn execute(ctx: &Context, target: TargetType, format: OutputFormat) -> CliResult<()> {
    match target {
        TargetType::Policies => {
            let rows: Vec<PolicyRow> = ctx
                .catalog
                .instances()
                .into_iter()
                .filter(|p| matches_namespace(ctx, &p.namespace))
                .map(PolicyRow::from)
                .collect();
            output::print_output(rows, format);
        }
        TargetType::PolicyCrds => {
            let rows: Vec<CrdRow> = ctx.catalog.crds().map(CrdRow::from).collect();
            output::print_output(rows, format);
        }
        TargetType::Resource(kind) => {
            let rows: Vec<ResourceRow> = ctx
                .snapshot
                .resources_matching(kind, &ctx.query)
                .iter()
                .map(|resource| ResourceRow {
                    namespace: resource.namespace.clone(),
                    name: resource.name.clone(),
                    policies: direct_policy_count(ctx, resource),
                })
                .collect();
            output::print_output(rows, format);
        }
    }
    Ok(())
}

fn direct_policy_count(ctx: &Context, resource: &ResourceRef) -> usize {
    ctx.catalog.policies_targeting(resource).len()
}

fn matches_namespace(ctx: &Context, namespace: &str) -> bool {
    match &ctx.query {
        gwint_snapshot::ResourceQuery::All => true,
        gwint_snapshot::ResourceQuery::Namespace(ns) => namespace == ns,
    }
}
