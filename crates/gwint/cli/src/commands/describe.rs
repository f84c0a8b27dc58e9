//! `gwint describe` - detailed views, including effective policies.
//!
//! Describing a hierarchy resource runs the full calculation: for every
//! registered policy kind, the resource's ancestor chains are resolved and
//! the applicable policies merged into one effective value per parent,
//! with per-field provenance.

use crate::commands::{Context, TargetType};
use crate::error::{CliError, CliResult};
use crate::output::{self, print_header, print_warning, OutputFormat};
use gwint_policy::{ancestor_chains, EffectivePolicyCalculator};
use gwint_types::{PolicyValue, ResourceKind, ResourceRef};
use serde::Serialize;
use std::collections::BTreeMap;

/// One effective policy kind on one resource, for one parent chain.
#[derive(Debug, Serialize)]
struct EffectiveSection {
    policy_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    values: PolicyValue,
    provenance: BTreeMap<String, String>,
}

/// Full describe report for one hierarchy resource.
#[derive(Debug, Serialize)]
struct ResourceReport {
    name: String,
    kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    namespace: String,
    /// One rendered chain per parent path, nearest ancestor first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ancestors: Vec<String>,
    effective_policies: Vec<EffectiveSection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

/// Describe report for one policy instance.
#[derive(Debug, Serialize)]
struct PolicyReport {
    name: String,
    namespace: String,
    policy_kind: String,
    target: String,
    created_at: String,
    values: PolicyValue,
}

/// Describe report for one policy CRD.
#[derive(Debug, Serialize)]
struct CrdReport {
    policy_kind: String,
    scope: String,
    target_kinds: Vec<String>,
}

/// Execute a describe command
pub fn execute(
    ctx: &Context,
    target: TargetType,
    name: Option<String>,
    namespace: &str,
    across_parents: bool,
    format: OutputFormat,
) -> CliResult<()> {
    match target {
        TargetType::Policies => describe_policies(ctx, name, namespace, format),
        TargetType::PolicyCrds => describe_crds(ctx, name, format),
        TargetType::Resource(kind) => {
            describe_resources(ctx, kind, name, namespace, across_parents, format)
        }
    }
}

fn describe_policies(
    ctx: &Context,
    name: Option<String>,
    namespace: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let reports: Vec<PolicyReport> = match name {
        Some(name) => {
            let policy = ctx
                .catalog
                .instance_named(namespace, &name)
                .ok_or_else(|| CliError::NotFound(format!("policy {}/{}", namespace, name)))?;
            vec![policy_report(policy)]
        }
        None => ctx
            .catalog
            .instances()
            .into_iter()
            .map(policy_report)
            .collect(),
    };
    for report in reports {
        output::print_single(&report, format);
    }
    Ok(())
}

fn policy_report(policy: &gwint_types::PolicyInstance) -> PolicyReport {
    PolicyReport {
        name: policy.name.clone(),
        namespace: policy.namespace.clone(),
        policy_kind: policy.group_kind.to_string(),
        target: policy.target.to_string(),
        created_at: policy.created_at.to_rfc3339(),
        values: policy.spec.clone(),
    }
}

fn describe_crds(ctx: &Context, name: Option<String>, format: OutputFormat) -> CliResult<()> {
    let mut found = false;
    for crd in ctx.catalog.crds() {
        if let Some(name) = &name {
            if &crd.group_kind.to_string() != name && &crd.group_kind.kind != name {
                continue;
            }
        }
        found = true;
        let report = CrdReport {
            policy_kind: crd.group_kind.to_string(),
            scope: format!("{:?}", crd.scope),
            target_kinds: crd
                .target_kinds
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
        };
        output::print_single(&report, format);
    }
    if let Some(name) = name {
        if !found {
            return Err(CliError::NotFound(format!("policy CRD {}", name)));
        }
    }
    Ok(())
}

fn describe_resources(
    ctx: &Context,
    kind: ResourceKind,
    name: Option<String>,
    namespace: &str,
    across_parents: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let resources: Vec<ResourceRef> = match name {
        Some(name) => {
            let resource = ctx
                .snapshot
                .get_resource(kind, namespace, &name)
                .ok_or_else(|| CliError::NotFound(format!("{} {}", kind, name)))?;
            vec![resource]
        }
        None => ctx.snapshot.resources_matching(kind, &ctx.query),
    };

    for resource in resources {
        let report = build_report(ctx, &resource, across_parents);
        match format {
            OutputFormat::Table => print_report(&report),
            other => output::print_single(&report, other),
        }
    }
    Ok(())
}

fn build_report(ctx: &Context, resource: &ResourceRef, across_parents: bool) -> ResourceReport {
    let calculator = EffectivePolicyCalculator::new(&ctx.catalog, &ctx.snapshot.graph);
    let mut sections = Vec::new();
    let mut warnings = Vec::new();

    let ancestors: Vec<String> = ancestor_chains(resource, &ctx.snapshot.graph)
        .chains
        .iter()
        .filter(|chain| !chain.is_empty())
        .map(|chain| {
            chain
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(" -> ")
        })
        .collect();

    for crd in ctx.catalog.crds() {
        if across_parents {
            let (policy, kind_warnings) =
                calculator.compute_union(resource, &crd.group_kind);
            warnings.extend(kind_warnings.iter().map(|w| w.to_string()));
            if !policy.is_empty() {
                sections.push(EffectiveSection {
                    policy_kind: crd.group_kind.to_string(),
                    parent: None,
                    values: policy.value,
                    provenance: render_provenance(&policy.provenance),
                });
            }
        } else {
            let computation = calculator.compute(resource, &crd.group_kind);
            warnings.extend(computation.warnings.iter().map(|w| w.to_string()));
            for result in computation.results {
                if result.policy.is_empty() {
                    continue;
                }
                sections.push(EffectiveSection {
                    policy_kind: crd.group_kind.to_string(),
                    parent: result.parent.map(|p| p.to_string()),
                    values: result.policy.value,
                    provenance: render_provenance(&result.policy.provenance),
                });
            }
        }
    }

    ResourceReport {
        name: resource.name.clone(),
        kind: resource.kind.to_string(),
        namespace: resource.namespace.clone(),
        ancestors,
        effective_policies: sections,
        warnings,
    }
}

fn render_provenance(
    provenance: &BTreeMap<String, gwint_types::PolicyRef>,
) -> BTreeMap<String, String> {
    provenance
        .iter()
        .map(|(path, source)| (path.clone(), source.to_string()))
        .collect()
}

/// Human-readable describe output.
fn print_report(report: &ResourceReport) {
    print_header(&format!("{} {}", report.kind, qualified(report)));
    for chain in &report.ancestors {
        println!("  Ancestors: {}", chain);
    }
    if report.effective_policies.is_empty() {
        println!("  No effective policies");
    }
    for section in &report.effective_policies {
        match &section.parent {
            Some(parent) => println!("  {} (via {}):", section.policy_kind, parent),
            None => println!("  {}:", section.policy_kind),
        }
        print_indented(&section.values);
        if !section.provenance.is_empty() {
            println!("    Sources:");
            for (path, source) in &section.provenance {
                println!("      {}: {}", path, source);
            }
        }
    }
    for warning in &report.warnings {
        print_warning(warning);
    }
    println!();
}

fn qualified(report: &ResourceReport) -> String {
    if report.namespace.is_empty() {
        report.name.clone()
    } else {
        format!("{}/{}", report.namespace, report.name)
    }
}

fn print_indented(values: &PolicyValue) {
    match serde_yaml::to_string(values) {
        Ok(yaml) => {
            for line in yaml.lines() {
                println!("    {}", line);
            }
        }
        Err(e) => output::print_error(&format!("serialization failed: {}", e)),
    }
}
