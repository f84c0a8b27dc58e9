//! Non-fatal findings surfaced alongside effective policy results.
//!
//! Partial cluster state must never abort a calculation, so everything in
//! this taxonomy is collected and returned rather than raised. The caller
//! renders warnings inline with the result they belong to.

use gwint_types::{GroupKind, PolicyRef, ResourceRef};
use serde::Serialize;
use std::fmt;

/// A non-fatal finding recorded during catalog loading, chain resolution,
/// or effective policy calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Warning {
    /// A policy instance references a CRD kind that is not registered, or
    /// targets a resource kind its CRD does not support. The instance is
    /// dropped and the calculation continues.
    UnknownPolicyKind {
        instance: PolicyRef,
        detail: String,
    },

    /// Multiple same-kind policies at the same tier set the same field.
    /// Resolved deterministically: the oldest-then-alphabetical instance
    /// keeps the field.
    AmbiguousPolicy {
        target: ResourceRef,
        path: String,
        kept: PolicyRef,
        ignored: PolicyRef,
    },

    /// Base and override trees disagree on the shape at a field path.
    /// The higher-precedence value wins.
    MergeConflict {
        path: String,
        base_kind: &'static str,
        override_kind: &'static str,
        source: Option<PolicyRef>,
    },

    /// No registered CRD matches the requested policy kind. Informational.
    NoApplicablePolicy {
        target: ResourceRef,
        group_kind: GroupKind,
    },

    /// Ancestor chain resolution hit a repeated resource; the chain was
    /// truncated at the repetition point.
    CycleDetected { at: ResourceRef },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownPolicyKind { instance, detail } => {
                write!(f, "dropped policy {}: {}", instance, detail)
            }
            Warning::AmbiguousPolicy {
                target,
                path,
                kept,
                ignored,
            } => write!(
                f,
                "ambiguous policies on {}: field \"{}\" kept from {}, value from {} ignored",
                target, path, kept, ignored
            ),
            Warning::MergeConflict {
                path,
                base_kind,
                override_kind,
                source,
            } => {
                write!(
                    f,
                    "merge conflict at \"{}\": {} replaced by {}",
                    path, base_kind, override_kind
                )?;
                if let Some(source) = source {
                    write!(f, " (from {})", source)?;
                }
                Ok(())
            }
            Warning::NoApplicablePolicy { target, group_kind } => {
                write!(f, "no policy CRD registered for {} on {}", group_kind, target)
            }
            Warning::CycleDetected { at } => {
                write!(f, "cycle detected in ancestor chain at {}; chain truncated", at)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwint_types::ResourceKind;

    #[test]
    fn test_cycle_warning_names_the_repeat_point() {
        let warning = Warning::CycleDetected {
            at: ResourceRef::new(ResourceKind::Gateway, "default", "gw1"),
        };
        assert_eq!(
            warning.to_string(),
            "cycle detected in ancestor chain at Gateway default/gw1; chain truncated"
        );
    }

    #[test]
    fn test_merge_conflict_display_without_source() {
        let warning = Warning::MergeConflict {
            path: "tls.mode".to_string(),
            base_kind: "object",
            override_kind: "string",
            source: None,
        };
        assert_eq!(
            warning.to_string(),
            "merge conflict at \"tls.mode\": object replaced by string"
        );
    }
}
