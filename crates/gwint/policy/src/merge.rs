//! Schema-free structural merge of policy field trees.
//!
//! The engine is identity-agnostic: it merges two value trees and reports
//! what happened at each path. The caller attributes provenance, since it
//! alone knows which policy instance supplied each tree.
//!
//! Merge rules, per field path:
//! - Scalars and null: the override value wins wherever it is present.
//! - Objects: recursive field-by-field merge; a field present in only one
//!   side is carried through unchanged.
//! - Lists: whole-value replace. List semantics (ordering, set-vs-sequence)
//!   are policy-kind-specific and not safely mergeable generically.
//! - Shape mismatch: the override wins and the conflict is reported.

use gwint_types::PolicyValue;
use std::collections::BTreeMap;
use tracing::debug;

/// What happened at one field path during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    /// Both sides set this path with compatible shapes; the override value
    /// replaced the base value.
    Overridden { path: String },

    /// The two sides disagree on the shape at this path. The override
    /// value was kept.
    TypeConflict {
        path: String,
        base_kind: &'static str,
        override_kind: &'static str,
    },
}

impl MergeEvent {
    pub fn path(&self) -> &str {
        match self {
            MergeEvent::Overridden { path } => path,
            MergeEvent::TypeConflict { path, .. } => path,
        }
    }
}

/// Result of merging two field trees.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub value: PolicyValue,
    pub events: Vec<MergeEvent>,
}

/// Merge `overlay` onto `base`, where `overlay` has strictly higher
/// precedence.
pub fn merge(base: &PolicyValue, overlay: &PolicyValue) -> Merged {
    let mut events = Vec::new();
    let value = merge_at("", base, overlay, &mut events);
    Merged { value, events }
}

fn merge_at(
    path: &str,
    base: &PolicyValue,
    overlay: &PolicyValue,
    events: &mut Vec<MergeEvent>,
) -> PolicyValue {
    match (base, overlay) {
        (PolicyValue::Object(base_fields), PolicyValue::Object(overlay_fields)) => {
            let mut merged: BTreeMap<String, PolicyValue> = base_fields.clone();
            for (field, overlay_value) in overlay_fields {
                let child_path = join_path(path, field);
                let merged_value = match base_fields.get(field) {
                    Some(base_value) => merge_at(&child_path, base_value, overlay_value, events),
                    None => overlay_value.clone(),
                };
                merged.insert(field.clone(), merged_value);
            }
            PolicyValue::Object(merged)
        }
        (PolicyValue::List(_), PolicyValue::List(_)) => {
            // Whole-value replace.
            events.push(MergeEvent::Overridden {
                path: path.to_string(),
            });
            overlay.clone()
        }
        (b, o) if b.kind_name() == o.kind_name() => {
            events.push(MergeEvent::Overridden {
                path: path.to_string(),
            });
            o.clone()
        }
        // Null carries no structure; replacing it (or replacing with it)
        // is an ordinary override, not a shape conflict.
        (PolicyValue::Null, o) => {
            events.push(MergeEvent::Overridden {
                path: path.to_string(),
            });
            o.clone()
        }
        (_, PolicyValue::Null) => {
            events.push(MergeEvent::Overridden {
                path: path.to_string(),
            });
            PolicyValue::Null
        }
        (b, o) => {
            debug!(
                path = path,
                base_kind = b.kind_name(),
                override_kind = o.kind_name(),
                "Shape mismatch during merge; override wins"
            );
            events.push(MergeEvent::TypeConflict {
                path: path.to_string(),
                base_kind: b.kind_name(),
                override_kind: o.kind_name(),
            });
            o.clone()
        }
    }
}

/// Dot-joined field paths of every leaf in the tree.
///
/// Scalars, nulls, lists (whole-value replace points), and empty objects
/// count as leaves. Used by callers to attribute provenance for a tree's
/// contributions.
pub fn leaf_paths(value: &PolicyValue) -> Vec<String> {
    let mut paths = Vec::new();
    collect_leaf_paths("", value, &mut paths);
    paths
}

fn collect_leaf_paths(path: &str, value: &PolicyValue, paths: &mut Vec<String>) {
    match value {
        PolicyValue::Object(fields) if !fields.is_empty() => {
            for (field, child) in fields {
                collect_leaf_paths(&join_path(path, field), child, paths);
            }
        }
        _ => paths.push(path.to_string()),
    }
}

fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn val(yaml: &str) -> PolicyValue {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_scalar_override_wins() {
        let merged = merge(&val("{timeout: 30}"), &val("{timeout: 10}"));
        assert_eq!(merged.value, val("{timeout: 10}"));
        assert_eq!(
            merged.events,
            vec![MergeEvent::Overridden {
                path: "timeout".to_string()
            }]
        );
    }

    #[test]
    fn test_absent_override_keeps_base() {
        let merged = merge(&val("{timeout: 30, retries: 3}"), &val("{timeout: 10}"));
        assert_eq!(merged.value, val("{timeout: 10, retries: 3}"));
    }

    #[test]
    fn test_base_only_and_overlay_only_fields_carry_through() {
        let merged = merge(&val("{a: 1}"), &val("{b: 2}"));
        assert_eq!(merged.value, val("{a: 1, b: 2}"));
        assert!(merged.events.is_empty());
    }

    #[test]
    fn test_objects_merge_recursively() {
        let merged = merge(
            &val("{tls: {mode: strict, minVersion: '1.2'}}"),
            &val("{tls: {mode: permissive}}"),
        );
        assert_eq!(
            merged.value,
            val("{tls: {mode: permissive, minVersion: '1.2'}}")
        );
        assert_eq!(
            merged.events,
            vec![MergeEvent::Overridden {
                path: "tls.mode".to_string()
            }]
        );
    }

    #[test]
    fn test_lists_replace_whole_value() {
        let merged = merge(&val("{hosts: [a, b, c]}"), &val("{hosts: [z]}"));
        assert_eq!(merged.value, val("{hosts: [z]}"));
        assert_eq!(
            merged.events,
            vec![MergeEvent::Overridden {
                path: "hosts".to_string()
            }]
        );
    }

    #[test]
    fn test_type_mismatch_keeps_override_and_reports() {
        let merged = merge(&val("{tls: {mode: strict}}"), &val("{tls: off}"));
        assert_eq!(merged.value, val("{tls: off}"));
        assert_eq!(
            merged.events,
            vec![MergeEvent::TypeConflict {
                path: "tls".to_string(),
                base_kind: "object",
                override_kind: "string",
            }]
        );
    }

    #[test]
    fn test_null_transitions_are_not_conflicts() {
        let merged = merge(&val("{timeout: null}"), &val("{timeout: 5}"));
        assert_eq!(merged.value, val("{timeout: 5}"));
        assert_eq!(
            merged.events,
            vec![MergeEvent::Overridden {
                path: "timeout".to_string()
            }]
        );

        let merged = merge(&val("{timeout: 5}"), &val("{timeout: null}"));
        assert_eq!(merged.value, val("{timeout: null}"));
        assert!(!merged
            .events
            .iter()
            .any(|e| matches!(e, MergeEvent::TypeConflict { .. })));
    }

    #[test]
    fn test_override_reported_even_when_values_equal() {
        // Two policies setting the same value is still an overlap the
        // caller may need to report as ambiguous.
        let merged = merge(&val("{timeout: 10}"), &val("{timeout: 10}"));
        assert_eq!(merged.events.len(), 1);
    }

    #[test]
    fn test_leaf_paths() {
        let value = val("{a: 1, b: {c: 2, d: [1, 2]}, e: {}}");
        assert_eq!(
            leaf_paths(&value),
            vec!["a".to_string(), "b.c".to_string(), "b.d".to_string(), "e".to_string()]
        );
    }

    #[test]
    fn test_merge_is_deterministic() {
        let base = val("{a: {x: 1, y: 2}, b: [1], c: true}");
        let overlay = val("{a: {y: 3, z: 4}, b: [2, 3]}");
        let first = merge(&base, &overlay);
        let second = merge(&base, &overlay);
        assert_eq!(first, second);
    }
}
