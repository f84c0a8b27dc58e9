//! Schema-free policy payload representation.
//!
//! Policy CRDs carry arbitrary payloads. Representing them as a tagged
//! variant tree (rather than a dynamically-typed map) keeps the merge
//! logic exhaustive and statically checkable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A schema-free policy field tree.
///
/// Object fields use a `BTreeMap` so iteration order, and therefore every
/// downstream merge and render, is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<PolicyValue>),
    Object(BTreeMap<String, PolicyValue>),
}

impl Default for PolicyValue {
    fn default() -> Self {
        PolicyValue::Null
    }
}

impl PolicyValue {
    /// An empty object, the identity element for merging.
    pub fn empty() -> Self {
        PolicyValue::Object(BTreeMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PolicyValue::Null)
    }

    /// Whether this value is an object with no fields.
    pub fn is_empty_object(&self) -> bool {
        matches!(self, PolicyValue::Object(fields) if fields.is_empty())
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, PolicyValue>> {
        match self {
            PolicyValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Direct child lookup on objects; `None` for any other variant.
    pub fn get(&self, field: &str) -> Option<&PolicyValue> {
        self.as_object().and_then(|fields| fields.get(field))
    }

    /// Short name of the variant, used in conflict diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PolicyValue::Null => "null",
            PolicyValue::Bool(_) => "bool",
            PolicyValue::Number(_) => "number",
            PolicyValue::String(_) => "string",
            PolicyValue::List(_) => "list",
            PolicyValue::Object(_) => "object",
        }
    }
}

impl From<BTreeMap<String, PolicyValue>> for PolicyValue {
    fn from(fields: BTreeMap<String, PolicyValue>) -> Self {
        PolicyValue::Object(fields)
    }
}
