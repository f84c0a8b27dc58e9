//! Fatal errors for the policy engine.
//!
//! Almost everything the engine encounters is a non-fatal finding carried
//! as a [`crate::warning::Warning`]; only programming-contract violations
//! live here.

use gwint_types::GroupKind;
use thiserror::Error;

/// Errors raised while building the policy catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A policy CRD with the same group and kind was already registered
    #[error("policy CRD already registered: {group_kind}")]
    DuplicateCrd { group_kind: GroupKind },
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
