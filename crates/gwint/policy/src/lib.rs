//! gwint Policy - hierarchy-aware effective policy calculation
//!
//! This crate answers the core question of the tool: given one target
//! resource and one policy kind, what configuration actually applies once
//! inheritance and overrides are resolved?
//!
//! The pieces compose in one direction:
//!
//! - [`catalog::PolicyCatalog`] indexes policy CRDs and instances by
//!   target reference.
//! - [`hierarchy`] derives ordered ancestor chains from a
//!   [`gwint_types::GraphSnapshot`].
//! - [`merge`] is the schema-free structural merge of two field trees.
//! - [`calculator::EffectivePolicyCalculator`] orchestrates the three into
//!   a merged value with per-field provenance and a warning list.
//!
//! Every computation is a pure, synchronous function over an immutable
//! snapshot: identical inputs produce identical results regardless of the
//! order resources or policies were supplied in.

#![deny(unsafe_code)]

pub mod calculator;
pub mod catalog;
pub mod error;
pub mod hierarchy;
pub mod merge;
pub mod warning;

pub use calculator::{Computation, EffectivePolicyCalculator, EffectivePolicyResult};
pub use catalog::PolicyCatalog;
pub use error::{CatalogError, Result};
pub use hierarchy::{ancestor_chains, AncestorChain, ChainResolution, MAX_CHAIN_DEPTH};
pub use merge::{leaf_paths, merge, MergeEvent, Merged};
pub use warning::Warning;
