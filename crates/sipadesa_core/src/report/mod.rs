//! Read-only views derived from the resident collection.
//!
//! # Responsibility
//! - Scope residents to what a role may see and apply free-text search.
//! - Aggregate demographic counts for dashboards.
//!
//! # Invariants
//! - All functions are pure over the given slice; nothing here touches storage.

pub mod age;
pub mod scope;
pub mod stats;
