//! Query module - Translates filter criteria into a server-side predicate
//!
//! Provides:
//! - filter: the filterable fields and the user's criteria
//! - predicate: the AND-joined, case-insensitive substring predicate

pub mod filter;
pub mod predicate;
