//! Flows module - End-to-end commands built on the fetch session
//!
//! Provides:
//! - consume: drains a session's channels, rendering and counting
//! - search: the complete search run behind the CLI

pub mod consume;
pub mod search;
