//! Core module - Shared types for the search pipeline
//!
//! This module provides:
//! - Record model (LicenseRecord, Page)
//! - Search configuration
//! - Error types
//! - Record rendering

pub mod config;
pub mod error;
pub mod model;
pub mod render;
