//! Backends module - Remote sources of result pages
//!
//! Provides:
//! - source: the `PageSource` seam the fetcher pulls pages through
//! - http: the open-data HTTP API client (reqwest)

pub mod http;
pub mod source;
