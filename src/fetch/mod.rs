//! Fetch module - The paginated fetch session
//!
//! Provides:
//! - session: the producer task that pages through the API and streams records

pub mod session;
