//! Page source abstraction

use async_trait::async_trait;

use crate::core::error::FetchError;
use crate::core::model::Page;

/// Parameters for one page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    /// Server-side predicate; `None` when no filter is active
    pub predicate: Option<&'a str>,
    /// Maximum records to return
    pub limit: usize,
    /// Records to skip
    pub offset: usize,
}

/// Something that can return one page of license records.
///
/// Implementations must not retry: a single failure is returned as-is and ends the session.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError>;
}
