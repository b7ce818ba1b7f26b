//! Open-data HTTP API client
//!
//! Issues `GET <endpoint>?$where=...&$limit=...&$offset=...` with the app token header
//! and decodes the JSON array body into a page.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::backends::source::{PageRequest, PageSource};
use crate::core::error::FetchError;
use crate::core::model::{decode_page, Page};

/// Header carrying the API access token
pub const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Query string for one page request
#[derive(Debug, Serialize)]
struct PageQuery<'a> {
    #[serde(rename = "$where", skip_serializing_if = "Option::is_none")]
    predicate: Option<&'a str>,
    #[serde(rename = "$limit")]
    limit: usize,
    #[serde(rename = "$offset")]
    offset: usize,
}

impl<'a> From<&PageRequest<'a>> for PageQuery<'a> {
    fn from(request: &PageRequest<'a>) -> Self {
        Self {
            predicate: request.predicate,
            limit: request.limit,
            offset: request.offset,
        }
    }
}

/// HTTP page source. Owns its client and connection pool.
pub struct HttpPageSource {
    client: Client,
    endpoint: String,
    app_token: String,
}

impl HttpPageSource {
    /// Create a source for `endpoint`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        endpoint: impl Into<String>,
        app_token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Request)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            app_token: app_token.into(),
        })
    }

    fn build_request(&self, request: &PageRequest<'_>) -> Result<reqwest::Request, FetchError> {
        self.client
            .get(&self.endpoint)
            .query(&PageQuery::from(request))
            .header(ACCEPT, "application/json")
            .header(APP_TOKEN_HEADER, &self.app_token)
            .build()
            .map_err(FetchError::Request)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        let http_request = self.build_request(request)?;
        debug!(url = %http_request.url(), "requesting page");

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await.map_err(FetchError::Body)?;
        Ok(decode_page(&body)?)
    }
}
