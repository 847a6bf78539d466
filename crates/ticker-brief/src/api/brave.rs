//! Brave Search API client

use super::html::to_text;
use crate::error::{BriefError, Result};
use crate::snippet::{NewsSnippet, SourceTag};
use crate::sources::{SearchRequest, SnippetSource};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

const BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";
/// Largest `count` the web search endpoint accepts
const BRAVE_MAX_COUNT: usize = 20;

/// Brave web search response (only the fields we read)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BraveSearchResponse {
    #[serde(default)]
    pub web: Option<BraveWebResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BraveWebResults {
    #[serde(default)]
    pub results: Vec<BraveWebResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BraveWebResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl BraveSearchResponse {
    fn into_snippets(self) -> Vec<NewsSnippet> {
        self.web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .map(|r| {
                NewsSnippet::new(
                    to_text(&r.title),
                    to_text(&r.description),
                    r.url,
                    SourceTag::WebSearch,
                )
            })
            .filter(|s| !s.title.is_empty())
            .collect()
    }
}

/// Brave Search client, authenticated with a subscription token
#[derive(Clone)]
pub struct BraveSearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for BraveSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraveSearchClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BraveSearchClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: BRAVE_SEARCH_URL.to_string(),
        }
    }

    /// Point at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SnippetSource for BraveSearchClient {
    fn name(&self) -> &'static str {
        "brave"
    }

    fn tag(&self) -> SourceTag {
        SourceTag::WebSearch
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<NewsSnippet>> {
        let count = request.max_results.clamp(1, BRAVE_MAX_COUNT).to_string();

        let response = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[
                ("q", request.query.as_str()),
                ("count", count.as_str()),
                ("freshness", "pw"),
                ("country", request.market.search_country()),
                ("search_lang", request.market.search_language()),
            ])
            .send()
            .await
            .map_err(|e| BriefError::ApiError(format!("Brave request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BriefError::ApiError(
                "Brave rejected the subscription token".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BriefError::ApiError(format!("Brave API error {status}: {body}")));
        }

        let parsed = response
            .json::<BraveSearchResponse>()
            .await
            .map_err(|e| BriefError::ApiError(format!("Failed to parse Brave response: {e}")))?;

        let mut snippets = parsed.into_snippets();
        debug!(query = %request.query, parsed = snippets.len(), "Brave results");
        snippets.truncate(request.max_results);
        Ok(snippets)
    }
}
