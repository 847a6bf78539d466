//! Yahoo Finance search client
//!
//! One endpoint serves both needs: `quotes` carries listing names for the
//! resolver and `news` carries recent headlines for the aggregator.

use crate::error::{BriefError, Result};
use crate::market::Market;
use crate::snippet::{NewsSnippet, SourceTag};
use crate::sources::{FinanceMetadata, SearchRequest, SnippetSource};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const YAHOO_SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

/// Yahoo Finance search API client
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

/// Response of the search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YahooSearchResponse {
    #[serde(default)]
    pub quotes: Vec<YahooQuote>,
    #[serde(default)]
    pub news: Vec<YahooNewsItem>,
}

/// Listing matched by a search
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuote {
    pub symbol: String,
    pub longname: Option<String>,
    pub shortname: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
}

impl YahooQuote {
    /// Long name if present, else short name; blank names count as absent
    pub fn best_name(&self) -> Option<&str> {
        [self.longname.as_deref(), self.shortname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
    }
}

/// Headline returned alongside a search
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooNewsItem {
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    pub link: String,
    pub provider_publish_time: Option<i64>,
}

impl YahooNewsItem {
    fn into_snippet(self) -> NewsSnippet {
        let published = self
            .provider_publish_time
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d").to_string());

        let summary = match (self.publisher.trim(), published) {
            ("", None) => String::new(),
            (publisher, None) => publisher.to_string(),
            ("", Some(date)) => date,
            (publisher, Some(date)) => format!("{publisher} · {date}"),
        };

        NewsSnippet::new(self.title, summary, self.link, SourceTag::LocalFinance)
    }
}

impl YahooFinanceClient {
    /// Create a client on top of a shared HTTP client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: YAHOO_SEARCH_URL.to_string(),
        }
    }

    /// Point at a different search endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run a raw search request
    pub async fn lookup(
        &self,
        query: &str,
        quotes_count: usize,
        news_count: usize,
        market: Market,
    ) -> Result<YahooSearchResponse> {
        let (lang, region) = match market {
            Market::Domestic => ("zh-Hant-TW", "TW"),
            Market::Foreign => ("en-US", "US"),
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("quotesCount", &quotes_count.to_string()),
                ("newsCount", &news_count.to_string()),
                ("lang", lang),
                ("region", region),
            ])
            .send()
            .await
            .map_err(|e| BriefError::ApiError(format!("Yahoo search request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BriefError::ApiError(format!(
                "Yahoo search error {status}: {body}"
            )));
        }

        response
            .json::<YahooSearchResponse>()
            .await
            .map_err(|e| BriefError::ApiError(format!("Failed to parse Yahoo response: {e}")))
    }
}

#[async_trait]
impl FinanceMetadata for YahooFinanceClient {
    async fn company_name(&self, qualified_symbol: &str) -> Result<Option<String>> {
        let market = if qualified_symbol.contains(".TW") {
            Market::Domestic
        } else {
            Market::Foreign
        };
        let response = self.lookup(qualified_symbol, 5, 0, market).await?;

        let name = response
            .quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(qualified_symbol))
            .and_then(YahooQuote::best_name)
            .map(str::to_string);

        debug!(symbol = qualified_symbol, found = name.is_some(), "Yahoo name lookup");
        Ok(name)
    }
}

#[async_trait]
impl SnippetSource for YahooFinanceClient {
    fn name(&self) -> &'static str {
        "yahoo-finance"
    }

    fn tag(&self) -> SourceTag {
        SourceTag::LocalFinance
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<NewsSnippet>> {
        let response = self
            .lookup(&request.query, 0, request.max_results, request.market)
            .await?;

        Ok(response
            .news
            .into_iter()
            .map(YahooNewsItem::into_snippet)
            .filter(|s| !s.title.is_empty())
            .collect())
    }
}
