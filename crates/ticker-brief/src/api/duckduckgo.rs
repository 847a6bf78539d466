//! DuckDuckGo HTML search client
//!
//! Uses the no-JavaScript endpoint, which needs no key. Results are parsed
//! out of the returned markup.

use super::html::element_text;
use crate::error::{BriefError, Result};
use crate::market::Market;
use crate::snippet::{NewsSnippet, SourceTag};
use crate::sources::{SearchRequest, SnippetSource};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo web search client
#[derive(Clone)]
pub struct DuckDuckGoClient {
    client: Client,
    base_url: String,
}

impl DuckDuckGoClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DUCKDUCKGO_HTML_URL.to_string(),
        }
    }

    /// Point at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn region(market: Market) -> &'static str {
        match market {
            Market::Domestic => "tw-tzh",
            Market::Foreign => "us-en",
        }
    }

    async fn fetch_page(&self, query: &str, market: Market) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .form(&[("q", query), ("kl", Self::region(market))])
            .send()
            .await
            .map_err(|e| BriefError::ApiError(format!("DuckDuckGo request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BriefError::ApiError(format!("DuckDuckGo error {status}")));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SnippetSource for DuckDuckGoClient {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn tag(&self) -> SourceTag {
        SourceTag::WebSearch
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<NewsSnippet>> {
        let page = self.fetch_page(&request.query, request.market).await?;
        let mut results = parse_results(&page)?;
        debug!(query = %request.query, parsed = results.len(), "DuckDuckGo results");
        results.truncate(request.max_results);
        Ok(results)
    }
}

/// Extract organic results from a result page, in page order
pub(crate) fn parse_results(page: &str) -> Result<Vec<NewsSnippet>> {
    let block_selector = selector("div.result")?;
    let title_selector = selector("a.result__a")?;
    let snippet_selector = selector("a.result__snippet")?;

    let document = Html::parse_document(page);
    let mut results = Vec::new();

    for block in document.select(&block_selector) {
        if block.value().classes().any(|class| class == "result--ad") {
            continue;
        }
        let Some(anchor) = block.select(&title_selector).next() else {
            continue;
        };

        let href = anchor.value().attr("href").unwrap_or_default();
        // Sponsored links go through the y.js click tracker
        if href.contains("duckduckgo.com/y.js") {
            continue;
        }
        let Some(url) = resolve_href(href) else {
            continue;
        };

        let title = element_text(anchor);
        if title.is_empty() {
            continue;
        }
        let summary = block
            .select(&snippet_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        results.push(NewsSnippet::new(title, summary, url, SourceTag::WebSearch));
    }

    Ok(results)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| BriefError::ApiError(format!("invalid result selector '{css}': {e}")))
}

/// Turn a result href into the target URL
///
/// Organic links are wrapped as `//duckduckgo.com/l/?uddg=<encoded>`.
fn resolve_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&absolute).ok()?;

    if parsed.domain().is_some_and(|d| d.ends_with("duckduckgo.com")) && parsed.path() == "/l/" {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned());
    }

    Some(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<div class="results">
  <div class="result results_links result--ad">
    <a rel="nofollow" class="result__a" href="https://duckduckgo.com/y.js?ad_domain=broker.example&amp;u3=x">Open a brokerage account</a>
    <a class="result__snippet" href="https://duckduckgo.com/y.js?ad_domain=broker.example">Trade now.</a>
  </div>
  <div class="result results_links results_links_deep web-result">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fnews.example.com%2Ftsmc%2Dearnings&amp;rut=abc">TSMC <b>2330</b> earnings beat</a>
    </h2>
    <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fnews.example.com%2Ftsmc%2Dearnings">Revenue rose &amp; margins <b>improved</b>.</a>
  </div>
  <div class="result results_links web-result">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a" href="https://direct.example.org/page">台積電 股票 新聞</a>
    </h2>
  </div>
</div>"#;

    #[test]
    fn test_parse_results_skips_ads_and_unwraps_links() {
        let results = parse_results(PAGE).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "TSMC 2330 earnings beat");
        assert_eq!(results[0].summary, "Revenue rose & margins improved.");
        assert_eq!(results[0].url, "https://news.example.com/tsmc-earnings");
        assert_eq!(results[0].source, SourceTag::WebSearch);

        assert_eq!(results[1].title, "台積電 股票 新聞");
        assert_eq!(results[1].summary, "");
        assert_eq!(results[1].url, "https://direct.example.org/page");
    }

    #[test]
    fn test_parse_results_empty_page() {
        let results = parse_results("<html><body>No results.</body></html>").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_results_decodes_entities() {
        let page = r#"
<div class="result results_links web-result">
  <a class="result__a" href="https://news.example.com/nvda?a=1&amp;b=2">Nvidia&rsquo;s rally &hellip; S&amp;P &mdash; &eacute;</a>
  <a class="result__snippet" href="https://news.example.com/nvda">&lt;b&gt; stays literal&nbsp;here</a>
</div>"#;
        let results = parse_results(page).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Nvidia\u{2019}s rally \u{2026} S&P \u{2014} \u{e9}");
        assert_eq!(results[0].summary, "<b> stays literal here");
        assert_eq!(results[0].url, "https://news.example.com/nvda?a=1&b=2");
    }

    #[test]
    fn test_resolve_href() {
        assert_eq!(
            resolve_href("//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example%2Fx%3Fy%3D1&rut=z"),
            Some("https://a.example/x?y=1".to_string())
        );
        assert_eq!(resolve_href(""), None);
        assert_eq!(resolve_href("not a url"), None);
    }

    #[test]
    fn test_region() {
        assert_eq!(DuckDuckGoClient::region(Market::Domestic), "tw-tzh");
        assert_eq!(DuckDuckGoClient::region(Market::Foreign), "us-en");
    }
}
