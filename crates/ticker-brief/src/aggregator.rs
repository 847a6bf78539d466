//! Snippet aggregation across the configured sources

use crate::market::Market;
use crate::progress::ProgressSink;
use crate::resolver::ResolvedIdentity;
use crate::snippet::{DedupKey, NewsSnippet, SnippetCollection};
use crate::sources::{SearchRequest, SnippetSource, Throttle};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Smallest and largest per-query result cap
pub const RESULTS_PER_QUERY_RANGE: std::ops::RangeInclusive<usize> = 1..=10;

/// Default per-query result cap
pub const DEFAULT_RESULTS_PER_QUERY: usize = 3;

/// The fixed keyword queries issued for an identity
pub fn keyword_queries(identity: &ResolvedIdentity, market: Market) -> Vec<String> {
    let symbol = &identity.symbol;
    let name = &identity.display_name;
    match market {
        Market::Domestic => vec![
            format!("{name} 股票 新聞"),
            format!("{name} 營收 產業分析"),
            format!("{symbol} stock news"),
        ],
        Market::Foreign => vec![
            format!("{symbol} stock news"),
            format!("{symbol} financial analysis"),
            format!("{symbol} stock forecast"),
        ],
    }
}

struct ThrottledSource {
    source: Arc<dyn SnippetSource>,
    throttle: Throttle,
}

/// Runs the keyword queries against each source in turn
pub struct SnippetAggregator {
    sources: Vec<ThrottledSource>,
    results_per_query: usize,
    dedup: Option<DedupKey>,
}

impl SnippetAggregator {
    /// Aggregator with no sources; `results_per_query` is clamped into range
    pub fn new(results_per_query: usize) -> Self {
        Self {
            sources: Vec::new(),
            results_per_query: results_per_query
                .clamp(*RESULTS_PER_QUERY_RANGE.start(), *RESULTS_PER_QUERY_RANGE.end()),
            dedup: Some(DedupKey::default()),
        }
    }

    /// Append a source; sources are queried in the order added
    pub fn with_source(mut self, source: Arc<dyn SnippetSource>, throttle: Throttle) -> Self {
        self.sources.push(ThrottledSource { source, throttle });
        self
    }

    /// Set the dedup key, or `None` to keep duplicates
    pub fn with_dedup(mut self, dedup: Option<DedupKey>) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn results_per_query(&self) -> usize {
        self.results_per_query
    }

    /// Names of the configured sources, in query order
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.source.name()).collect()
    }

    /// Collect snippets for an identity; failed queries are skipped
    pub async fn aggregate(
        &self,
        identity: &ResolvedIdentity,
        market: Market,
        progress: &dyn ProgressSink,
    ) -> SnippetCollection {
        let queries = keyword_queries(identity, market);
        let mut collected = SnippetCollection::new();

        for entry in &self.sources {
            let source_name = entry.source.name();
            let tag = entry.source.tag();
            progress.info(&format!("Searching {source_name} for {identity}"));

            for query in &queries {
                entry.throttle.ready().await;

                let request = SearchRequest::new(query.as_str(), self.results_per_query, market);
                match entry.source.search(&request).await {
                    Ok(results) => {
                        debug!(
                            source = source_name,
                            query = %query,
                            results = results.len(),
                            "Query finished"
                        );
                        for snippet in results.into_iter().take(self.results_per_query) {
                            collected.push(NewsSnippet { source: tag, ..snippet });
                        }
                    }
                    Err(e) => {
                        warn!(
                            source = source_name,
                            query = %query,
                            error = %e,
                            "Query failed, skipping"
                        );
                        progress.warning(&format!("{source_name} query \"{query}\" failed: {e}"));
                    }
                }
            }
        }

        let before = collected.len();
        let collected = match self.dedup {
            Some(key) => collected.dedup_by(key),
            None => collected,
        };
        info!(
            symbol = %identity.symbol,
            collected = before,
            kept = collected.len(),
            "Aggregation finished"
        );
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BriefError;
    use crate::progress::{ProgressLevel, RecordingProgress, SilentProgress};
    use crate::resolver::NameSource;
    use crate::snippet::SourceTag;
    use crate::sources::MockSnippetSource;

    fn tsmc() -> ResolvedIdentity {
        ResolvedIdentity {
            symbol: "2330".to_string(),
            display_name: "台積電".to_string(),
            name_source: NameSource::Registry,
        }
    }

    fn snippet(title: &str) -> NewsSnippet {
        NewsSnippet::new(
            title,
            "summary",
            format!("https://news.example.com/{title}"),
            SourceTag::WebSearch,
        )
    }

    fn source_returning(
        name: &'static str,
        tag: SourceTag,
        per_query: usize,
    ) -> MockSnippetSource {
        let mut source = MockSnippetSource::new();
        source.expect_name().return_const(name);
        source.expect_tag().return_const(tag);
        source.expect_search().times(3).returning(move |request| {
            Ok((0..per_query)
                .map(|i| snippet(&format!("{}-{i}", request.query)))
                .collect())
        });
        source
    }

    #[test]
    fn test_keyword_queries() {
        assert_eq!(
            keyword_queries(&tsmc(), Market::Domestic),
            vec!["台積電 股票 新聞", "台積電 營收 產業分析", "2330 stock news"]
        );
        assert_eq!(
            keyword_queries(&ResolvedIdentity::fallback("NVDA"), Market::Foreign),
            vec!["NVDA stock news", "NVDA financial analysis", "NVDA stock forecast"]
        );
    }

    #[test]
    fn test_results_per_query_clamped() {
        assert_eq!(SnippetAggregator::new(0).results_per_query(), 1);
        assert_eq!(SnippetAggregator::new(50).results_per_query(), 10);
        assert_eq!(SnippetAggregator::new(4).results_per_query(), 4);
    }

    #[tokio::test]
    async fn test_cap_enforced_and_tagged() {
        let aggregator = SnippetAggregator::new(2)
            .with_dedup(None)
            .with_source(
                Arc::new(source_returning("finance", SourceTag::LocalFinance, 5)),
                Throttle::disabled(),
            )
            .with_source(
                Arc::new(source_returning("web", SourceTag::WebSearch, 1)),
                Throttle::disabled(),
            );

        let collected = aggregator.aggregate(&tsmc(), Market::Domestic, &SilentProgress).await;

        // 3 queries × 2 capped results + 3 queries × 1 result
        assert_eq!(collected.len(), 9);
        assert!(collected.len() <= 3 * 2 * 2);
        let finance = collected
            .iter()
            .filter(|s| s.source == SourceTag::LocalFinance)
            .count();
        assert_eq!(finance, 6);
        assert_eq!(collected.as_slice()[0].title, "台積電 股票 新聞-0");
    }

    #[tokio::test]
    async fn test_requests_carry_cap_and_market() {
        let mut source = MockSnippetSource::new();
        source.expect_name().return_const("web");
        source.expect_tag().return_const(SourceTag::WebSearch);
        source
            .expect_search()
            .withf(|request| request.max_results == 3 && request.market == Market::Foreign)
            .times(3)
            .returning(|_| Ok(Vec::new()));

        let aggregator = SnippetAggregator::new(DEFAULT_RESULTS_PER_QUERY)
            .with_source(Arc::new(source), Throttle::disabled());
        let collected = aggregator
            .aggregate(&ResolvedIdentity::fallback("NVDA"), Market::Foreign, &SilentProgress)
            .await;
        assert!(collected.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_skipped() {
        let mut source = MockSnippetSource::new();
        source.expect_name().return_const("web");
        source.expect_tag().return_const(SourceTag::WebSearch);
        let mut calls = 0;
        source.expect_search().times(3).returning(move |request| {
            calls += 1;
            if calls == 2 {
                Err(BriefError::ApiError("HTTP 503".to_string()))
            } else {
                Ok(vec![snippet(&request.query)])
            }
        });

        let progress = RecordingProgress::new();
        let aggregator =
            SnippetAggregator::new(3).with_source(Arc::new(source), Throttle::disabled());
        let collected = aggregator.aggregate(&tsmc(), Market::Domestic, &progress).await;

        assert_eq!(collected.len(), 2);
        let warnings = progress.messages(ProgressLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty() {
        let mut source = MockSnippetSource::new();
        source.expect_name().return_const("web");
        source.expect_tag().return_const(SourceTag::WebSearch);
        source
            .expect_search()
            .times(3)
            .returning(|_| Err(BriefError::ApiError("down".to_string())));

        let aggregator =
            SnippetAggregator::new(3).with_source(Arc::new(source), Throttle::disabled());
        let collected = aggregator
            .aggregate(&ResolvedIdentity::fallback("ZZZZ"), Market::Foreign, &SilentProgress)
            .await;
        assert!(collected.is_empty());
    }

    #[tokio::test]
    async fn test_dedup_keeps_first_and_can_be_disabled() {
        fn duplicating_source() -> MockSnippetSource {
            let mut source = MockSnippetSource::new();
            source.expect_name().return_const("web");
            source.expect_tag().return_const(SourceTag::WebSearch);
            source
                .expect_search()
                .times(3)
                .returning(|_| Ok(vec![snippet("same"), snippet("other")]));
            source
        }

        let deduped = SnippetAggregator::new(3)
            .with_source(Arc::new(duplicating_source()), Throttle::disabled())
            .aggregate(&tsmc(), Market::Domestic, &SilentProgress)
            .await;
        let titles: Vec<&str> = deduped.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["same", "other"]);

        let raw = SnippetAggregator::new(3)
            .with_dedup(None)
            .with_source(Arc::new(duplicating_source()), Throttle::disabled())
            .aggregate(&tsmc(), Market::Domestic, &SilentProgress)
            .await;
        assert_eq!(raw.len(), 6);
        assert!(deduped.len() <= raw.len());
    }

    #[tokio::test]
    async fn test_cross_source_duplicates_keep_first_source() {
        let aggregator = SnippetAggregator::new(2)
            .with_source(
                Arc::new(source_returning("finance", SourceTag::LocalFinance, 2)),
                Throttle::disabled(),
            )
            .with_source(
                Arc::new(source_returning("web", SourceTag::WebSearch, 1)),
                Throttle::disabled(),
            );

        let collected = aggregator.aggregate(&tsmc(), Market::Domestic, &SilentProgress).await;

        // Every web result repeats a finance "<query>-0" snippet
        assert_eq!(collected.len(), 6);
        assert!(collected.iter().all(|s| s.source == SourceTag::LocalFinance));
        let first = collected
            .iter()
            .find(|s| s.title == "台積電 股票 新聞-0")
            .unwrap();
        assert_eq!(first.source, SourceTag::LocalFinance);
    }

    #[tokio::test]
    async fn test_no_sources() {
        let collected = SnippetAggregator::new(3)
            .aggregate(&tsmc(), Market::Domestic, &SilentProgress)
            .await;
        assert!(collected.is_empty());
    }
}
