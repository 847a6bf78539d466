//! Source traits the resolver and aggregator depend on
//!
//! Concrete clients live in [`crate::api`]; the pipeline only sees these
//! traits, so tests can swap in mocks.

mod throttle;

pub use throttle::Throttle;

use crate::error::Result;
use crate::market::Market;
use crate::snippet::{NewsSnippet, SourceTag};
use async_trait::async_trait;

/// One keyword search issued by the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,
    /// Upper bound on results wanted
    pub max_results: usize,
    /// Market the query is about (drives region/language hints)
    pub market: Market,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, max_results: usize, market: Market) -> Self {
        Self {
            query: query.into(),
            max_results,
            market,
        }
    }
}

/// A search or news service that turns a query into snippets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetSource: Send + Sync {
    /// Short name for logs and progress messages
    fn name(&self) -> &'static str;

    /// Tag applied to every snippet from this source
    fn tag(&self) -> SourceTag;

    /// Run one query; results are returned in the service's order
    async fn search(&self, request: &SearchRequest) -> Result<Vec<NewsSnippet>>;
}

/// Remote finance-metadata lookup used for registry misses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinanceMetadata: Send + Sync {
    /// Company name for a market-qualified symbol (e.g. `6488.TWO`)
    ///
    /// `Ok(None)` means the service answered but had no usable name.
    async fn company_name(&self, qualified_symbol: &str) -> Result<Option<String>>;
}
