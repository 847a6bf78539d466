//! Stock news briefs generated by a hosted language model
//!
//! A request runs through three steps:
//!
//! - [`TickerResolver`] turns the user's ticker into a symbol and company
//!   name (offline registry for Taiwan listings, Yahoo Finance for misses)
//! - [`SnippetAggregator`] issues a fixed set of keyword queries against
//!   Yahoo Finance news and a web search provider (DuckDuckGo or Brave)
//! - [`ReportGenerator`] renders the snippets into a prompt and asks Gemini
//!   for an investment-style report
//!
//! [`BriefPipeline`] wires the three together from a [`BriefConfig`].
//!
//! # Example
//!
//! ```rust,no_run
//! use brief_utils::ProcessEnv;
//! use ticker_brief::{BriefConfig, BriefOutcome, BriefPipeline, Market, SilentProgress, TickerQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BriefConfig::from_env(&ProcessEnv);
//!     let pipeline = BriefPipeline::from_config(&config)?;
//!
//!     let query = TickerQuery::new("2330", Market::Domestic)?;
//!     match pipeline.run(&query, &SilentProgress).await {
//!         BriefOutcome::Completed { report, .. } => println!("{}", report.text),
//!         BriefOutcome::NoData { identity } => eprintln!("no news for {identity}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod market;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod registry;
pub mod resolver;
pub mod snippet;
pub mod sources;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{SnippetAggregator, keyword_queries};
pub use config::{BriefConfig, SearchProvider};
pub use error::{BriefError, Result};
pub use generator::{ModelChoice, Report, ReportGenerator, ReportKind};
pub use market::{Market, TickerQuery};
pub use pipeline::{BriefOutcome, BriefPipeline};
pub use progress::{ProgressLevel, ProgressSink, SilentProgress};
pub use registry::SecurityRegistry;
pub use resolver::{NameSource, ResolvedIdentity, TickerResolver};
pub use snippet::{DedupKey, NewsSnippet, SnippetCollection, SourceTag};

// Re-export Language from brief-prompt
pub use brief_prompt::Language;
