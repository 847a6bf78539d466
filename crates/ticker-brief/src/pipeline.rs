//! The request pipeline: resolve → aggregate → generate

use crate::aggregator::SnippetAggregator;
use crate::api::{BraveSearchClient, DuckDuckGoClient, YahooFinanceClient, http_client};
use crate::config::{BriefConfig, SearchProvider};
use crate::error::{BriefError, Result};
use crate::generator::{Report, ReportGenerator};
use crate::market::TickerQuery;
use crate::progress::ProgressSink;
use crate::resolver::{ResolvedIdentity, TickerResolver};
use crate::snippet::SnippetCollection;
use crate::sources::{SnippetSource, Throttle};
use brief_llm::LLMProvider;
use brief_llm::providers::{GeminiConfig, GeminiProvider};
use std::sync::Arc;
use tracing::info;

/// Result of one run
#[derive(Debug, Clone)]
pub enum BriefOutcome {
    /// The model was asked; the report may still be a failure message
    Completed {
        identity: ResolvedIdentity,
        snippets: SnippetCollection,
        report: Report,
    },
    /// No snippets were found, so the model was never called
    NoData { identity: ResolvedIdentity },
}

impl BriefOutcome {
    pub fn identity(&self) -> &ResolvedIdentity {
        match self {
            BriefOutcome::Completed { identity, .. } | BriefOutcome::NoData { identity } => {
                identity
            }
        }
    }
}

/// Wires the resolver, aggregator and generator together
pub struct BriefPipeline {
    resolver: TickerResolver,
    aggregator: SnippetAggregator,
    generator: ReportGenerator,
}

impl BriefPipeline {
    pub fn new(
        resolver: TickerResolver,
        aggregator: SnippetAggregator,
        generator: ReportGenerator,
    ) -> Self {
        Self {
            resolver,
            aggregator,
            generator,
        }
    }

    /// Build the production pipeline; fails before any network call on bad
    /// configuration
    pub fn from_config(config: &BriefConfig) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(config.load_registry()?);

        let http = http_client(config.request_timeout)?;
        let yahoo = Arc::new(YahooFinanceClient::new(http.clone()));

        let mut resolver = TickerResolver::new(registry);
        if config.remote_name_lookup {
            resolver = resolver.with_metadata(yahoo.clone());
        }

        let mut aggregator =
            SnippetAggregator::new(config.results_per_query).with_dedup(config.dedup);
        if config.use_finance_source {
            aggregator = aggregator.with_source(yahoo, Throttle::new(config.query_interval));
        }
        let web: Arc<dyn SnippetSource> = match config.search_provider {
            SearchProvider::DuckDuckGo => Arc::new(DuckDuckGoClient::new(http)),
            SearchProvider::Brave => {
                let key = config.brave_api_key.clone().ok_or(BriefError::MissingCredential {
                    name: "Brave API key",
                    env_var: crate::config::BRAVE_KEY_VAR,
                })?;
                Arc::new(BraveSearchClient::new(http, key))
            }
        };
        aggregator = aggregator.with_source(web, Throttle::new(config.query_interval));

        let gemini_key = config.gemini_api_key.clone().ok_or(BriefError::MissingCredential {
            name: "Gemini API key",
            env_var: crate::config::GEMINI_KEY_VARS[0],
        })?;
        let provider: Arc<dyn LLMProvider> = Arc::new(GeminiProvider::with_config(
            GeminiConfig::new(gemini_key).with_timeout(config.generation_timeout),
        )?);

        let generator = ReportGenerator::new(provider, config.model_choice())?
            .with_max_output_tokens(config.max_output_tokens)
            .with_temperature(config.temperature)
            .with_min_snippet_chars(config.min_snippet_chars)
            .with_language(config.report_language.clone());

        info!(
            search = %config.search_provider,
            finance = config.use_finance_source,
            sources = ?aggregator.source_names(),
            "Pipeline ready"
        );
        Ok(Self::new(resolver, aggregator, generator))
    }

    /// Run one request end to end
    pub async fn run(&self, query: &TickerQuery, progress: &dyn ProgressSink) -> BriefOutcome {
        let market = query.market();
        progress.info(&format!("Resolving {} ({})", query.normalized(), market.label()));
        let identity = self.resolver.resolve(query, progress).await;

        let snippets = self.aggregator.aggregate(&identity, market, progress).await;
        if snippets.is_empty() {
            progress.warning(&format!("No news found for {identity}"));
            return BriefOutcome::NoData { identity };
        }
        progress.success(&format!("Collected {} news items", snippets.len()));

        progress.info("Generating report");
        let report = self.generator.generate(&snippets, &identity, market).await;
        if report.is_generated() {
            progress.success("Report ready");
        }

        BriefOutcome::Completed {
            identity,
            snippets,
            report,
        }
    }
}
