//! Configuration for a ticker-brief run

use crate::aggregator::{DEFAULT_RESULTS_PER_QUERY, RESULTS_PER_QUERY_RANGE};
use crate::error::{BriefError, Result};
use crate::generator::ModelChoice;
use crate::registry::SecurityRegistry;
use crate::snippet::DedupKey;
use brief_llm::ModelSelector;
use brief_prompt::Language;
use brief_utils::{EnvLookup, first_non_empty};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment variables holding the Gemini key, in lookup order
pub const GEMINI_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];
pub const BRAVE_KEY_VAR: &str = "BRAVE_API_KEY";
pub const MODEL_VAR: &str = "BRIEF_MODEL";

/// Web search provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SearchProvider {
    /// DuckDuckGo HTML endpoint (default, no API key required)
    #[default]
    DuckDuckGo,
    /// Brave Search API (requires API key)
    Brave,
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchProvider::DuckDuckGo => "duckduckgo",
            SearchProvider::Brave => "brave",
        })
    }
}

impl FromStr for SearchProvider {
    type Err = BriefError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(SearchProvider::DuckDuckGo),
            "brave" => Ok(SearchProvider::Brave),
            other => Err(BriefError::InvalidInput(format!(
                "unknown search provider '{other}' (expected duckduckgo or brave)"
            ))),
        }
    }
}

/// Configuration for one process; keys never serialize
#[derive(Clone, Serialize, Deserialize)]
pub struct BriefConfig {
    /// Gemini API key (required)
    #[serde(skip_serializing, default)]
    pub gemini_api_key: Option<String>,
    /// Model id; discovery picks one when absent
    pub model: Option<String>,
    /// Discovery preferences, as name substrings in priority order
    pub model_preferences: Vec<String>,
    /// Web search provider
    pub search_provider: SearchProvider,
    /// Brave API key (required for [`SearchProvider::Brave`])
    #[serde(skip_serializing, default)]
    pub brave_api_key: Option<String>,
    /// Also query the Yahoo Finance news feed
    pub use_finance_source: bool,
    /// Look up registry misses on Yahoo Finance
    pub remote_name_lookup: bool,
    /// Result cap per query
    pub results_per_query: usize,
    /// Minimum spacing between requests to one source
    pub query_interval: Duration,
    /// Dedup key, `None` to keep duplicates
    pub dedup: Option<DedupKey>,
    /// Below this many characters of news the model is not called
    pub min_snippet_chars: usize,
    /// Timeout for search and metadata requests
    pub request_timeout: Duration,
    /// Timeout for the generation call
    pub generation_timeout: Duration,
    /// Output token limit for the report
    pub max_output_tokens: usize,
    /// Sampling temperature; provider default when absent
    pub temperature: Option<f32>,
    /// Report language; market default when absent
    pub report_language: Option<Language>,
    /// JSON file of extra `code → name` registry entries
    pub registry_path: Option<PathBuf>,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: None,
            model_preferences: vec!["flash".to_string(), "pro".to_string()],
            search_provider: SearchProvider::DuckDuckGo,
            brave_api_key: None,
            use_finance_source: true,
            remote_name_lookup: true,
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
            query_interval: Duration::from_secs(1),
            dedup: Some(DedupKey::Content),
            min_snippet_chars: 1,
            request_timeout: Duration::from_secs(30),
            generation_timeout: Duration::from_secs(120),
            max_output_tokens: 2048,
            temperature: None,
            report_language: None,
            registry_path: None,
        }
    }
}

impl fmt::Debug for BriefConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: Option<&String>) -> &'static str {
            if key.is_some() { "[REDACTED]" } else { "None" }
        }

        f.debug_struct("BriefConfig")
            .field("gemini_api_key", &redact(self.gemini_api_key.as_ref()))
            .field("model", &self.model)
            .field("model_preferences", &self.model_preferences)
            .field("search_provider", &self.search_provider)
            .field("brave_api_key", &redact(self.brave_api_key.as_ref()))
            .field("use_finance_source", &self.use_finance_source)
            .field("remote_name_lookup", &self.remote_name_lookup)
            .field("results_per_query", &self.results_per_query)
            .field("query_interval", &self.query_interval)
            .field("dedup", &self.dedup)
            .field("min_snippet_chars", &self.min_snippet_chars)
            .field("request_timeout", &self.request_timeout)
            .field("generation_timeout", &self.generation_timeout)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("report_language", &self.report_language)
            .field("registry_path", &self.registry_path)
            .finish()
    }
}

impl BriefConfig {
    /// Create a new configuration builder
    pub fn builder() -> BriefConfigBuilder {
        BriefConfigBuilder::default()
    }

    /// Defaults plus keys and model read from the environment
    pub fn from_env(env: &impl EnvLookup) -> Self {
        Self::builder().with_env(env).assemble()
    }

    /// Check everything that can be checked without the network
    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(BriefError::MissingCredential {
                name: "Gemini API key",
                env_var: GEMINI_KEY_VARS[0],
            });
        }

        if self.search_provider == SearchProvider::Brave
            && self.brave_api_key.as_deref().is_none_or(|k| k.trim().is_empty())
        {
            return Err(BriefError::MissingCredential {
                name: "Brave API key",
                env_var: BRAVE_KEY_VAR,
            });
        }

        if !RESULTS_PER_QUERY_RANGE.contains(&self.results_per_query) {
            return Err(BriefError::ConfigError(format!(
                "results_per_query must be between {} and {}, got {}",
                RESULTS_PER_QUERY_RANGE.start(),
                RESULTS_PER_QUERY_RANGE.end(),
                self.results_per_query
            )));
        }

        if self.max_output_tokens == 0 {
            return Err(BriefError::ConfigError(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }

        if let Some(t) = self.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            return Err(BriefError::ConfigError(format!(
                "temperature must be between 0.0 and 2.0, got {t}"
            )));
        }

        if self.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(BriefError::ConfigError("model must not be blank".to_string()));
        }

        if self.request_timeout.is_zero() || self.generation_timeout.is_zero() {
            return Err(BriefError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Fixed model if configured, otherwise discovery with the preferences
    pub fn model_choice(&self) -> ModelChoice {
        match &self.model {
            Some(model) => ModelChoice::Fixed(model.trim().to_string()),
            None => ModelChoice::Discover(ModelSelector::from_substrings(
                self.model_preferences.iter().cloned(),
            )),
        }
    }

    /// Bundled registry with the configured overlay applied
    pub fn load_registry(&self) -> Result<SecurityRegistry> {
        let registry = SecurityRegistry::bundled();
        match &self.registry_path {
            Some(path) => registry.with_overlay_file(path),
            None => Ok(registry),
        }
    }
}

/// Builder for BriefConfig
#[derive(Debug, Default)]
pub struct BriefConfigBuilder {
    gemini_api_key: Option<String>,
    model: Option<String>,
    model_preferences: Option<Vec<String>>,
    search_provider: Option<SearchProvider>,
    brave_api_key: Option<String>,
    use_finance_source: Option<bool>,
    remote_name_lookup: Option<bool>,
    results_per_query: Option<usize>,
    query_interval: Option<Duration>,
    dedup: Option<Option<DedupKey>>,
    min_snippet_chars: Option<usize>,
    request_timeout: Option<Duration>,
    generation_timeout: Option<Duration>,
    max_output_tokens: Option<usize>,
    temperature: Option<f32>,
    report_language: Option<Language>,
    registry_path: Option<PathBuf>,
}

impl BriefConfigBuilder {
    /// Fill keys and model from the environment where not already set
    pub fn with_env(mut self, env: &impl EnvLookup) -> Self {
        if self.gemini_api_key.is_none() {
            self.gemini_api_key = first_non_empty(env, GEMINI_KEY_VARS);
        }
        if self.brave_api_key.is_none() {
            self.brave_api_key = first_non_empty(env, &[BRAVE_KEY_VAR]);
        }
        if self.model.is_none() {
            self.model = first_non_empty(env, &[MODEL_VAR]);
        }
        self
    }

    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set discovery preferences (name substrings, highest priority first)
    pub fn model_preferences<I, S>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model_preferences = Some(preferences.into_iter().map(Into::into).collect());
        self
    }

    pub fn search_provider(mut self, provider: SearchProvider) -> Self {
        self.search_provider = Some(provider);
        self
    }

    pub fn brave_api_key(mut self, key: impl Into<String>) -> Self {
        self.brave_api_key = Some(key.into());
        self
    }

    pub fn use_finance_source(mut self, enabled: bool) -> Self {
        self.use_finance_source = Some(enabled);
        self
    }

    pub fn remote_name_lookup(mut self, enabled: bool) -> Self {
        self.remote_name_lookup = Some(enabled);
        self
    }

    pub fn results_per_query(mut self, results: usize) -> Self {
        self.results_per_query = Some(results);
        self
    }

    pub fn query_interval(mut self, interval: Duration) -> Self {
        self.query_interval = Some(interval);
        self
    }

    /// Set the dedup key, `None` disables deduplication
    pub fn dedup(mut self, dedup: Option<DedupKey>) -> Self {
        self.dedup = Some(dedup);
        self
    }

    pub fn min_snippet_chars(mut self, chars: usize) -> Self {
        self.min_snippet_chars = Some(chars);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    pub fn max_output_tokens(mut self, tokens: usize) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn report_language(mut self, language: Language) -> Self {
        self.report_language = Some(language);
        self
    }

    pub fn registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = Some(path.into());
        self
    }

    fn assemble(self) -> BriefConfig {
        let defaults = BriefConfig::default();
        BriefConfig {
            gemini_api_key: self.gemini_api_key,
            model: self.model,
            model_preferences: self.model_preferences.unwrap_or(defaults.model_preferences),
            search_provider: self.search_provider.unwrap_or(defaults.search_provider),
            brave_api_key: self.brave_api_key,
            use_finance_source: self.use_finance_source.unwrap_or(defaults.use_finance_source),
            remote_name_lookup: self.remote_name_lookup.unwrap_or(defaults.remote_name_lookup),
            results_per_query: self.results_per_query.unwrap_or(defaults.results_per_query),
            query_interval: self.query_interval.unwrap_or(defaults.query_interval),
            dedup: self.dedup.unwrap_or(defaults.dedup),
            min_snippet_chars: self.min_snippet_chars.unwrap_or(defaults.min_snippet_chars),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            generation_timeout: self.generation_timeout.unwrap_or(defaults.generation_timeout),
            max_output_tokens: self.max_output_tokens.unwrap_or(defaults.max_output_tokens),
            temperature: self.temperature,
            report_language: self.report_language,
            registry_path: self.registry_path,
        }
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<BriefConfig> {
        let config = self.assemble();
        config.validate()?;
        Ok(config)
    }
}
