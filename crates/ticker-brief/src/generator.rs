//! Report generation: snippets → prompt → one model call → report text

use crate::error::{BriefError, Result};
use crate::market::Market;
use crate::prompts::report_template;
use crate::resolver::ResolvedIdentity;
use crate::snippet::SnippetCollection;
use brief_llm::{CompletionRequest, LLMError, LLMProvider, Message, ModelSelector};
use brief_prompt::{JinjaTemplate, Language, PromptTemplate};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// How the generator picks its model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChoice {
    /// Use this model id as-is
    Fixed(String),
    /// List the provider's models and let the selector pick
    Discover(ModelSelector),
}

/// Outcome category of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportKind {
    /// Text produced by the model
    Generated { model: String },
    /// Not enough news to ask the model
    InsufficientData,
    /// The model call failed; the text carries the reason
    Failed,
}

/// Text shown to the user plus what produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub text: String,
    pub kind: ReportKind,
}

impl Report {
    pub fn is_generated(&self) -> bool {
        matches!(self.kind, ReportKind::Generated { .. })
    }
}

/// Fixed labels and messages in the report language
struct Wording {
    title: &'static str,
    summary: &'static str,
    link: &'static str,
    insufficient: &'static str,
    failure_prefix: &'static str,
}

impl Wording {
    fn for_language(language: &Language) -> Self {
        match language {
            Language::TraditionalChinese => Self {
                title: "標題",
                summary: "摘要",
                link: "連結",
                insufficient: "無法取得足夠的新聞資料進行分析。",
                failure_prefix: "AI 分析失敗",
            },
            Language::English | Language::Other(_) => Self {
                title: "Title",
                summary: "Summary",
                link: "Link",
                insufficient: "Not enough news data was found to run an analysis.",
                failure_prefix: "AI analysis failed",
            },
        }
    }
}

/// Join snippets into the block the prompt embeds, one paragraph each
pub fn render_news_block(snippets: &SnippetCollection, language: &Language) -> String {
    let wording = Wording::for_language(language);
    snippets
        .iter()
        .map(|s| {
            let mut lines = vec![format!("{}: {}", wording.title, s.title)];
            if !s.summary.is_empty() {
                lines.push(format!("{}: {}", wording.summary, s.summary));
            }
            if !s.url.is_empty() {
                lines.push(format!("{}: {}", wording.link, s.url));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Produces a report from collected snippets with a single model call
pub struct ReportGenerator {
    provider: Arc<dyn LLMProvider>,
    template: JinjaTemplate,
    model: ModelChoice,
    max_output_tokens: usize,
    temperature: Option<f32>,
    min_snippet_chars: usize,
    language: Option<Language>,
}

impl ReportGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, model: ModelChoice) -> Result<Self> {
        Ok(Self {
            provider,
            template: report_template()?,
            model,
            max_output_tokens: 2048,
            temperature: None,
            min_snippet_chars: 1,
            language: None,
        })
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: usize) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Collections with fewer characters than this skip the model
    pub fn with_min_snippet_chars(mut self, min_snippet_chars: usize) -> Self {
        self.min_snippet_chars = min_snippet_chars;
        self
    }

    /// Override the market's default report language
    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    /// Language reports for `market` are written in
    pub fn language_for(&self, market: Market) -> Language {
        self.language
            .clone()
            .unwrap_or_else(|| market.default_language())
    }

    /// Produce a report; failures come back as [`ReportKind::Failed`]
    #[instrument(
        skip(self, snippets),
        fields(symbol = %identity.symbol, snippets = snippets.len())
    )]
    pub async fn generate(
        &self,
        snippets: &SnippetCollection,
        identity: &ResolvedIdentity,
        market: Market,
    ) -> Report {
        let language = self.language_for(market);
        let wording = Wording::for_language(&language);

        if snippets.is_empty() || snippets.total_chars() < self.min_snippet_chars {
            info!("Not enough news to analyze");
            return Report {
                text: wording.insufficient.to_string(),
                kind: ReportKind::InsufficientData,
            };
        }

        match self.try_generate(snippets, identity, market, &language).await {
            Ok((model, text)) => {
                info!(model = %model, chars = text.chars().count(), "Report generated");
                Report {
                    text,
                    kind: ReportKind::Generated { model },
                }
            }
            Err(e) => {
                warn!(error = %e, "Report generation failed");
                Report {
                    text: format!("{}: {e}", wording.failure_prefix),
                    kind: ReportKind::Failed,
                }
            }
        }
    }

    async fn try_generate(
        &self,
        snippets: &SnippetCollection,
        identity: &ResolvedIdentity,
        market: Market,
        language: &Language,
    ) -> Result<(String, String)> {
        let vars = json!({
            "symbol": identity.symbol,
            "name": identity.display_name,
            "market": market.label_for(language),
            "news": render_news_block(snippets, language),
        });
        let prompt = self.template.render_with_fallback(language, &vars)?;

        let model = match &self.model {
            ModelChoice::Fixed(id) => id.clone(),
            ModelChoice::Discover(selector) => selector.discover(self.provider.as_ref()).await?,
        };

        let mut builder = CompletionRequest::builder(&model)
            .add_message(Message::user(prompt))
            .max_tokens(self.max_output_tokens);
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }

        let response = self.provider.complete(builder.build()).await?;
        if !response.message.has_text() {
            return Err(BriefError::Llm(LLMError::EmptyResponse(
                "no usable output".to_string(),
            )));
        }

        Ok((model, response.message.text().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::NameSource;
    use crate::snippet::{NewsSnippet, SourceTag};
    use crate::test_support::StubProvider;

    fn tsmc() -> ResolvedIdentity {
        ResolvedIdentity {
            symbol: "2330".to_string(),
            display_name: "台積電".to_string(),
            name_source: NameSource::Registry,
        }
    }

    fn collection() -> SnippetCollection {
        SnippetCollection::from(vec![
            NewsSnippet::new(
                "台積電營收創新高",
                "Reuters · 2024-06-01",
                "https://a.example/1",
                SourceTag::LocalFinance,
            ),
            NewsSnippet::new(
                "AI demand lifts chips",
                "",
                "https://b.example/2",
                SourceTag::WebSearch,
            ),
        ])
    }

    fn generator(provider: &Arc<StubProvider>) -> ReportGenerator {
        let provider: Arc<dyn LLMProvider> = provider.clone();
        ReportGenerator::new(provider, ModelChoice::Fixed("gemini-test".to_string())).unwrap()
    }

    #[test]
    fn test_render_news_block() {
        let block = render_news_block(&collection(), &Language::TraditionalChinese);
        assert_eq!(
            block,
            "標題: 台積電營收創新高\n摘要: Reuters · 2024-06-01\n連結: https://a.example/1\n\n\
             標題: AI demand lifts chips\n連結: https://b.example/2"
        );

        let english = render_news_block(&collection(), &Language::English);
        assert!(english.starts_with("Title: 台積電營收創新高\nSummary: "));
    }

    #[tokio::test]
    async fn test_empty_collection_skips_model() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let report = generator(&provider)
            .generate(&SnippetCollection::new(), &tsmc(), Market::Domestic)
            .await;

        assert_eq!(report.kind, ReportKind::InsufficientData);
        assert_eq!(report.text, "無法取得足夠的新聞資料進行分析。");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_below_min_chars_skips_model() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let report = generator(&provider)
            .with_min_snippet_chars(10_000)
            .with_language(Some(Language::English))
            .generate(&collection(), &tsmc(), Market::Domestic)
            .await;

        assert_eq!(report.kind, ReportKind::InsufficientData);
        assert!(report.text.starts_with("Not enough news"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_generated_text_is_verbatim() {
        let provider = Arc::new(StubProvider::replying("  **市場情緒摘要**：看多\n"));
        let report = generator(&provider)
            .with_temperature(Some(0.4))
            .generate(&collection(), &tsmc(), Market::Domestic)
            .await;

        assert_eq!(report.text, "  **市場情緒摘要**：看多\n");
        assert_eq!(
            report.kind,
            ReportKind::Generated {
                model: "gemini-test".to_string()
            }
        );
        assert_eq!(provider.calls(), 1);

        let request = provider.last_request().unwrap();
        assert_eq!(request.model, "gemini-test");
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.temperature, Some(0.4));
        let prompt = request.messages[0].text();
        assert!(prompt.contains("2330（台積電）"));
        assert!(prompt.contains("連結: https://b.example/2"));
        assert!(prompt.contains("台灣 (TW)"));
    }

    #[tokio::test]
    async fn test_english_prompt_uses_english_market_label() {
        let provider = Arc::new(StubProvider::replying("Bullish"));
        let report = generator(&provider)
            .with_language(Some(Language::English))
            .generate(&collection(), &ResolvedIdentity::fallback("NVDA"), Market::Foreign)
            .await;
        assert!(matches!(report.kind, ReportKind::Generated { .. }));

        let request = provider.last_request().unwrap();
        let prompt = request.messages[0].text();
        assert!(prompt.contains("analyze the stock NVDA, listed in United States (US)."));
        assert!(!prompt.contains("美國"));
    }

    #[tokio::test]
    async fn test_failure_message_carries_error() {
        let provider = Arc::new(StubProvider::failing(|| {
            LLMError::RateLimitExceeded("quota exhausted".to_string())
        }));
        let report = generator(&provider)
            .generate(&collection(), &tsmc(), Market::Domestic)
            .await;

        assert_eq!(report.kind, ReportKind::Failed);
        assert!(report.text.starts_with("AI 分析失敗: "));
        assert!(report.text.contains("quota exhausted"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_output_is_failure() {
        let provider = Arc::new(StubProvider::replying("   "));
        let report = generator(&provider)
            .with_language(Some(Language::English))
            .generate(&collection(), &tsmc(), Market::Domestic)
            .await;

        assert_eq!(report.kind, ReportKind::Failed);
        assert!(report.text.starts_with("AI analysis failed: "));
        assert!(report.text.contains("no usable output"));
    }

    #[tokio::test]
    async fn test_discovery_picks_preferred_model() {
        let provider = Arc::new(
            StubProvider::replying("ok").with_models(&["gemini-pro", "gemini-2.0-flash"]),
        );
        let dyn_provider: Arc<dyn LLMProvider> = provider.clone();
        let generator =
            ReportGenerator::new(dyn_provider, ModelChoice::Discover(ModelSelector::default()))
                .unwrap();

        let report = generator
            .generate(&collection(), &ResolvedIdentity::fallback("NVDA"), Market::Foreign)
            .await;

        assert_eq!(
            report.kind,
            ReportKind::Generated {
                model: "gemini-2.0-flash".to_string()
            }
        );
        assert_eq!(provider.last_request().unwrap().model, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_discovery_without_models_is_failure() {
        let provider = Arc::new(StubProvider::replying("ok"));
        let dyn_provider: Arc<dyn LLMProvider> = provider.clone();
        let generator =
            ReportGenerator::new(dyn_provider, ModelChoice::Discover(ModelSelector::default()))
                .unwrap();

        let report = generator
            .generate(&collection(), &ResolvedIdentity::fallback("NVDA"), Market::Foreign)
            .await;

        assert_eq!(report.kind, ReportKind::Failed);
        assert!(report.text.contains("No suitable model available"));
        assert_eq!(provider.calls(), 0);
    }
}
