//! Prompt template trait

use crate::{Language, PromptError, Result};

/// A named prompt with one or more language variants
///
/// Variables are passed as `serde_json::Value` so the trait stays
/// dyn-compatible and can be held as `Arc<dyn PromptTemplate>`.
pub trait PromptTemplate: Send + Sync {
    /// Template identifier
    fn name(&self) -> &str;

    /// Languages this template has a variant for
    fn languages(&self) -> Vec<Language>;

    /// Whether a variant exists for `lang`
    fn supports_language(&self, lang: &Language) -> bool {
        self.languages().contains(lang)
    }

    /// Render the `lang` variant; errors if it does not exist
    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String>;

    /// Render `lang`, else English, else the first available variant
    fn render_with_fallback(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        if self.supports_language(lang) {
            return self.render(lang, vars);
        }

        if self.supports_language(&Language::English) {
            return self.render(&Language::English, vars);
        }

        let fallback = self
            .languages()
            .into_iter()
            .next()
            .ok_or_else(|| PromptError::NoLanguageAvailable(self.name().to_string()))?;

        self.render(&fallback, vars)
    }

    /// Raw template source for a language
    fn raw_template(&self, lang: &Language) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    /// Template that ignores variables
    struct FixedTemplate {
        name: String,
        variants: HashMap<Language, String>,
    }

    impl FixedTemplate {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                variants: HashMap::new(),
            }
        }

        fn with(mut self, lang: Language, text: &str) -> Self {
            self.variants.insert(lang, text.to_string());
            self
        }
    }

    impl PromptTemplate for FixedTemplate {
        fn name(&self) -> &str {
            &self.name
        }

        fn languages(&self) -> Vec<Language> {
            self.variants.keys().cloned().collect()
        }

        fn render(&self, lang: &Language, _vars: &serde_json::Value) -> Result<String> {
            self.variants
                .get(lang)
                .cloned()
                .ok_or_else(|| PromptError::LanguageNotAvailable {
                    name: self.name.clone(),
                    language: lang.code().to_string(),
                })
        }

        fn raw_template(&self, lang: &Language) -> Option<&str> {
            self.variants.get(lang).map(String::as_str)
        }
    }

    #[test]
    fn test_render_requested_language() {
        let template = FixedTemplate::new("t")
            .with(Language::English, "report")
            .with(Language::TraditionalChinese, "報告");

        let out = template
            .render_with_fallback(&Language::TraditionalChinese, &json!({}))
            .unwrap();
        assert_eq!(out, "報告");
    }

    #[test]
    fn test_fallback_prefers_english() {
        let template = FixedTemplate::new("t")
            .with(Language::English, "report")
            .with(Language::TraditionalChinese, "報告");

        let out = template
            .render_with_fallback(&Language::Other("ja".to_string()), &json!({}))
            .unwrap();
        assert_eq!(out, "report");
    }

    #[test]
    fn test_fallback_to_only_variant() {
        let template = FixedTemplate::new("t").with(Language::TraditionalChinese, "報告");

        let out = template
            .render_with_fallback(&Language::English, &json!({}))
            .unwrap();
        assert_eq!(out, "報告");
    }

    #[test]
    fn test_fallback_without_variants() {
        let template = FixedTemplate::new("empty");
        let err = template
            .render_with_fallback(&Language::English, &json!({}))
            .unwrap_err();
        assert!(matches!(err, PromptError::NoLanguageAvailable(name) if name == "empty"));
    }
}
