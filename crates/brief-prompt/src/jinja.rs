//! MiniJinja-backed templates

use crate::{Language, PromptError, PromptTemplate, Result};
use minijinja::{Environment, UndefinedBehavior};
use std::collections::HashMap;

/// A prompt template rendered with MiniJinja
///
/// Rendering is strict: a variable the template references but the caller
/// did not supply is an error rather than an empty string.
pub struct JinjaTemplate {
    name: String,
    variants: HashMap<Language, String>,
}

impl JinjaTemplate {
    /// Start a builder
    pub fn builder(name: impl Into<String>) -> JinjaTemplateBuilder {
        JinjaTemplateBuilder::new(name)
    }

    /// Single English variant
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Result<Self> {
        Self::builder(name).english(template).build()
    }

    /// English and Traditional Chinese variants
    pub fn bilingual(
        name: impl Into<String>,
        english: impl Into<String>,
        traditional_chinese: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(name)
            .english(english)
            .traditional_chinese(traditional_chinese)
            .build()
    }

    fn environment<'source>() -> Environment<'source> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn languages(&self) -> Vec<Language> {
        self.variants.keys().cloned().collect()
    }

    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        let source = self
            .variants
            .get(lang)
            .ok_or_else(|| PromptError::LanguageNotAvailable {
                name: self.name.clone(),
                language: lang.code().to_string(),
            })?;

        let ctx = minijinja::Value::from_serialize(vars);

        Self::environment()
            .render_str(source, ctx)
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self, lang: &Language) -> Option<&str> {
        self.variants.get(lang).map(String::as_str)
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("languages", &self.variants.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`JinjaTemplate`]
pub struct JinjaTemplateBuilder {
    name: String,
    variants: HashMap<Language, String>,
}

impl JinjaTemplateBuilder {
    /// New builder for the named template
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: HashMap::new(),
        }
    }

    /// Add a variant for `lang`
    pub fn template(mut self, lang: Language, content: impl Into<String>) -> Self {
        self.variants.insert(lang, content.into());
        self
    }

    /// Add the English variant
    pub fn english(self, content: impl Into<String>) -> Self {
        self.template(Language::English, content)
    }

    /// Add the Traditional Chinese variant
    pub fn traditional_chinese(self, content: impl Into<String>) -> Self {
        self.template(Language::TraditionalChinese, content)
    }

    /// Build the template, checking every variant compiles
    pub fn build(self) -> Result<JinjaTemplate> {
        if self.variants.is_empty() {
            return Err(PromptError::NoTemplatesProvided(self.name));
        }

        let env = JinjaTemplate::environment();
        for (lang, content) in &self.variants {
            env.template_from_str(content)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: self.name.clone(),
                    language: lang.code().to_string(),
                    detail: e.to_string(),
                })?;
        }

        Ok(JinjaTemplate {
            name: self.name,
            variants: self.variants,
        })
    }
}
