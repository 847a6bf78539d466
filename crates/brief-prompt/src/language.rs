//! Report languages
//!
//! The tool writes reports in English or Traditional Chinese; anything else
//! is carried as a BCP 47 tag in [`Language::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language a prompt variant (and the resulting report) is written in
///
/// ```
/// use brief_prompt::Language;
///
/// assert_eq!(Language::from_code("zh-TW"), Language::TraditionalChinese);
/// assert_eq!(Language::TraditionalChinese.code(), "zh-TW");
/// assert_eq!(Language::from_code("ja"), Language::Other("ja".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// English
    #[default]
    English,
    /// Traditional Chinese (Taiwan)
    TraditionalChinese,
    /// Any other language tag
    Other(String),
}

impl Language {
    /// BCP 47 tag
    pub fn code(&self) -> &str {
        match self {
            Language::English => "en",
            Language::TraditionalChinese => "zh-TW",
            Language::Other(code) => code,
        }
    }

    /// Name for display
    pub fn name(&self) -> &str {
        match self {
            Language::English => "English",
            Language::TraditionalChinese => "繁體中文",
            Language::Other(code) => code,
        }
    }

    /// Parse a tag or a common name, case-insensitively
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Language::English,
            "zh" | "zh-tw" | "zh-hant" | "tw" | "繁體中文" | "中文" => {
                Language::TraditionalChinese
            }
            other => Language::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Language::from_code(s)
    }
}
