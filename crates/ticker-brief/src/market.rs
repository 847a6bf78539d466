//! Markets and ticker queries

use crate::error::{BriefError, Result};
use brief_prompt::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market a ticker is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Taiwan (TWSE and TPEx); names come from the offline registry
    Domestic,
    /// United States; the ticker is used as-is
    Foreign,
}

impl Market {
    /// Short code ("TW" / "US")
    pub fn code(self) -> &'static str {
        match self {
            Market::Domestic => "TW",
            Market::Foreign => "US",
        }
    }

    /// Label used in console output
    pub fn label(self) -> &'static str {
        self.label_for(&Language::TraditionalChinese)
    }

    /// Label written into a prompt in `language`
    pub fn label_for(self, language: &Language) -> &'static str {
        match (self, language) {
            (Market::Domestic, Language::TraditionalChinese) => "台灣 (TW)",
            (Market::Foreign, Language::TraditionalChinese) => "美國 (US)",
            (Market::Domestic, _) => "Taiwan (TW)",
            (Market::Foreign, _) => "United States (US)",
        }
    }

    /// Language reports are written in unless overridden
    pub fn default_language(self) -> Language {
        Language::TraditionalChinese
    }

    /// Listing-board suffixes tried, in order, when looking a code up remotely
    ///
    /// `.TW` is the TWSE main board, `.TWO` the TPEx (OTC) board.
    pub fn listing_suffixes(self) -> &'static [&'static str] {
        match self {
            Market::Domestic => &[".TW", ".TWO"],
            Market::Foreign => &[],
        }
    }

    /// Whether identifiers resolve through the offline registry
    pub fn uses_registry(self) -> bool {
        matches!(self, Market::Domestic)
    }

    /// Country hint for keyed search providers
    pub fn search_country(self) -> &'static str {
        match self {
            Market::Domestic => "TW",
            Market::Foreign => "US",
        }
    }

    /// Result language hint for keyed search providers
    pub fn search_language(self) -> &'static str {
        match self {
            Market::Domestic => "zh-hant",
            Market::Foreign => "en",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Market {
    type Err = BriefError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tw" | "taiwan" | "domestic" | "台灣" => Ok(Market::Domestic),
            "us" | "usa" | "foreign" | "美國" => Ok(Market::Foreign),
            other => Err(BriefError::InvalidInput(format!(
                "unknown market '{other}' (expected tw or us)"
            ))),
        }
    }
}

/// A ticker as entered by the user, paired with the selected market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerQuery {
    raw_input: String,
    market: Market,
}

impl TickerQuery {
    /// Build a query; blank input is rejected
    pub fn new(raw_input: impl Into<String>, market: Market) -> Result<Self> {
        let raw_input = raw_input.into();
        if raw_input.trim().is_empty() {
            return Err(BriefError::InvalidInput("ticker is empty".to_string()));
        }
        Ok(Self { raw_input, market })
    }

    /// The input exactly as entered
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// Selected market
    pub fn market(&self) -> Market {
        self.market
    }

    /// Trimmed, uppercased identifier
    pub fn normalized(&self) -> String {
        self.raw_input.trim().to_uppercase()
    }
}
