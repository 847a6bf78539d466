//! News snippets and the collection the aggregator produces

use crate::error::{BriefError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Kind of source a snippet came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    /// Finance-metadata service news feed
    LocalFinance,
    /// General web search
    WebSearch,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceTag::LocalFinance => "finance",
            SourceTag::WebSearch => "web",
        })
    }
}

/// A single search or news result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewsSnippet {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub source: SourceTag,
}

impl NewsSnippet {
    /// Create a snippet, trimming each field
    pub fn new(
        title: impl AsRef<str>,
        summary: impl AsRef<str>,
        url: impl AsRef<str>,
        source: SourceTag,
    ) -> Self {
        Self {
            title: title.as_ref().trim().to_string(),
            summary: summary.as_ref().trim().to_string(),
            url: url.as_ref().trim().to_string(),
            source,
        }
    }

    /// Characters of text this snippet contributes
    pub fn char_count(&self) -> usize {
        self.title.chars().count() + self.summary.chars().count() + self.url.chars().count()
    }

    /// Whether the snippet carries no text at all
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.summary.is_empty() && self.url.is_empty()
    }
}

/// Key used to decide two snippets are duplicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DedupKey {
    /// Same title, summary and url
    #[default]
    Content,
    /// Same url, ignoring a trailing slash and ASCII case
    Url,
}

impl DedupKey {
    fn key_of(self, snippet: &NewsSnippet) -> String {
        match self {
            // Unit separators keep field boundaries unambiguous
            DedupKey::Content => format!(
                "{}\u{1f}{}\u{1f}{}",
                snippet.title, snippet.summary, snippet.url
            ),
            DedupKey::Url => snippet.url.trim_end_matches('/').to_ascii_lowercase(),
        }
    }
}

impl FromStr for DedupKey {
    type Err = BriefError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "content" => Ok(DedupKey::Content),
            "url" | "link" => Ok(DedupKey::Url),
            other => Err(BriefError::InvalidInput(format!(
                "unknown dedup key '{other}' (expected content or url)"
            ))),
        }
    }
}

/// Ordered list of snippets gathered for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetCollection {
    snippets: Vec<NewsSnippet>,
}

impl SnippetCollection {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snippet
    pub fn push(&mut self, snippet: NewsSnippet) {
        self.snippets.push(snippet);
    }

    /// Number of snippets
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Total characters across all snippet fields
    pub fn total_chars(&self) -> usize {
        self.snippets.iter().map(NewsSnippet::char_count).sum()
    }

    /// Iterate in collection order
    pub fn iter(&self) -> std::slice::Iter<'_, NewsSnippet> {
        self.snippets.iter()
    }

    /// Borrow as a slice
    pub fn as_slice(&self) -> &[NewsSnippet] {
        &self.snippets
    }

    /// Drop duplicates by `key`, keeping the first occurrence of each
    pub fn dedup_by(self, key: DedupKey) -> Self {
        let mut seen = HashSet::with_capacity(self.snippets.len());
        let snippets = self
            .snippets
            .into_iter()
            .filter(|snippet| seen.insert(key.key_of(snippet)))
            .collect();
        Self { snippets }
    }

    /// Plain-text dump of every snippet, for debugging output
    pub fn render_dump(&self) -> String {
        self.snippets
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    "[{}] ({}) {}\n    {}\n    {}",
                    i + 1,
                    s.source,
                    s.title,
                    s.summary,
                    s.url
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl From<Vec<NewsSnippet>> for SnippetCollection {
    fn from(snippets: Vec<NewsSnippet>) -> Self {
        Self { snippets }
    }
}

impl FromIterator<NewsSnippet> for SnippetCollection {
    fn from_iter<I: IntoIterator<Item = NewsSnippet>>(iter: I) -> Self {
        Self {
            snippets: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SnippetCollection {
    type Item = NewsSnippet;
    type IntoIter = std::vec::IntoIter<NewsSnippet>;

    fn into_iter(self) -> Self::IntoIter {
        self.snippets.into_iter()
    }
}

impl<'a> IntoIterator for &'a SnippetCollection {
    type Item = &'a NewsSnippet;
    type IntoIter = std::slice::Iter<'a, NewsSnippet>;

    fn into_iter(self) -> Self::IntoIter {
        self.snippets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web(title: &str, url: &str) -> NewsSnippet {
        NewsSnippet::new(title, "summary", url, SourceTag::WebSearch)
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let collection: SnippetCollection = vec![
            web("B", "https://b.example"),
            web("A", "https://a.example"),
            web("B", "https://b.example"),
            web("C", "https://c.example"),
            web("A", "https://a.example"),
        ]
        .into();

        let titles: Vec<String> = collection
            .dedup_by(DedupKey::Content)
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_content_dedup_ignores_source_tag() {
        let collection: SnippetCollection = vec![
            NewsSnippet::new("T", "S", "https://x.example", SourceTag::LocalFinance),
            NewsSnippet::new("T", "S", "https://x.example", SourceTag::WebSearch),
        ]
        .into();

        let deduped = collection.dedup_by(DedupKey::Content);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped.as_slice()[0].source, SourceTag::LocalFinance);
    }

    #[test]
    fn test_url_dedup() {
        let collection: SnippetCollection = vec![
            web("First", "https://news.example/a/"),
            web("Second headline", "https://NEWS.example/a"),
            web("Third", "https://news.example/b"),
        ]
        .into();

        let deduped = collection.dedup_by(DedupKey::Url);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped.as_slice()[0].title, "First");
    }

    #[test]
    fn test_content_key_field_boundaries() {
        let a = NewsSnippet::new("ab", "c", "u", SourceTag::WebSearch);
        let b = NewsSnippet::new("a", "bc", "u", SourceTag::WebSearch);
        let deduped = SnippetCollection::from(vec![a, b]).dedup_by(DedupKey::Content);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_dedup_never_grows() {
        let collection: SnippetCollection = (0..6)
            .map(|i| web(&format!("T{}", i % 3), &format!("https://x/{}", i % 3)))
            .collect();
        let before = collection.len();
        let after = collection.dedup_by(DedupKey::Content).len();
        assert!(after <= before);
        assert_eq!(after, 3);
    }

    #[test]
    fn test_total_chars_counts_chars_not_bytes() {
        let collection = SnippetCollection::from(vec![NewsSnippet::new(
            "台積電",
            "營收",
            "u",
            SourceTag::WebSearch,
        )]);
        assert_eq!(collection.total_chars(), 6);
    }

    #[test]
    fn test_parse_dedup_key() {
        assert_eq!("URL".parse::<DedupKey>().unwrap(), DedupKey::Url);
        assert_eq!("content".parse::<DedupKey>().unwrap(), DedupKey::Content);
        assert!("title".parse::<DedupKey>().is_err());
    }

    #[test]
    fn test_render_dump() {
        let dump =
            SnippetCollection::from(vec![web("Headline", "https://h.example")]).render_dump();
        assert!(dump.starts_with("[1] (web) Headline"));
        assert!(dump.contains("https://h.example"));
    }
}
