//! Ticker resolution: user input → canonical symbol and display name

use crate::market::{Market, TickerQuery};
use crate::progress::ProgressSink;
use crate::registry::SecurityRegistry;
use crate::sources::FinanceMetadata;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a display name came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NameSource {
    /// Offline registry hit
    Registry,
    /// Remote metadata lookup, with the listing-qualified symbol that matched
    Remote(String),
    /// Nothing better than the symbol itself
    Fallback,
}

/// Canonical identity of the requested security
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIdentity {
    pub symbol: String,
    pub display_name: String,
    pub name_source: NameSource,
}

impl ResolvedIdentity {
    /// Identity whose name is just the symbol
    pub fn fallback(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            display_name: symbol.clone(),
            symbol,
            name_source: NameSource::Fallback,
        }
    }
}

impl fmt::Display for ResolvedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name == self.symbol {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{} ({})", self.display_name, self.symbol)
        }
    }
}

/// Resolves tickers against the offline registry and, on a miss, an optional
/// remote metadata source
#[derive(Clone)]
pub struct TickerResolver {
    registry: Arc<SecurityRegistry>,
    metadata: Option<Arc<dyn FinanceMetadata>>,
}

impl TickerResolver {
    pub fn new(registry: Arc<SecurityRegistry>) -> Self {
        Self {
            registry,
            metadata: None,
        }
    }

    /// Enable remote lookups for registry misses
    pub fn with_metadata(mut self, metadata: Arc<dyn FinanceMetadata>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Resolve a query; never fails, falling back to the normalized input
    pub async fn resolve(
        &self,
        query: &TickerQuery,
        progress: &dyn ProgressSink,
    ) -> ResolvedIdentity {
        let symbol = query.normalized();

        if !query.market().uses_registry() {
            return ResolvedIdentity::fallback(symbol);
        }

        if let Some(name) = self.registry.lookup(&symbol) {
            debug!(symbol = %symbol, name, "Registry hit");
            progress.success(&format!("Found {name} ({symbol}) in the local registry"));
            return ResolvedIdentity {
                display_name: name.to_string(),
                symbol,
                name_source: NameSource::Registry,
            };
        }

        if let Some(identity) = self.resolve_remote(&symbol, query.market()).await {
            progress.success(&format!(
                "Found {} ({symbol}) via finance metadata",
                identity.display_name
            ));
            return identity;
        }

        progress.warning(&format!(
            "No company name found for {symbol}; using the code as its name"
        ));
        ResolvedIdentity::fallback(symbol)
    }

    async fn resolve_remote(&self, symbol: &str, market: Market) -> Option<ResolvedIdentity> {
        let metadata = self.metadata.as_ref()?;

        for suffix in market.listing_suffixes() {
            let qualified = format!("{symbol}{suffix}");
            match metadata.company_name(&qualified).await {
                Ok(Some(name)) if !name.trim().is_empty() => {
                    debug!(qualified = %qualified, name = %name, "Remote name lookup hit");
                    return Some(ResolvedIdentity {
                        symbol: symbol.to_string(),
                        display_name: name.trim().to_string(),
                        name_source: NameSource::Remote(qualified),
                    });
                }
                Ok(_) => debug!(qualified = %qualified, "Remote name lookup miss"),
                Err(e) => warn!(qualified = %qualified, error = %e, "Remote name lookup failed"),
            }
        }
        None
    }
}
