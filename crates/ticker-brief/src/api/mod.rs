//! API clients for finance metadata and web search

pub mod brave;
pub mod duckduckgo;
mod html;
pub mod yahoo;

pub use brave::BraveSearchClient;
pub use duckduckgo::DuckDuckGoClient;
pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use reqwest::Client;
use std::time::Duration;

/// Browser-like user agent; Yahoo and DuckDuckGo reject obvious bots
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// HTTP client shared by the search clients
pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}
