//! Basic brief example
//!
//! Resolves a ticker, gathers news and prints the report with the raw news.
//!
//! To run this example:
//! ```bash
//! export GEMINI_API_KEY=your_key_here
//! export BRIEF_MODEL=gemini-2.0-flash   # Optional, discovered otherwise
//!
//! cargo run --example basic_analysis -- 2330 tw
//! cargo run --example basic_analysis -- NVDA us
//! ```

use brief_utils::ProcessEnv;
use std::env;
use ticker_brief::{
    BriefConfig, BriefOutcome, BriefPipeline, Market, ProgressLevel, ProgressSink, TickerQuery,
};

struct PrintProgress;

impl ProgressSink for PrintProgress {
    fn notify(&self, level: ProgressLevel, message: &str) {
        println!("  [{level:?}] {message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    brief_utils::init_tracing_with("info");

    let args: Vec<String> = env::args().collect();
    let ticker = args.get(1).map_or("2330", String::as_str);
    let market: Market = args.get(2).map_or("tw", String::as_str).parse()?;

    println!("=== ticker-brief ===\n");
    println!("Analyzing: {ticker} ({})\n", market.label());

    let config = BriefConfig::from_env(&ProcessEnv);
    println!("Configuration:");
    println!("  - Search provider: {}", config.search_provider);
    println!("  - Results per query: {}", config.results_per_query);
    println!("  - Model: {}\n", config.model.as_deref().unwrap_or("(discovered)"));

    let pipeline = BriefPipeline::from_config(&config)?;
    let query = TickerQuery::new(ticker, market)?;

    match pipeline.run(&query, &PrintProgress).await {
        BriefOutcome::Completed {
            identity,
            snippets,
            report,
        } => {
            println!("\n=== News for {identity} ===\n{}\n", snippets.render_dump());
            println!("=== Report ({:?}) ===\n{}", report.kind, report.text);
        }
        BriefOutcome::NoData { identity } => {
            println!("No news found for {identity}");
        }
    }

    Ok(())
}
