//! ticker-brief command-line front end
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="your-key"
//!
//! # One report
//! cargo run --bin ticker-brief -- 2330 --market tw
//!
//! # Interactive: enter "<ticker> [market]" per line
//! cargo run --bin ticker-brief
//! ```

use brief_utils::ProcessEnv;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use ticker_brief::{
    BriefConfig, BriefOutcome, BriefPipeline, DedupKey, Language, Market, ProgressLevel,
    ProgressSink, ReportKind, SearchProvider, TickerQuery,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "ticker-brief")]
#[command(about = "News-driven stock briefs written by Gemini", long_about = None)]
struct Args {
    /// Ticker to analyze (e.g. 2330 or NVDA); omit for interactive mode
    ticker: Option<String>,

    /// Market: tw or us
    #[arg(short, long, default_value = "tw")]
    market: Market,

    /// Web search provider: duckduckgo or brave
    #[arg(short, long, default_value = "duckduckgo")]
    search: SearchProvider,

    /// Gemini model id; discovered from the API when omitted
    #[arg(long)]
    model: Option<String>,

    /// Results kept per query (1-10)
    #[arg(short, long)]
    results: Option<usize>,

    /// Keep duplicate results
    #[arg(long)]
    no_dedup: bool,

    /// What makes two results duplicates: content or url
    #[arg(long, conflicts_with = "no_dedup")]
    dedup_by: Option<DedupKey>,

    /// Skip the Yahoo Finance news feed
    #[arg(long)]
    no_finance: bool,

    /// Report language (en, zh-TW); defaults to the market's language
    #[arg(short, long)]
    language: Option<String>,

    /// JSON file of extra code → name registry entries
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Print the collected news before the report
    #[arg(long)]
    show_snippets: bool,

    /// Sampling temperature (0.0-2.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Gemini API key (overrides GEMINI_API_KEY)
    #[arg(long)]
    gemini_key: Option<String>,

    /// Brave Search API key (overrides BRAVE_API_KEY)
    #[arg(long)]
    brave_key: Option<String>,
}

impl Args {
    fn to_config(&self) -> ticker_brief::Result<BriefConfig> {
        let mut builder = BriefConfig::builder()
            .search_provider(self.search)
            .use_finance_source(!self.no_finance);

        if let Some(key) = &self.gemini_key {
            builder = builder.gemini_api_key(key);
        }
        if let Some(key) = &self.brave_key {
            builder = builder.brave_api_key(key);
        }
        if let Some(model) = &self.model {
            builder = builder.model(model);
        }
        if let Some(results) = self.results {
            builder = builder.results_per_query(results);
        }
        if self.no_dedup {
            builder = builder.dedup(None);
        } else if let Some(key) = self.dedup_by {
            builder = builder.dedup(Some(key));
        }
        if let Some(language) = &self.language {
            builder = builder.report_language(Language::from_code(language));
        }
        if let Some(path) = &self.registry {
            builder = builder.registry_path(path);
        }
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }

        builder.with_env(&ProcessEnv).build()
    }
}

/// Progress messages on stderr
struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn notify(&self, level: ProgressLevel, message: &str) {
        let marker = match level {
            ProgressLevel::Info => "…",
            ProgressLevel::Success => "✔",
            ProgressLevel::Warning => "⚠",
        };
        eprintln!("{marker} {message}");
    }
}

/// Run one request and print it; returns whether a report was produced
async fn analyze(pipeline: &BriefPipeline, query: &TickerQuery, show_snippets: bool) -> bool {
    match pipeline.run(query, &ConsoleProgress).await {
        BriefOutcome::NoData { identity } => {
            eprintln!("✘ No news data found for {identity}; nothing to analyze.");
            false
        }
        BriefOutcome::Completed {
            identity,
            snippets,
            report,
        } => {
            if show_snippets {
                eprintln!("\n── News for {identity} ({} items) ──", snippets.len());
                eprintln!("{}\n", snippets.render_dump());
            }

            match &report.kind {
                ReportKind::Failed => {
                    eprintln!("✘ {}", report.text);
                    false
                }
                ReportKind::InsufficientData => {
                    println!("{}", report.text);
                    false
                }
                ReportKind::Generated { model } => {
                    info!(model = %model, "Report complete");
                    println!("\n{}\n", report.text);
                    true
                }
            }
        }
    }
}

/// Parse a REPL line of the form `<ticker> [market]`
fn parse_line(line: &str, default_market: Market) -> ticker_brief::Result<TickerQuery> {
    let mut parts = line.split_whitespace();
    let ticker = parts.next().unwrap_or_default();
    let market = match parts.next() {
        Some(market) => market.parse()?,
        None => default_market,
    };
    TickerQuery::new(ticker, market)
}

async fn repl(pipeline: &BriefPipeline, args: &Args) -> io::Result<()> {
    eprintln!("ticker-brief: enter \"<ticker> [tw|us]\", /exit to quit");
    let stdin = io::stdin();

    loop {
        eprint!("> ");
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            eprintln!();
            break;
        }

        let line = line.trim();
        match line {
            "" => continue,
            "/exit" | "/quit" => break,
            "/help" => {
                eprintln!("Examples: 2330 | 2330 tw | NVDA us | /exit");
                continue;
            }
            _ => {}
        }

        match parse_line(line, args.market) {
            Ok(query) => {
                analyze(pipeline, &query, args.show_snippets).await;
            }
            Err(e) => eprintln!("✘ {e}"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    brief_utils::init_tracing();

    let args = Args::parse();

    let pipeline = match args.to_config().and_then(|config| BriefPipeline::from_config(&config)) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("✘ {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let Some(ticker) = &args.ticker else {
        repl(&pipeline, &args).await?;
        return Ok(ExitCode::SUCCESS);
    };

    let query = match TickerQuery::new(ticker.as_str(), args.market) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("✘ {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if analyze(&pipeline, &query, args.show_snippets).await {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
