//! List the Gemini models available to an API key and show which one the
//! default selector would pick.
//!
//! ```bash
//! export GEMINI_API_KEY="..."
//! cargo run --example gemini_models -p brief-llm
//! ```

use brief_llm::providers::GeminiProvider;
use brief_llm::{LLMProvider, ModelSelector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let provider = GeminiProvider::from_env()?;

    let models = provider.list_models().await?;
    println!("{} models available:", models.len());
    for model in &models {
        let marker = if model.supports_generation { "gen" } else { "   " };
        println!(
            "  [{marker}] {} {}",
            model.id,
            model.display_name.as_deref().unwrap_or("")
        );
    }

    match ModelSelector::default().select(&models) {
        Ok(model) => println!("\nSelected: {}", model.id),
        Err(e) => println!("\nNo selection: {e}"),
    }

    Ok(())
}
