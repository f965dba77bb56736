//! Weekly digest: print the analysis context and ask the assistant about it
//!
//! Needs the `DB_*` and `GEMINI_API_KEY` variables (or a `.env` file).
//! Set `RUST_LOG=salescope=debug` to see cache and summarizer logs.

use salescope::client::{Assistant, DashboardConfig};
use salescope::AnalysisPeriod;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = DashboardConfig::from_env()?;
    let mut assistant = Assistant::from_config(&config)?;

    let Some(full_range) = assistant.default_period().await? else {
        println!("No completed sales found.");
        return Ok(());
    };

    // Last seven days of data
    let start = (full_range.end() - chrono::Duration::days(6)).max(full_range.start());
    let period = AnalysisPeriod::new(start, full_range.end())?;

    let context = assistant.context(&period).await?;
    println!("{}", serde_json::to_string_pretty(&context.to_display_document())?);

    let response = assistant
        .ask(
            "Summarize this week's performance and name the three most urgent actions.",
            &period,
        )
        .await?;
    println!("\n{}", response.with_references());

    let follow_up = assistant
        .ask("Which channel should we push next week, and why?", &period)
        .await?;
    println!("\n{}", follow_up.with_references());

    Ok(())
}
