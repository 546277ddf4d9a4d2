//! Review Metrics command line entry point

use chrono::Utc;
use common::{Config, OutputFormat};
use github::GitHubClient;
use processor::MetricsCalculator;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod range;
mod report;

const DEFAULT_LOG_FILTER: &str = "cli=info,processor=info,github=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!("📊 Starting Review Metrics for {}/{}", config.owner, config.repo);

    let (from, to) = range::date_range(config.days, Utc::now());

    let client = GitHubClient::new(
        Some(config.github_token.clone()),
        config.api_url.clone(),
        config.per_page,
    );
    client
        .authenticate()
        .await
        .map_err(|e| common::Error::Authentication(e.to_string()))?;

    let calculator = MetricsCalculator::new(client);
    let metrics = calculator
        .calculate(&config.owner, &config.repo, from, to)
        .await?;

    match config.output {
        OutputFormat::Text => print!("{}", report::render_text(&metrics)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
    }

    Ok(())
}

/// Logs go to stderr so stdout only carries the report
fn init_tracing(format: OutputFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        OutputFormat::Json => builder.json().init(),
        OutputFormat::Text => builder.init(),
    }
}
