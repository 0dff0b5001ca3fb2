//! # News to Notion
//!
//! Fetches news articles from JSON HTTP APIs described in a configuration
//! file and stores each one as a page in a Notion database.
//!
//! ## Usage
//!
//! ```sh
//! NOTION_API_KEY=secret_xxx NOTION_DATABASE_ID=abc123 \
//!     news_to_notion --config config/news_sources.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: Load sources and Notion settings; credentials come
//!    from the environment
//! 2. **Fetching**: One GET per source; items and fields are located with
//!    dotted paths so any JSON response shape can be described
//! 3. **Uploading**: One page per article, stopping at the first failure
//!
//! Everything runs sequentially. Logs go to stderr; stdout only carries the
//! final summary line.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod path;
mod pipeline;
mod utils;

use cli::Cli;
use config::{AppConfig, ProcessEnv};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("news_to_notion starting up");

    let args = Cli::parse();
    debug!(config = %args.config.display(), "Parsed CLI arguments");

    let app_config = AppConfig::load(&args.config, &ProcessEnv)
        .inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    let result = pipeline::run(&app_config, ProcessEnv)
        .await
        .inspect_err(|e| error!(error = %e, "Run failed"))?;

    println!("{result}");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        created = result.created,
        skipped = result.skipped,
        "Execution complete"
    );

    Ok(())
}
