//! Command-line interface definitions for News to Notion.
//!
//! The only option is the configuration file path, which can also be given
//! through the `NEWS_SOURCES_FILE` environment variable.

use clap::Parser;
use std::path::PathBuf;

/// Fetch news from APIs and store them in Notion.
///
/// # Examples
///
/// ```sh
/// # Use config/news_sources.json (or $NEWS_SOURCES_FILE)
/// news_to_notion
///
/// # Explicit configuration file
/// news_to_notion --config ./my_sources.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the news sources JSON file
    #[arg(
        short,
        long,
        env = "NEWS_SOURCES_FILE",
        default_value = "config/news_sources.json"
    )]
    pub config: PathBuf,
}
