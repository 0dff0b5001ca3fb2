//! One complete run: fetch every source, then upload every article.

use crate::config::{AppConfig, EnvSource};
use crate::error::Result;
use crate::fetcher::{NewsFetcher, gather_articles};
use crate::models::UploadResult;
use crate::outputs::notion::NotionClient;
use std::time::Instant;
use tracing::{info, instrument};

/// Fetch all configured sources in order and upload the combined articles.
///
/// Any fetch or upload failure ends the run with that error.
#[instrument(level = "info", skip_all)]
pub async fn run<E: EnvSource>(config: &AppConfig, env: E) -> Result<UploadResult> {
    let t0 = Instant::now();

    let fetcher = NewsFetcher::new(config.timeout(), env)?;
    let articles = gather_articles(&fetcher, &config.sources).await?;

    let notion = NotionClient::new(config.notion.clone(), config.timeout())?;
    let result = notion.add_articles(&articles).await?;

    info!(
        created = result.created,
        skipped = result.skipped,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Run complete"
    );
    Ok(result)
}
