//! Notion page creation for fetched articles.
//!
//! Every article becomes one page in the configured database. The client
//! reuses a single connection pool with the authorization and version
//! headers set once at construction.
//!
//! # Payload profiles
//!
//! - [`SummaryMode::Property`]: the summary is a rich-text property
//! - [`SummaryMode::Block`]: the summary becomes paragraph blocks in the page body
//!
//! Title, url, source and the optional publication date are always
//! properties.

use crate::config::{NotionConfig, SummaryMode};
use crate::error::{Error, Result};
use crate::models::{Article, UploadResult};
use crate::utils::{chunk_chars, normalize_published_at, truncate_for_log};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Maximum characters Notion accepts in one rich-text `content` string.
const RICH_TEXT_LIMIT: usize = 2000;

/// Client for the Notion pages API.
pub struct NotionClient {
    client: Client,
    config: NotionConfig,
    pages_url: String,
}

impl NotionClient {
    /// Build a client for `config` whose requests time out after `timeout`.
    pub fn new(config: NotionConfig, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| Error::InvalidHeader(format!("Authorization: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "notion-version",
            HeaderValue::from_str(&config.version)
                .map_err(|e| Error::InvalidHeader(format!("Notion-Version: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        let pages_url = format!("{}/pages", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            config,
            pages_url,
        })
    }

    /// Create one page per article, in order.
    ///
    /// Articles without a title or url are counted as skipped. The first
    /// failed request aborts the whole upload; pages created before it are
    /// left in place.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] on connection failure or timeout
    /// - [`Error::NotionApi`] on a non-2xx response
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub async fn add_articles(&self, articles: &[Article]) -> Result<UploadResult> {
        let mut result = UploadResult::default();

        for article in articles {
            if !article.is_complete() {
                result.skipped += 1;
                debug!(source = %article.source, "Skipping article without title or url");
                continue;
            }

            let payload = build_payload(&self.config, article);
            if let Err(e) = self.create_page(&payload).await {
                error!(created = result.created, error = %e, "Upload aborted");
                return Err(e);
            }
            result.created += 1;
        }

        info!(
            created = result.created,
            skipped = result.skipped,
            "Finished uploading articles"
        );
        Ok(result)
    }

    async fn create_page(&self, payload: &Value) -> Result<()> {
        let response = self.client.post(&self.pages_url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(status = status.as_u16(), error = %e, "Failed to read Notion error body");
                    String::new()
                }
            };
            warn!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "Notion rejected page");
            return Err(Error::NotionApi {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Build the create-page request body for `article`.
pub fn build_payload(config: &NotionConfig, article: &Article) -> Value {
    let props = &config.properties;
    let mut properties = Map::new();

    properties.insert(
        props.title.clone(),
        json!({ "title": rich_text(&article.title) }),
    );
    properties.insert(props.url.clone(), json!({ "url": article.url }));
    properties.insert(
        props.source.clone(),
        json!({ "select": { "name": article.source } }),
    );

    if let Some(published_at) = non_empty(&article.published_at) {
        properties.insert(
            props.published_at.clone(),
            json!({ "date": { "start": normalize_published_at(published_at) } }),
        );
    }

    let summary = non_empty(&article.summary);
    if let (Some(summary), SummaryMode::Property) = (summary, config.summary_mode) {
        properties.insert(
            props.summary.clone(),
            json!({ "rich_text": rich_text(summary) }),
        );
    }

    let mut payload = json!({
        "parent": { "database_id": config.database_id },
        "properties": properties,
    });

    if let (Some(summary), SummaryMode::Block) = (summary, config.summary_mode) {
        let children: Vec<Value> = chunk_chars(summary, RICH_TEXT_LIMIT)
            .into_iter()
            .map(|chunk| {
                json!({
                    "object": "block",
                    "type": "paragraph",
                    "paragraph": { "rich_text": [text_object(chunk)] }
                })
            })
            .collect();
        payload["children"] = Value::Array(children);
    }

    payload
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn rich_text(content: &str) -> Value {
    Value::Array(
        chunk_chars(content, RICH_TEXT_LIMIT)
            .into_iter()
            .map(text_object)
            .collect(),
    )
}

fn text_object(content: String) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}
