//! Fetch articles from configured JSON news APIs.
//!
//! Each [`SourceConfig`] describes one endpoint: its URL, static query
//! parameters, how to authenticate, and dotted paths that locate the item
//! list and each item's fields. The fetcher makes one GET per source and
//! maps the response into [`Article`]s using [`crate::path`].
//!
//! Sources are fetched one after another; the first failure ends the run.

use crate::config::{EnvSource, SourceConfig};
use crate::error::{Error, Result};
use crate::models::Article;
use crate::path::{resolve, resolve_text, scalar_to_text};
use crate::utils::{strip_html, truncate_for_log};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// HTTP client for news sources.
///
/// Per-source API keys and extra headers are looked up in `env` at request
/// time, so a key rotated between runs is picked up without a config change.
pub struct NewsFetcher<E> {
    client: Client,
    env: E,
}

impl<E: EnvSource> NewsFetcher<E> {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration, env: E) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, env })
    }

    /// Fetch one source and return its complete articles.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] on connection failure, timeout or an unreadable body
    /// - [`Error::SourceStatus`] on a non-2xx response
    /// - [`Error::Serialization`] if the body is not JSON
    /// - [`Error::ItemsNotList`] if the items path points at a non-list
    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    pub async fn fetch(&self, source: &SourceConfig) -> Result<Vec<Article>> {
        let t0 = Instant::now();
        let (params, headers) = self.build_request(source)?;

        let response = self
            .client
            .get(&source.base_url)
            .query(&params)
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "Source returned an error status");
            return Err(Error::SourceStatus {
                name: source.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body)?;
        let articles = parse_items(&payload, source)?;
        info!(
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched source"
        );
        Ok(articles)
    }

    /// Query parameters and headers for one request to `source`.
    fn build_request(&self, source: &SourceConfig) -> Result<(Vec<(String, String)>, HeaderMap)> {
        let mut params = query_pairs(source);
        let mut headers = HeaderMap::new();

        let api_key = source
            .api_key_env
            .as_deref()
            .and_then(|name| self.env.non_blank(name));

        if let Some(key) = &api_key {
            if let Some(param) = &source.api_key_param {
                params.retain(|(k, _)| k != param);
                params.push((param.clone(), key.clone()));
            }
            if let Some(header) = &source.api_key_header {
                insert_header(&mut headers, header, key)?;
            }
        } else if let Some(name) = &source.api_key_env {
            debug!(env = %name, "API key variable unset; sending request without it");
        }

        for (header, env_name) in &source.headers_env {
            match self.env.non_blank(env_name) {
                Some(value) => insert_header(&mut headers, header, &value)?,
                None => debug!(%header, env = %env_name, "Header variable unset; skipping"),
            }
        }

        Ok((params, headers))
    }
}

/// Flatten static params into query pairs.
///
/// A list becomes one pair per scalar element (`k=a&k=b`). Nulls and
/// nested objects are dropped.
fn query_pairs(source: &SourceConfig) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in &source.params {
        let values: &[Value] = match value {
            Value::Array(items) => items,
            other => std::slice::from_ref(other),
        };
        for value in values {
            match scalar_to_text(value) {
                Some(text) => pairs.push((key.clone(), text)),
                None => debug!(param = %key, "Dropping non-scalar query parameter value"),
            }
        }
    }
    pairs
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| Error::InvalidHeader(format!("value for {name}: {e}")))?;
    headers.insert(name, value);
    Ok(())
}

/// Extract the complete articles from a decoded source response.
///
/// A missing (or `null`) item list yields no articles. Items that are not
/// objects are ignored, and items without a title or url are dropped.
pub fn parse_items(payload: &Value, source: &SourceConfig) -> Result<Vec<Article>> {
    let items = match resolve(payload, &source.items_path) {
        None | Some(Value::Null) => {
            debug!(path = %source.items_path, "Items path not found; no articles");
            return Ok(Vec::new());
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::ItemsNotList {
                name: source.name.clone(),
                path: source.items_path.clone(),
            });
        }
    };

    let total = items.len();
    let articles: Vec<Article> = items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| parse_item(item, source))
        .filter(Article::is_complete)
        .collect();

    if articles.len() < total {
        debug!(
            total,
            kept = articles.len(),
            "Dropped items without a title or url"
        );
    }
    Ok(articles)
}

fn parse_item(item: &Value, source: &SourceConfig) -> Article {
    let summary = source
        .summary_path
        .as_deref()
        .and_then(|path| resolve_text(item, path))
        .map(|s| strip_html(&s));

    Article {
        title: resolve_text(item, &source.title_path).unwrap_or_default(),
        url: resolve_text(item, &source.url_path).unwrap_or_default(),
        source: source.name.clone(),
        published_at: resolve_text(item, &source.published_at_path),
        summary,
    }
}

/// Fetch every source in order and concatenate their articles.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn gather_articles<E: EnvSource>(
    fetcher: &NewsFetcher<E>,
    sources: &[SourceConfig],
) -> Result<Vec<Article>> {
    let mut articles = Vec::new();
    for source in sources {
        articles.extend(fetcher.fetch(source).await?);
    }
    info!(count = articles.len(), "Total articles fetched");
    Ok(articles)
}
