//! Configuration loading for news sources and the Notion sink.
//!
//! The configuration is a JSON file:
//!
//! ```json
//! {
//!   "timeout_seconds": 15,
//!   "sources": [
//!     {
//!       "name": "NewsAPI",
//!       "base_url": "https://newsapi.org/v2/top-headlines",
//!       "params": { "country": "us" },
//!       "api_key_env": "NEWSAPI_KEY",
//!       "api_key_param": "apiKey"
//!     }
//!   ],
//!   "notion": { "properties": { "title": "Name" } }
//! }
//! ```
//!
//! `notion.api_key` and `notion.database_id` always come from the
//! `NOTION_API_KEY` and `NOTION_DATABASE_ID` environment variables, which
//! must both be non-empty.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const NOTION_API_KEY_ENV: &str = "NOTION_API_KEY";
pub const NOTION_DATABASE_ID_ENV: &str = "NOTION_DATABASE_ID";

/// Read access to environment variables.
///
/// [`ProcessEnv`] reads the real process environment; a `HashMap` works as a
/// fixed environment in tests.
pub trait EnvSource {
    /// The raw value of `name`, if set.
    fn var(&self, name: &str) -> Option<String>;

    /// The trimmed value of `name`, or `None` when unset or blank.
    fn non_blank(&self, name: &str) -> Option<String> {
        self.var(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// News providers to fetch, in order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    /// Notion sink settings; every field has a default.
    #[serde(default)]
    pub notion: NotionConfig,
    /// Per-request timeout for every HTTP call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Describes one JSON news API and where its fields live in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub base_url: String,
    /// Static query parameters sent with every request.
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
    #[serde(default = "default_items_path")]
    pub items_path: String,
    #[serde(default = "default_title_path")]
    pub title_path: String,
    #[serde(default = "default_url_path")]
    pub url_path: String,
    #[serde(default = "default_published_at_path")]
    pub published_at_path: String,
    /// `null` in the config file disables summaries for this source.
    #[serde(default = "default_summary_path")]
    pub summary_path: Option<String>,
    /// Environment variable holding the provider API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Query parameter name the key is sent as.
    #[serde(default)]
    pub api_key_param: Option<String>,
    /// Header name the key is sent as.
    #[serde(default)]
    pub api_key_header: Option<String>,
    /// Extra headers: header name -> environment variable name.
    #[serde(default)]
    pub headers_env: BTreeMap<String, String>,
}

/// How the article summary is attached to the created page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
    /// As a rich-text database property.
    #[default]
    Property,
    /// As paragraph blocks in the page body.
    Block,
}

/// Notion property names for the five article fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PropertyNames {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
    pub summary: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            url: "URL".to_string(),
            source: "Source".to_string(),
            published_at: "PublishedAt".to_string(),
            summary: "Summary".to_string(),
        }
    }
}

/// Notion sink settings.
#[derive(Clone, Deserialize)]
pub struct NotionConfig {
    /// Integration token; always taken from `NOTION_API_KEY`.
    #[serde(default, skip_deserializing)]
    pub api_key: String,
    /// Target database; always taken from `NOTION_DATABASE_ID`.
    #[serde(default, skip_deserializing)]
    pub database_id: String,
    #[serde(default)]
    pub properties: PropertyNames,
    #[serde(default)]
    pub summary_mode: SummaryMode,
    /// API root, overridable for testing against a local server.
    #[serde(default = "default_notion_base_url")]
    pub base_url: String,
    /// Value of the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub version: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            database_id: String::new(),
            properties: PropertyNames::default(),
            summary_mode: SummaryMode::default(),
            base_url: default_notion_base_url(),
            version: default_notion_version(),
        }
    }
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("api_key", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("properties", &self.properties)
            .field("summary_mode", &self.summary_mode)
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .finish()
    }
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_items_path() -> String {
    "articles".to_string()
}

fn default_title_path() -> String {
    "title".to_string()
}

fn default_url_path() -> String {
    "url".to_string()
}

fn default_published_at_path() -> String {
    "publishedAt".to_string()
}

fn default_summary_path() -> Option<String> {
    Some("description".to_string())
}

fn default_notion_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

impl AppConfig {
    /// Load the configuration file at `path` and fill in Notion credentials
    /// from `env`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigNotFound`] if `path` does not exist
    /// - [`Error::Serialization`] if the file is not valid configuration JSON
    /// - [`Error::MissingCredentials`] if either Notion variable is empty
    /// - [`Error::Config`] if a source `base_url` is not a valid URL
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path, env: &impl EnvSource) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text, env)?;
        info!(
            sources = config.sources.len(),
            timeout_seconds = config.timeout_seconds,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration JSON and apply the environment overrides.
    pub fn from_json(text: &str, env: &impl EnvSource) -> Result<Self> {
        let mut config: AppConfig = serde_json::from_str(text)?;

        config.notion.api_key = env.var(NOTION_API_KEY_ENV).unwrap_or_default();
        config.notion.database_id = env.var(NOTION_DATABASE_ID_ENV).unwrap_or_default();
        if config.notion.api_key.is_empty() || config.notion.database_id.is_empty() {
            return Err(Error::MissingCredentials);
        }

        config.validate()?;
        debug!(?config, "Parsed configuration");
        Ok(config)
    }

    /// Timeout applied to every outbound request.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        for source in &self.sources {
            Url::parse(&source.base_url).map_err(|e| {
                Error::Config(format!(
                    "source '{}' has invalid base_url '{}': {}",
                    source.name, source.base_url, e
                ))
            })?;
        }
        Url::parse(&self.notion.base_url).map_err(|e| {
            Error::Config(format!(
                "notion base_url '{}' is invalid: {}",
                self.notion.base_url, e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> HashMap<String, String> {
        HashMap::from([
            (NOTION_API_KEY_ENV.to_string(), "secret_token".to_string()),
            (NOTION_DATABASE_ID_ENV.to_string(), "db123".to_string()),
        ])
    }

    const MINIMAL: &str = r#"{
        "sources": [{"name": "NewsAPI", "base_url": "https://newsapi.org/v2/top-headlines"}],
        "notion": {}
    }"#;

    #[test]
    fn test_source_defaults() {
        let config = AppConfig::from_json(MINIMAL, &env()).unwrap();
        assert_eq!(config.timeout_seconds, 15);
        let source = &config.sources[0];
        assert_eq!(source.items_path, "articles");
        assert_eq!(source.title_path, "title");
        assert_eq!(source.url_path, "url");
        assert_eq!(source.published_at_path, "publishedAt");
        assert_eq!(source.summary_path.as_deref(), Some("description"));
        assert!(source.params.is_empty());
        assert!(source.headers_env.is_empty());
        assert!(source.api_key_env.is_none());
    }

    #[test]
    fn test_notion_defaults_and_env_override() {
        let config = AppConfig::from_json(MINIMAL, &env()).unwrap();
        assert_eq!(config.notion.api_key, "secret_token");
        assert_eq!(config.notion.database_id, "db123");
        assert_eq!(config.notion.properties, PropertyNames::default());
        assert_eq!(config.notion.summary_mode, SummaryMode::Property);
        assert_eq!(config.notion.base_url, "https://api.notion.com/v1");
        assert_eq!(config.notion.version, "2022-06-28");
    }

    #[test]
    fn test_notion_section_is_optional() {
        let config = AppConfig::from_json(r#"{"sources": []}"#, &env()).unwrap();
        assert!(config.sources.is_empty());
        assert_eq!(config.notion.api_key, "secret_token");
        assert_eq!(config.notion.database_id, "db123");
        assert_eq!(config.notion.properties, PropertyNames::default());
        assert_eq!(config.notion.summary_mode, SummaryMode::Property);
        assert_eq!(config.notion.base_url, "https://api.notion.com/v1");
        assert_eq!(config.notion.version, "2022-06-28");

        let err = AppConfig::from_json("{}", &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));
    }

    #[test]
    fn test_file_credentials_are_ignored() {
        let text = r#"{"notion": {"api_key": "from-file", "database_id": "from-file"}}"#;
        let config = AppConfig::from_json(text, &env()).unwrap();
        assert_eq!(config.notion.api_key, "secret_token");
        assert_eq!(config.notion.database_id, "db123");

        let err = AppConfig::from_json(text, &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));
    }

    #[test]
    fn test_missing_or_empty_credentials() {
        let mut partial = env();
        partial.insert(NOTION_DATABASE_ID_ENV.to_string(), String::new());
        let err = AppConfig::from_json(MINIMAL, &partial).unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));

        partial.remove(NOTION_DATABASE_ID_ENV);
        let err = AppConfig::from_json(MINIMAL, &partial).unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));
    }

    #[test]
    fn test_full_source_and_notion_overrides() {
        let text = r#"{
            "timeout_seconds": 5,
            "sources": [{
                "name": "Custom",
                "base_url": "https://api.example.com/news",
                "params": {"country": "kr", "pageSize": 20},
                "items_path": "data.items",
                "title_path": "headline",
                "url_path": "link.href",
                "published_at_path": "pubDate",
                "summary_path": null,
                "api_key_env": "CUSTOM_KEY",
                "api_key_header": "X-Api-Key",
                "headers_env": {"X-Client-Id": "CUSTOM_CLIENT_ID"}
            }],
            "notion": {
                "properties": {"title": "Name", "published_at": "Date"},
                "summary_mode": "block"
            }
        }"#;
        let config = AppConfig::from_json(text, &env()).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));

        let source = &config.sources[0];
        assert_eq!(source.items_path, "data.items");
        assert_eq!(source.summary_path, None);
        assert_eq!(source.params["pageSize"], serde_json::json!(20));
        assert_eq!(source.api_key_header.as_deref(), Some("X-Api-Key"));
        assert_eq!(source.headers_env["X-Client-Id"], "CUSTOM_CLIENT_ID");

        let props = &config.notion.properties;
        assert_eq!(props.title, "Name");
        assert_eq!(props.published_at, "Date");
        assert_eq!(props.url, "URL");
        assert_eq!(config.notion.summary_mode, SummaryMode::Block);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let text = r#"{"sources": [{"name": "Bad", "base_url": "not a url"}], "notion": {}}"#;
        let err = AppConfig::from_json(text, &env()).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("Bad")));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load(Path::new("config/does_not_exist.json"), &env()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "news_to_notion_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, MINIMAL).unwrap();
        let config = AppConfig::load(&path, &env()).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].name, "NewsAPI");
    }

    #[test]
    fn test_env_non_blank() {
        let env = HashMap::from([
            ("SET".to_string(), "  value ".to_string()),
            ("BLANK".to_string(), "   ".to_string()),
        ]);
        assert_eq!(env.non_blank("SET").as_deref(), Some("value"));
        assert_eq!(env.non_blank("BLANK"), None);
        assert_eq!(env.non_blank("UNSET"), None);
    }

    #[test]
    fn test_notion_debug_redacts_key() {
        let config = AppConfig::from_json(MINIMAL, &env()).unwrap();
        let debug = format!("{:?}", config.notion);
        assert!(!debug.contains("secret_token"));
        assert!(debug.contains("<redacted>"));
    }
}
