//! Error types shared by configuration loading, fetching and uploading.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("NOTION_API_KEY and NOTION_DATABASE_ID must be set.")]
    MissingCredentials,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source '{name}' returned HTTP {status}: {body}")]
    SourceStatus {
        name: String,
        status: u16,
        body: String,
    },

    #[error("Items path '{path}' of source '{name}' is not a list.")]
    ItemsNotList { name: String, path: String },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Notion API error ({status}): {body}")]
    NotionApi { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, Error>;
