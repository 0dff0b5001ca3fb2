//! Data models for fetched articles and upload outcomes.
//!
//! - [`Article`]: one normalized record extracted from a news source
//! - [`UploadResult`]: created/skipped counters for a single run

use std::fmt;

/// A news article extracted from a source response.
///
/// `title` and `url` are never absent: missing values are stored as empty
/// strings and such records are filtered out before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// The article headline.
    pub title: String,
    /// Link to the full article.
    pub url: String,
    /// Name of the configured source the article came from.
    pub source: String,
    /// Publication timestamp exactly as the provider returned it.
    pub published_at: Option<String>,
    /// Plain-text summary with HTML tags stripped.
    pub summary: Option<String>,
}

impl Article {
    /// An article is usable only when it has both a title and a url.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty()
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadResult {
    /// Pages created in Notion.
    pub created: usize,
    /// Articles skipped because they lacked a title or url.
    pub skipped: usize,
}

impl fmt::Display for UploadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Uploaded {} articles to Notion. Skipped {} articles.",
            self.created, self.skipped
        )
    }
}
