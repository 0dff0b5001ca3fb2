//! Destinations for fetched articles.
//!
//! - [`notion`]: creates one page per article in a Notion database

pub mod notion;
