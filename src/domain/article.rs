use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock;

/// How an article entered the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Pulled from an RSS/Atom feed.
    #[serde(rename = "rss", alias = "syndicated")]
    Syndicated,
    /// Extracted from a web page by the backend scraper.
    #[serde(rename = "scraped")]
    Scraped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source_url: String,
    pub source_kind: SourceKind,
    pub tags: Vec<String>,
    /// Publication instant. `None` when the backend had no parsable date.
    pub published_at: Option<DateTime<Utc>>,
    /// When the user last read this article. The epoch sentinel means never.
    pub last_read_at: DateTime<Utc>,
    pub saved: bool,
}

impl Article {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            source_url: String::new(),
            source_kind: SourceKind::Syndicated,
            tags: Vec::new(),
            published_at: None,
            last_read_at: clock::epoch(),
            saved: false,
        }
    }

    pub fn is_read(&self) -> bool {
        self.last_read_at > clock::epoch()
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}
