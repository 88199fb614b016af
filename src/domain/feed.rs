use serde::{Deserialize, Serialize};

use crate::domain::Article;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub id: String,
    pub name: Option<String>,
    pub url: String,
}

impl Feed {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            url: url.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// A feed together with a short sample of its most recent articles.
///
/// This is the unit the ranking engine consumes; the sample is small
/// (a handful of items) and may be empty.
#[derive(Debug, Clone)]
pub struct FeedSample {
    pub feed: Feed,
    pub recent: Vec<Article>,
}

impl FeedSample {
    pub fn new(feed: Feed, recent: Vec<Article>) -> Self {
        Self { feed, recent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_url() {
        let mut feed = Feed::new("f-1", "https://example.com/feed.xml");
        assert_eq!(feed.display_name(), "https://example.com/feed.xml");
        feed.name = Some("Example".into());
        assert_eq!(feed.display_name(), "Example");
    }
}
