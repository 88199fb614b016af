use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use html_escape::decode_html_entities;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::app::{EstuaryError, Result};
use crate::clock;
use crate::domain::{Article, Feed, SourceKind};
use crate::pager::PageWindow;
use crate::source::{ArticleSource, PageScope};

/// reqwest-backed client for the aggregation API.
pub struct HttpArticleSource {
    client: Client,
    base_url: Url,
}

impl HttpArticleSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("estuary/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EstuaryError::Config(format!("API base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }
}

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn fetch_feeds(&self) -> Result<Vec<Feed>> {
        let url = self.endpoint(&["feeds"])?;
        let feeds: Vec<FeedDto> = self.get_json(url).await?;
        Ok(feeds.into_iter().map(FeedDto::into_feed).collect())
    }

    async fn fetch_feed(&self, feed_id: &str) -> Result<Feed> {
        let url = self.endpoint(&["feeds", feed_id])?;
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(EstuaryError::FeedNotFound(feed_id.to_string()));
        }
        let feed: FeedDto = response.error_for_status()?.json().await?;
        Ok(feed.into_feed())
    }

    async fn fetch_page(&self, scope: &PageScope, window: PageWindow) -> Result<Vec<Article>> {
        let mut url = match scope {
            PageScope::Home => self.endpoint(&["articles", "feed"])?,
            PageScope::History => self.endpoint(&["articles", "history"])?,
            PageScope::Saved => self.endpoint(&["articles", "saved"])?,
            PageScope::Feed(id) => self.endpoint(&["articles", "feed", id])?,
        };
        url.query_pairs_mut()
            .append_pair("from", &window.from.to_string())
            .append_pair("to", &window.to.to_string());

        let articles: Vec<ArticleDto> = self.get_json(url).await?;
        Ok(articles.into_iter().map(ArticleDto::into_article).collect())
    }

    async fn mark_read(&self, article_id: &str) -> Result<()> {
        let url = self.endpoint(&["articles", article_id, "read"])?;
        self.client.patch(url).send().await?.error_for_status()?;
        Ok(())
    }

    async fn set_saved(&self, article_id: &str, saved: bool) -> Result<()> {
        let mut url = self.endpoint(&["articles", article_id, "saved"])?;
        url.query_pairs_mut()
            .append_pair("saved", if saved { "true" } else { "false" });
        self.client.patch(url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedDto {
    id: String,
    name: Option<String>,
    #[serde(default)]
    url: String,
}

impl FeedDto {
    fn into_feed(self) -> Feed {
        Feed {
            id: self.id,
            name: self
                .name
                .map(|n| decode_html_entities(&n).to_string())
                .filter(|n| !n.is_empty()),
            url: self.url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleDto {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    source_url: String,
    source_type: SourceKind,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    last_read_at: Option<String>,
    #[serde(default)]
    save: bool,
}

impl ArticleDto {
    fn into_article(self) -> Article {
        let published_at = self.published_at.as_deref().and_then(parse_timestamp);
        if published_at.is_none() {
            if let Some(raw) = &self.published_at {
                tracing::debug!(id = %self.id, raw = %raw, "dropping unparsable publication date");
            }
        }

        Article {
            id: self.id,
            title: decode_html_entities(&self.title).to_string(),
            description: decode_html_entities(&self.description).to_string(),
            source_url: self.source_url,
            source_kind: self.source_type,
            tags: self.tags,
            published_at,
            last_read_at: self
                .last_read_at
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(clock::epoch),
            saved: self.save,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| s.parse::<DateTime<Utc>>().ok())
}
