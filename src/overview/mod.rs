//! Assembles the feed-overview view: every subscribed feed, ranked, with
//! an unread indicator driven by the last-read store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::app::Result;
use crate::clock;
use crate::domain::{Article, Feed, FeedSample};
use crate::pager::PageWindow;
use crate::ranking::{self, RankingConfig};
use crate::source::{ArticleSource, PageScope};
use crate::store::LastReadStore;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    /// How many recent articles to sample per feed for ranking.
    pub sample_size: usize,
    /// Concurrent sample fetches.
    pub workers: usize,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            sample_size: 5,
            workers: 10,
        }
    }
}

/// One row of the overview: a ranked feed with its sample and unread flag.
#[derive(Debug, Clone)]
pub struct OverviewEntry {
    pub feed: Feed,
    pub recent: Vec<Article>,
    pub score: f64,
    /// The feed's latest non-future publication instant; the epoch
    /// sentinel when the sample had no usable dates.
    pub latest: DateTime<Utc>,
    /// True when the feed published after the user last read it.
    pub has_unread: bool,
}

pub struct OverviewLoader {
    source: Arc<dyn ArticleSource>,
    last_read: Arc<dyn LastReadStore>,
    ranking: RankingConfig,
    sample_size: usize,
    semaphore: Arc<Semaphore>,
}

impl OverviewLoader {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        last_read: Arc<dyn LastReadStore>,
        ranking: RankingConfig,
        config: &OverviewConfig,
    ) -> Self {
        Self {
            source,
            last_read,
            ranking,
            sample_size: config.sample_size,
            semaphore: Arc::new(Semaphore::new(config.workers)),
        }
    }

    /// Fetches every feed plus a small recent sample per feed, ranks them,
    /// and attaches unread flags.
    ///
    /// A feed whose sample fetch fails is kept with an empty sample (it
    /// ranks as maximally old); only the feed listing itself is fatal.
    pub async fn load(&self, now: DateTime<Utc>) -> Result<Vec<OverviewEntry>> {
        let feeds = self.source.fetch_feeds().await?;

        let mut handles = Vec::new();
        for feed in feeds {
            let source = self.source.clone();
            let semaphore = self.semaphore.clone();
            let window = PageWindow::first(self.sample_size);

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("Semaphore closed");

                let recent = match source
                    .fetch_page(&PageScope::Feed(feed.id.clone()), window)
                    .await
                {
                    Ok(items) => items,
                    Err(e) => {
                        tracing::warn!("Sampling {} failed: {}", feed.display_name(), e);
                        Vec::new()
                    }
                };
                FeedSample::new(feed, recent)
            }));
        }

        let mut samples = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        let ranked = ranking::rank(samples, now, &self.ranking);

        ranked
            .into_iter()
            .map(|scored| {
                let FeedSample { feed, recent } = scored.sample;
                let has_unread = match self.last_read.get(&feed.id)? {
                    Some(at) => scored.latest > at,
                    // Never opened: anything with a real date counts as new.
                    None => scored.latest > clock::epoch(),
                };
                Ok(OverviewEntry {
                    feed,
                    recent,
                    score: scored.score,
                    latest: scored.latest,
                    has_unread,
                })
            })
            .collect()
    }

    /// Stamps the feed as read now; write-through to the store.
    pub fn mark_feed_read(&self, feed_id: &str, at: DateTime<Utc>) -> Result<()> {
        self.last_read.set(feed_id, at)
    }
}
