pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Article, Feed};
use crate::pager::{PageFetch, PageWindow, Pager, PagerConfig};

pub use http::HttpArticleSource;

/// Which result set a page window addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageScope {
    /// Aggregated articles across every subscribed feed.
    Home,
    /// Articles the user has read.
    History,
    /// Articles the user has saved for later.
    Saved,
    /// One feed's articles, newest first.
    Feed(String),
}

/// The aggregation backend: article pages, feed listings, and the
/// fire-and-forget mutation sink for read/saved state.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_feeds(&self) -> Result<Vec<Feed>>;
    async fn fetch_feed(&self, feed_id: &str) -> Result<Feed>;
    async fn fetch_page(&self, scope: &PageScope, window: PageWindow) -> Result<Vec<Article>>;
    async fn mark_read(&self, article_id: &str) -> Result<()>;
    async fn set_saved(&self, article_id: &str, saved: bool) -> Result<()>;
}

/// Binds a source and a scope into the pager's fetch capability.
pub struct ScopedPageFetch {
    source: Arc<dyn ArticleSource>,
    scope: PageScope,
}

impl ScopedPageFetch {
    pub fn new(source: Arc<dyn ArticleSource>, scope: PageScope) -> Self {
        Self { source, scope }
    }
}

#[async_trait]
impl PageFetch for ScopedPageFetch {
    async fn fetch_page(&self, window: PageWindow) -> Result<Vec<Article>> {
        self.source.fetch_page(&self.scope, window).await
    }
}

/// A pager over one scope of the source. Every list view in the client is
/// this call with a different scope.
pub fn pager_for(source: Arc<dyn ArticleSource>, scope: PageScope, config: &PagerConfig) -> Pager {
    Pager::new(Arc::new(ScopedPageFetch::new(source, scope)), config)
}
