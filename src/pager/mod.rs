//! Incremental list loading with scroll-driven backpressure.
//!
//! A [`Pager`] turns a windowed fetch capability into an ever-growing
//! ordered list of articles. The initial load replaces the list; every
//! continuation appends one page. At most one fetch is outstanding at any
//! time: overlapping triggers are dropped, never queued. Every list-like
//! view (home, history, saved, single feed) is the same controller
//! parameterized with a different fetch.

pub mod trigger;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::Deserialize;

use crate::app::Result;
use crate::domain::Article;

/// A contiguous half-open range `[from, to)` of an ordinally addressed
/// result set. The only "give me more" addressing scheme the core uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub from: usize,
    pub to: usize,
}

impl PageWindow {
    pub fn first(page_size: usize) -> Self {
        Self {
            from: 0,
            to: page_size,
        }
    }

    /// The window following `loaded` already-held items.
    pub fn next_after(loaded: usize, page_size: usize) -> Self {
        Self {
            from: loaded,
            to: loaded + page_size,
        }
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A bounded, idempotent page fetch. Implementations must not care how
/// often or in which order windows are requested.
#[async_trait]
pub trait PageFetch: Send + Sync {
    async fn fetch_page(&self, window: PageWindow) -> Result<Vec<Article>>;
}

/// Adapts a closure returning a boxed future into a [`PageFetch`].
pub struct FnPageFetch<F>(F);

impl<F> FnPageFetch<F>
where
    F: Fn(PageWindow) -> BoxFuture<'static, Result<Vec<Article>>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> PageFetch for FnPageFetch<F>
where
    F: Fn(PageWindow) -> BoxFuture<'static, Result<Vec<Article>>> + Send + Sync,
{
    async fn fetch_page(&self, window: PageWindow) -> Result<Vec<Article>> {
        (self.0)(window).await
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Items per fetched page.
    pub page_size: usize,
    /// Guard appends with an id set so an overlapping page cannot
    /// introduce duplicates. Off restores blind trust in the data source.
    pub dedupe_appends: bool,
    /// Near-end predicate sampling interval, in milliseconds.
    pub sample_interval_ms: u64,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            dedupe_appends: true,
            sample_interval_ms: 16,
        }
    }
}

/// What a load attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This many items were appended (or loaded initially).
    Loaded(usize),
    /// The source returned an empty page: no more content, not an error.
    EndOfList,
    /// Dropped because another fetch was in flight or the gate failed.
    Skipped,
    /// The fetch failed; the error flag is set and the attempt is retryable.
    Failed,
}

#[derive(Default)]
struct PagerState {
    items: Vec<Article>,
    seen: HashSet<String>,
    loading_initial: bool,
    loading_more: bool,
    in_flight: bool,
    has_error: bool,
}

/// The pagination controller. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Pager {
    fetch: Arc<dyn PageFetch>,
    page_size: usize,
    dedupe: bool,
    sample_interval: Duration,
    state: Arc<Mutex<PagerState>>,
}

impl Pager {
    pub fn new(fetch: Arc<dyn PageFetch>, config: &PagerConfig) -> Self {
        Self {
            fetch,
            page_size: config.page_size,
            dedupe: config.dedupe_appends,
            sample_interval: Duration::from_millis(config.sample_interval_ms),
            state: Arc::new(Mutex::new(PagerState::default())),
        }
    }

    /// How often a near-end watcher samples its predicate.
    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    /// Loads the first window, replacing any current items.
    ///
    /// On failure the list stays empty and the error flag is set; the
    /// loading and in-flight flags clear either way.
    pub async fn load_initial(&self) -> LoadOutcome {
        let window = {
            let mut state = self.state();
            if state.in_flight {
                return LoadOutcome::Skipped;
            }
            state.in_flight = true;
            state.loading_initial = true;
            state.has_error = false;
            PageWindow::first(self.page_size)
        };

        let result = self.fetch.fetch_page(window).await;

        let mut state = self.state();
        state.loading_initial = false;
        state.in_flight = false;
        match result {
            Ok(page) => {
                state.seen = page.iter().map(|a| a.id.clone()).collect();
                let count = page.len();
                state.items = page;
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::warn!("initial page load failed: {e}");
                state.items.clear();
                state.seen.clear();
                state.has_error = true;
                LoadOutcome::Failed
            }
        }
    }

    /// Fetches the window starting at the current list length and appends
    /// the result.
    ///
    /// Skipped unless the list is non-empty and nothing is loading or in
    /// flight; the in-flight flag is taken synchronously before the fetch
    /// starts, so overlapping calls cannot both proceed. A failed fetch
    /// keeps every already-loaded item and stays retryable.
    pub async fn load_more(&self) -> LoadOutcome {
        let window = {
            let mut state = self.state();
            if state.in_flight
                || state.loading_initial
                || state.loading_more
                || state.items.is_empty()
            {
                return LoadOutcome::Skipped;
            }
            state.in_flight = true;
            state.loading_more = true;
            state.has_error = false;
            PageWindow::next_after(state.items.len(), self.page_size)
        };

        tracing::debug!(from = window.from, to = window.to, "loading continuation page");
        let result = self.fetch.fetch_page(window).await;

        let mut state = self.state();
        state.loading_more = false;
        state.in_flight = false;
        match result {
            Ok(page) if page.is_empty() => LoadOutcome::EndOfList,
            Ok(page) => {
                let mut appended = 0;
                for article in page {
                    if self.dedupe && !state.seen.insert(article.id.clone()) {
                        tracing::debug!(id = %article.id, "dropping duplicate from appended page");
                        continue;
                    }
                    state.items.push(article);
                    appended += 1;
                }
                LoadOutcome::Loaded(appended)
            }
            Err(e) => {
                tracing::warn!("continuation page load failed: {e}");
                state.has_error = true;
                LoadOutcome::Failed
            }
        }
    }

    /// Snapshot of the current items, in display order.
    pub fn items(&self) -> Vec<Article> {
        self.state().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    pub fn is_loading_initial(&self) -> bool {
        self.state().loading_initial
    }

    pub fn is_loading_more(&self) -> bool {
        self.state().loading_more
    }

    pub fn has_error(&self) -> bool {
        self.state().has_error
    }

    /// True while any fetch is outstanding or a loading flag is up.
    pub fn is_busy(&self) -> bool {
        let state = self.state();
        state.in_flight || state.loading_initial || state.loading_more
    }

    /// Mirrors a remote mark-as-read: the item keeps its position, nothing
    /// is refetched or reordered. Returns false when the id is not loaded.
    pub fn apply_read(&self, article_id: &str, at: DateTime<Utc>) -> bool {
        let mut state = self.state();
        match state.items.iter_mut().find(|a| a.id == article_id) {
            Some(article) => {
                article.last_read_at = at;
                true
            }
            None => false,
        }
    }

    /// Mirrors a remote saved-flag change, in place.
    pub fn apply_saved(&self, article_id: &str, saved: bool) -> bool {
        let mut state = self.state();
        match state.items.iter_mut().find(|a| a.id == article_id) {
            Some(article) => {
                article.saved = saved;
                true
            }
            None => false,
        }
    }

    fn state(&self) -> MutexGuard<'_, PagerState> {
        self.state.lock().expect("pager state lock poisoned")
    }
}
