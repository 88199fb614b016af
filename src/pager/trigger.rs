//! Turns a noisy scroll signal into gated continuation fetches.
//!
//! The host supplies an opaque boolean predicate ("the viewport is near
//! the end of the rendered content"). It is sampled on a throttled
//! interval, and only a not-near → near transition fires a fetch; a
//! sustained "near" reading while a fetch is outstanding does nothing.

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::pager::Pager;

/// How close to the end of content counts as "near".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NearEndThreshold {
    /// A fraction of the viewport height.
    ViewportFraction(f64),
    /// A fixed pixel margin.
    Pixels(f64),
}

impl Default for NearEndThreshold {
    fn default() -> Self {
        NearEndThreshold::ViewportFraction(0.2)
    }
}

/// A snapshot of the host's scroll state, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top.
    pub offset: f64,
    /// Visible height.
    pub viewport: f64,
    /// Total height of the rendered content.
    pub content_height: f64,
}

impl ScrollMetrics {
    /// The reference near-end predicate: the bottom of the viewport is
    /// within the threshold margin of the end of the content.
    pub fn near_end(&self, threshold: NearEndThreshold) -> bool {
        let position = self.offset + self.viewport;
        let margin = match threshold {
            NearEndThreshold::ViewportFraction(fraction) => self.viewport * fraction,
            NearEndThreshold::Pixels(px) => px,
        };
        position >= self.content_height - margin
    }
}

/// Subscription handle for a near-end watcher.
///
/// The owning view calls [`dispose`](NearEndWatch::dispose) on teardown;
/// nothing is stopped implicitly. Disposing stops future sampling only —
/// a fetch already in flight runs to completion.
pub struct NearEndWatch {
    task: JoinHandle<()>,
}

impl NearEndWatch {
    pub fn dispose(self) {
        self.task.abort();
    }
}

/// Samples `near_end` on the pager's configured interval and drives the
/// pager.
///
/// The predicate is consulted only when the list is non-empty and the
/// pager is idle; missed ticks are skipped, never replayed in a burst.
pub fn watch_near_end<P>(pager: Pager, near_end: P) -> NearEndWatch
where
    P: Fn() -> bool + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval(pager.sample_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut was_near = false;

        loop {
            ticker.tick().await;

            if pager.is_empty() || pager.is_busy() {
                continue;
            }

            let near = near_end();
            let rising = near && !was_near;
            was_near = near;

            if rising {
                // Detached so that disposing the watcher never cancels an
                // in-flight fetch; the pager's own gate keeps this single.
                let pager = pager.clone();
                tokio::spawn(async move {
                    pager.load_more().await;
                });
            }
        }
    });

    NearEndWatch { task }
}
