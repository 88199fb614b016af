//! # Estuary
//!
//! A client for browsing ranked, aggregated article feeds.
//!
//! ## Architecture
//!
//! Estuary is the headless core of a feed-reading client:
//!
//! ```text
//! Source → Pager ──────────→ list views (home, history, saved, feed)
//! Source → Overview/Ranking → feed overview
//! ```
//!
//! - [`source`]: the aggregation backend contract and its HTTP client
//! - [`pager`]: incremental list loading with single-flight fetches,
//!   driven by a throttled near-end scroll signal
//! - [`ranking`]: orders feeds by recency and publishing cadence
//! - [`store`]: persisted per-feed last-read instants
//!
//! Rendering, theming, authentication, and feed management live outside
//! this crate; it only needs a windowed fetch on one side and an ordered,
//! appendable list on the other.

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all
/// components: HTTP source, last-read store, overview loader.
pub mod app;

/// Pure date arithmetic used by the ranking engine.
pub mod clock;

/// Command-line interface using clap.
///
/// Defines the CLI structure and subcommands:
/// - `feeds` - List subscribed feeds, best first
/// - `articles [--feed ID] [--pages N]` - Browse articles
/// - `history` / `saved` - Browse reading history and saved articles
/// - `read <id>` / `save <id>` - Update an article's read/saved state
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/estuary/config.toml`: API endpoint, ranking
/// policy and constants, pager tuning.
pub mod config;

/// Core domain models.
///
/// - [`Article`](domain::Article): one aggregated article
/// - [`Feed`](domain::Feed): a subscribed feed
/// - [`FeedSample`](domain::FeedSample): a feed with its recent articles
pub mod domain;

/// Feed-overview assembly: sampled feeds, ranked, with unread flags.
pub mod overview;

/// Incremental list loading with scroll-driven backpressure.
///
/// - [`Pager`](pager::Pager): the pagination controller
/// - [`watch_near_end`](pager::trigger::watch_near_end): throttled
///   near-end sampling with an explicit subscription handle
pub mod pager;

/// Orders a user's subscribed feeds by recency and publishing cadence.
pub mod ranking;

/// The aggregation backend contract.
///
/// - [`ArticleSource`](source::ArticleSource): async trait for pages,
///   feeds, and the read/saved mutation sink
/// - [`HttpArticleSource`](source::HttpArticleSource): reqwest-based
///   implementation
pub mod source;

/// Persisted per-feed last-read instants.
///
/// - [`LastReadStore`](store::LastReadStore): trait defining the store
/// - [`SqliteLastReadStore`](store::SqliteLastReadStore): SQLite
///   implementation with a write-through cache
pub mod store;
