//! Orders a user's subscribed feeds for the overview page.
//!
//! Scores blend recency with publishing cadence so that a quiet weekly
//! blog is not permanently buried under a wire service posting every hour.
//! Two scoring policies share one interface: an adaptive half-life picked
//! from the feed's cadence (the default), and a fixed half-life with a
//! rarity boost. All tuning constants live in [`RankingConfig`].
//!
//! Ranking is pure: same samples and same `now` produce byte-identical
//! output, and the input is never mutated.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::clock::{self, FutureDatePolicy};
use crate::domain::{Feed, FeedSample};

/// Which scoring policy to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingPolicy {
    /// Short half-life for fast feeds, long half-life for slow feeds.
    #[default]
    Adaptive,
    /// Fixed half-life, multiplied by a boost for infrequent publishers.
    RarityBoost,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdaptiveHalfLife {
    /// Half-life applied to feeds classified as fast, in days.
    pub fast_half_life_days: f64,
    /// Half-life applied to feeds classified as slow, in days.
    pub slow_half_life_days: f64,
    /// Mean inter-item interval at or below which a feed counts as fast.
    /// Feeds with too few dated items to tell are also treated as fast.
    pub fast_threshold_days: f64,
}

impl Default for AdaptiveHalfLife {
    fn default() -> Self {
        Self {
            fast_half_life_days: 2.0,
            slow_half_life_days: 14.0,
            fast_threshold_days: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RarityBoost {
    /// Fixed recency half-life, in days.
    pub half_life_days: f64,
    /// Strength of the rarity multiplier.
    pub alpha: f64,
}

impl Default for RarityBoost {
    fn default() -> Self {
        Self {
            half_life_days: 7.0,
            alpha: 0.3,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub policy: RankingPolicy,
    /// How to date a feed whose sampled timestamps are all in the future.
    pub future_dates: FutureDatePolicy,
    pub adaptive: AdaptiveHalfLife,
    pub rarity: RarityBoost,
}

/// A feed sample with its computed score. Lives only for one ranking pass.
#[derive(Debug, Clone)]
pub struct ScoredFeed {
    pub sample: FeedSample,
    pub score: f64,
    /// The latest non-future publication instant used for scoring;
    /// the epoch sentinel when the sample had no usable dates.
    pub latest: DateTime<Utc>,
}

/// Scores and orders feed samples, best first.
pub fn rank(samples: Vec<FeedSample>, now: DateTime<Utc>, config: &RankingConfig) -> Vec<ScoredFeed> {
    let mut scored: Vec<ScoredFeed> = samples
        .into_iter()
        .map(|sample| {
            let (score, latest) = score_sample(&sample, now, config);
            ScoredFeed {
                sample,
                score,
                latest,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.latest.cmp(&a.latest))
            .then_with(|| name_sort_key(&a.sample.feed).cmp(&name_sort_key(&b.sample.feed)))
    });

    scored
}

fn score_sample(
    sample: &FeedSample,
    now: DateTime<Utc>,
    config: &RankingConfig,
) -> (f64, DateTime<Utc>) {
    let published: Vec<DateTime<Utc>> =
        sample.recent.iter().filter_map(|a| a.published_at).collect();

    let latest = clock::latest_non_future(published.iter().copied(), now, config.future_dates);
    let age_days = clock::days_between(latest, now);

    let score = match config.policy {
        RankingPolicy::Adaptive => {
            let mean = clock::mean_interval_days(published.iter().copied());
            let fast = mean.is_none_or(|m| m <= config.adaptive.fast_threshold_days);
            let half_life = if fast {
                config.adaptive.fast_half_life_days
            } else {
                config.adaptive.slow_half_life_days
            };
            recency(age_days, half_life)
        }
        RankingPolicy::RarityBoost => {
            let median = clock::median_interval_days(published.iter().copied());
            let boost = 1.0 + config.rarity.alpha * (1.0 + median).log2();
            recency(age_days, config.rarity.half_life_days) * boost
        }
    };

    (score, latest)
}

/// Exponential decay: 1.0 at age zero, 0.5 at one half-life.
fn recency(age_days: f64, half_life_days: f64) -> f64 {
    (-std::f64::consts::LN_2 / half_life_days * age_days.max(0.0)).exp()
}

fn name_sort_key(feed: &Feed) -> String {
    feed.name.as_deref().unwrap_or("").to_lowercase()
}
