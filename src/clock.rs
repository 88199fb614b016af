//! Pure date arithmetic shared by the ranking engine.
//!
//! All helpers tolerate empty input and future-dated timestamps; invalid
//! timestamps are expected to have been filtered out upstream (they arrive
//! as `None` from the wire and never reach these functions).

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Fallback publishing interval when a feed has too few dated items.
pub const DEFAULT_INTERVAL_DAYS: f64 = 14.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// The sentinel instant meaning "no valid date available".
///
/// Sorts as maximally old: a feed stamped with the epoch always loses a
/// recency comparison against any feed with a real publication date.
pub fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Magnitude of the distance between two instants, in 24-hour units.
///
/// Never negative, regardless of argument order.
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    let seconds = (b - a).num_seconds().abs();
    (seconds as f64 / SECONDS_PER_DAY).max(0.0)
}

/// What to report as a feed's latest activity when every sampled
/// timestamp lies in the future of the reference instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FutureDatePolicy {
    /// Treat the feed as active right now. Clock-skewed feeds get no
    /// recency penalty.
    #[default]
    ClampToNow,
    /// Report the earliest of the future timestamps.
    EarliestFuture,
}

/// The most recent timestamp that is not in the future of `now`.
///
/// Empty input yields the epoch sentinel. When every timestamp is in the
/// future the result follows `policy`; either way the caller never sees an
/// instant that would make the feed look artificially old.
pub fn latest_non_future<I>(times: I, now: DateTime<Utc>, policy: FutureDatePolicy) -> DateTime<Utc>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let times: Vec<DateTime<Utc>> = times.into_iter().collect();
    if times.is_empty() {
        return epoch();
    }

    if let Some(latest) = times.iter().copied().filter(|t| *t <= now).max() {
        return latest;
    }

    match policy {
        FutureDatePolicy::ClampToNow => now,
        FutureDatePolicy::EarliestFuture => times.into_iter().min().unwrap_or(now),
    }
}

/// Median gap, in days, between consecutive publications.
///
/// Fewer than two timestamps is not enough signal; the default interval is
/// returned instead. An even number of gaps yields the mean of the middle
/// pair.
pub fn median_interval_days<I>(times: I) -> f64
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut gaps = interval_days(times);
    if gaps.is_empty() {
        return DEFAULT_INTERVAL_DAYS;
    }

    gaps.sort_by(f64::total_cmp);
    let mid = gaps.len() / 2;
    if gaps.len() % 2 == 1 {
        gaps[mid]
    } else {
        (gaps[mid - 1] + gaps[mid]) / 2.0
    }
}

/// Mean gap, in days, between consecutive publications.
///
/// Requires at least three timestamps (two gaps); below that the interval
/// is indeterminate and `None` is returned.
pub fn mean_interval_days<I>(times: I) -> Option<f64>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let gaps = interval_days(times);
    if gaps.len() < 2 {
        return None;
    }
    Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
}

/// Gaps between consecutive timestamps, newest first.
fn interval_days<I>(times: I) -> Vec<f64>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut times: Vec<DateTime<Utc>> = times.into_iter().collect();
    times.sort_unstable_by(|a, b| b.cmp(a));
    times
        .windows(2)
        .map(|pair| days_between(pair[1], pair[0]))
        .collect()
}
