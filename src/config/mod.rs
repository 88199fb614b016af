//! Configuration management.
//!
//! Configuration is read from `~/.config/estuary/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is
//! created. Missing fields fall back to their defaults, so a partial file
//! is fine.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;

use crate::overview::OverviewConfig;
use crate::pager::PagerConfig;
use crate::ranking::RankingConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the aggregation API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ranking: RankingConfig,
    pub pager: PagerConfig,
    pub overview: OverviewConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with
    /// comments. If it exists but is invalid, returns an error.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/estuary/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("estuary").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Estuary configuration

[api]
# Base URL of the aggregation API
base_url = "http://localhost:3000/api"

# Request timeout in seconds
timeout_secs = 10

[ranking]
# "adaptive" picks a recency half-life from each feed's publishing cadence;
# "rarity-boost" uses a fixed half-life and boosts infrequent publishers
policy = "adaptive"

# What to report as a feed's latest activity when every sampled date lies
# in the future: "clamp-to-now" or "earliest-future"
future_dates = "clamp-to-now"

[ranking.adaptive]
# Half-life in days for feeds publishing at or below the threshold cadence
fast_half_life_days = 2.0

# Half-life in days for slower feeds
slow_half_life_days = 14.0

# Mean days between items at or below which a feed counts as fast
fast_threshold_days = 3.0

[ranking.rarity]
# Fixed recency half-life in days
half_life_days = 7.0

# Strength of the rarity multiplier
alpha = 0.3

[pager]
# Articles per fetched page
page_size = 20

# Drop appended articles whose id is already in the list
dedupe_appends = true

# Near-end predicate sampling interval in milliseconds (one display frame)
sample_interval_ms = 16

[overview]
# Recent articles sampled per feed for ranking
sample_size = 5

# Concurrent sample fetches
workers = 10
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::clock::FutureDatePolicy;
    use crate::ranking::RankingPolicy;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.ranking.policy, RankingPolicy::Adaptive);
        assert_eq!(config.ranking.future_dates, FutureDatePolicy::ClampToNow);
        assert_eq!(config.pager.page_size, 20);
        assert_eq!(config.overview.sample_size, 5);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[ranking]
policy = "rarity-boost"

[ranking.rarity]
alpha = 0.5
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom values
        assert_eq!(config.ranking.policy, RankingPolicy::RarityBoost);
        assert_eq!(config.ranking.rarity.alpha, 0.5);
        // Defaults fill the rest
        assert_eq!(config.ranking.rarity.half_life_days, 7.0);
        assert_eq!(config.pager.page_size, 20);
        assert!(config.pager.dedupe_appends);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");

        assert_eq!(config.ranking.policy, RankingPolicy::Adaptive);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.overview.workers, 10);
    }
}
