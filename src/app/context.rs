use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{EstuaryError, Result};
use crate::config::Config;
use crate::overview::OverviewLoader;
use crate::source::{ArticleSource, HttpArticleSource};
use crate::store::{LastReadStore, SqliteLastReadStore};

pub struct AppContext {
    pub config: Config,
    pub source: Arc<dyn ArticleSource>,
    pub last_read: Arc<dyn LastReadStore>,
    pub overview: OverviewLoader,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let last_read: Arc<dyn LastReadStore> = Arc::new(SqliteLastReadStore::new(&db_path)?);
        Self::with_last_read(config, last_read)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let last_read: Arc<dyn LastReadStore> = Arc::new(SqliteLastReadStore::in_memory()?);
        Self::with_last_read(config, last_read)
    }

    fn with_last_read(config: Config, last_read: Arc<dyn LastReadStore>) -> Result<Self> {
        let source: Arc<dyn ArticleSource> = Arc::new(HttpArticleSource::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        )?);
        let overview = OverviewLoader::new(
            source.clone(),
            last_read.clone(),
            config.ranking.clone(),
            &config.overview,
        );

        Ok(Self {
            config,
            source,
            last_read,
            overview,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| EstuaryError::Config("Could not find data directory".into()))?;
        let estuary_dir = data_dir.join("estuary");
        std::fs::create_dir_all(&estuary_dir)?;
        Ok(estuary_dir.join("estuary.db"))
    }
}
