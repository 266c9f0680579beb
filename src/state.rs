use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, StoreConfig};
use crate::store::{file::FileStore, postgres::PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        Self::with_config(config).await
    }

    pub async fn with_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match &config.store {
            StoreConfig::Postgres { database_url } => {
                info!("using postgres store");
                Arc::new(PgStore::connect(database_url).await?)
            }
            StoreConfig::File { path } => {
                info!(path = %path.display(), "using flat-file store");
                Arc::new(FileStore::open(path.clone())?)
            }
        };
        Ok(Self { store, config })
    }
}
