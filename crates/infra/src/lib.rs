mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IKVRepo, InMemoryKVRepo, KeyValue, MappingStore, Repos, SqliteKVRepo};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct RxminderContext {
    pub repos: Repos,
    pub services: Services,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl RxminderContext {
    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = match &config.database_url {
            Some(database_url) => Repos::create_sqlite(database_url).await?,
            None => Repos::create_inmemory(),
        };
        let services =
            Services::create_local(&config.reminder_source_url, repos.key_values.clone()).await?;
        info!(
            "Reminders are fetched from: {}",
            config.reminder_source_url
        );
        Ok(Self {
            repos,
            services,
            config,
            sys: Arc::new(RealSys {}),
        })
    }

    /// Context with every collaborator kept in memory. Used for testing.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            services: Services::create_inmemory(),
            config: Config {
                port: 0,
                user_id: None,
                reminder_source_url: "http://localhost:8000".into(),
                database_url: None,
                prune_orphaned_notifications: false,
            },
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<RxminderContext> {
    RxminderContext::create(Config::new()).await
}
