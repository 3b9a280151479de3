mod kv;
mod mapping;

pub use kv::{IKVRepo, InMemoryKVRepo, KeyValue, SqliteKVRepo};
pub use mapping::MappingStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub key_values: Arc<dyn IKVRepo>,
    pub mappings: MappingStore,
}

impl Repos {
    pub async fn create_sqlite(database_url: &str) -> anyhow::Result<Self> {
        let key_values = Arc::new(SqliteKVRepo::connect(database_url).await?);
        Ok(Self::from_storage(key_values))
    }

    pub fn create_inmemory() -> Self {
        Self::from_storage(Arc::new(InMemoryKVRepo::new()))
    }

    pub fn from_storage(key_values: Arc<dyn IKVRepo>) -> Self {
        Self {
            mappings: MappingStore::new(key_values.clone()),
            key_values,
        }
    }
}
