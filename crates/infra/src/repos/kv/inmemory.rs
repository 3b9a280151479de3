use super::{IKVRepo, KeyValue};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

pub struct InMemoryKVRepo {
    key_values: Mutex<BTreeMap<String, String>>,
}

impl InMemoryKVRepo {
    pub fn new() -> Self {
        Self {
            key_values: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.key_values
            .lock()
            .map_err(|_| anyhow::anyhow!("Inmemory key value storage is poisoned"))
    }
}

impl Default for InMemoryKVRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IKVRepo for InMemoryKVRepo {
    async fn set(&self, kv: &KeyValue) -> anyhow::Result<()> {
        self.lock()?.insert(kv.key.clone(), kv.value.clone());
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<KeyValue>> {
        Ok(self
            .lock()?
            .get(key)
            .map(|value| KeyValue::new(key, value.clone())))
    }

    async fn delete(&self, key: &str) -> anyhow::Result<Option<KeyValue>> {
        Ok(self
            .lock()?
            .remove(key)
            .map(|value| KeyValue::new(key, value)))
    }

    async fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<KeyValue>> {
        Ok(self
            .lock()?
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect())
    }
}
