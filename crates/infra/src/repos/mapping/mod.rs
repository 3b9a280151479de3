use super::kv::{IKVRepo, KeyValue};
use rxminder_domain::{mapping_key, parse_mapping_key, MappingRecord, ReminderId, MAPPING_KEY_PREFIX};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Durable registry of `reminder_id -> notification handle`.
///
/// Storage failures never reach the caller: reads degrade to "not scheduled"
/// and writes to a no-op. Every mapping written or removed during the
/// lifetime of the process is also kept in memory and takes precedence over
/// storage, so a storage outage neither makes a scheduled reminder look
/// unscheduled nor brings a removed mapping back.
#[derive(Clone)]
pub struct MappingStore {
    storage: Arc<dyn IKVRepo>,
    /// `None` marks a removed mapping
    fallback: Arc<Mutex<BTreeMap<ReminderId, Option<String>>>>,
}

impl MappingStore {
    pub fn new(storage: Arc<dyn IKVRepo>) -> Self {
        Self {
            storage,
            fallback: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    fn fallback_get(&self, reminder_id: ReminderId) -> Option<Option<String>> {
        self.fallback
            .lock()
            .ok()
            .and_then(|fallback| fallback.get(&reminder_id).cloned())
    }

    fn fallback_set(&self, reminder_id: ReminderId, handle: Option<&str>) {
        if let Ok(mut fallback) = self.fallback.lock() {
            fallback.insert(reminder_id, handle.map(String::from));
        }
    }

    fn fallback_records(&self) -> BTreeMap<ReminderId, Option<String>> {
        self.fallback
            .lock()
            .map(|fallback| fallback.clone())
            .unwrap_or_default()
    }

    pub async fn get(&self, reminder_id: ReminderId) -> Option<String> {
        if let Some(handle) = self.fallback_get(reminder_id) {
            return handle;
        }
        match self.storage.get(&mapping_key(reminder_id)).await {
            Ok(kv) => kv.map(|kv| kv.value),
            Err(e) => {
                warn!(
                    "Unable to read notification mapping for reminder {}. Err: {:?}",
                    reminder_id, e
                );
                None
            }
        }
    }

    pub async fn set(&self, reminder_id: ReminderId, handle: &str) {
        self.fallback_set(reminder_id, Some(handle));
        let kv = KeyValue::new(mapping_key(reminder_id), handle);
        if let Err(e) = self.storage.set(&kv).await {
            warn!(
                "Unable to store notification mapping for reminder {}. Err: {:?}",
                reminder_id, e
            );
        }
    }

    pub async fn remove(&self, reminder_id: ReminderId) {
        self.fallback_set(reminder_id, None);
        if let Err(e) = self.storage.delete(&mapping_key(reminder_id)).await {
            warn!(
                "Unable to remove notification mapping for reminder {}. Err: {:?}",
                reminder_id, e
            );
        }
    }

    /// All known mappings ordered by reminder id
    pub async fn list_all(&self) -> Vec<MappingRecord> {
        let mut records = BTreeMap::new();
        match self.storage.find_by_prefix(MAPPING_KEY_PREFIX).await {
            Ok(kvs) => {
                for kv in kvs {
                    if let Some(reminder_id) = parse_mapping_key(&kv.key) {
                        records.insert(reminder_id, kv.value);
                    }
                }
            }
            Err(e) => {
                warn!("Unable to list notification mappings. Err: {:?}", e);
            }
        }
        for (reminder_id, handle) in self.fallback_records() {
            match handle {
                Some(handle) => records.insert(reminder_id, handle),
                None => records.remove(&reminder_id),
            };
        }

        records
            .into_iter()
            .map(|(reminder_id, handle)| MappingRecord {
                reminder_id,
                handle,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::kv::InMemoryKVRepo;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Storage that can be switched to fail every call
    struct FlakyKVRepo {
        inner: InMemoryKVRepo,
        down: AtomicBool,
    }

    impl FlakyKVRepo {
        fn new() -> Self {
            Self {
                inner: InMemoryKVRepo::new(),
                down: AtomicBool::new(false),
            }
        }

        fn check(&self) -> anyhow::Result<()> {
            if self.down.load(Ordering::SeqCst) {
                Err(anyhow::anyhow!("Storage is down"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl IKVRepo for FlakyKVRepo {
        async fn set(&self, kv: &KeyValue) -> anyhow::Result<()> {
            self.check()?;
            self.inner.set(kv).await
        }
        async fn get(&self, key: &str) -> anyhow::Result<Option<KeyValue>> {
            self.check()?;
            self.inner.get(key).await
        }
        async fn delete(&self, key: &str) -> anyhow::Result<Option<KeyValue>> {
            self.check()?;
            self.inner.delete(key).await
        }
        async fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<KeyValue>> {
            self.check()?;
            self.inner.find_by_prefix(prefix).await
        }
    }

    #[tokio::test]
    async fn stores_namespaced_mappings() {
        let storage = Arc::new(InMemoryKVRepo::new());
        let store = MappingStore::new(storage.clone());

        store.set(1, "handle-1").await;
        assert_eq!(store.get(1).await.as_deref(), Some("handle-1"));
        assert!(store.get(2).await.is_none());

        let kv = storage.get("notif:1").await.unwrap().expect("Namespaced key");
        assert_eq!(kv.value, "handle-1");
    }

    #[tokio::test]
    async fn survives_process_restart() {
        let storage = Arc::new(InMemoryKVRepo::new());
        MappingStore::new(storage.clone()).set(5, "handle-5").await;

        let store = MappingStore::new(storage);
        assert_eq!(store.get(5).await.as_deref(), Some("handle-5"));
    }

    #[tokio::test]
    async fn lists_only_mapping_keys() {
        let storage = Arc::new(InMemoryKVRepo::new());
        storage.set(&KeyValue::new("session", "abc")).await.unwrap();
        storage.set(&KeyValue::new("notif:oops", "x")).await.unwrap();
        storage.set(&KeyValue::new("notif:3", "handle-3")).await.unwrap();
        let store = MappingStore::new(storage);
        store.set(1, "handle-1").await;

        assert_eq!(
            store.list_all().await,
            vec![
                MappingRecord {
                    reminder_id: 1,
                    handle: "handle-1".into()
                },
                MappingRecord {
                    reminder_id: 3,
                    handle: "handle-3".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn remove_clears_mapping() {
        let store = MappingStore::new(Arc::new(InMemoryKVRepo::new()));
        store.set(1, "handle-1").await;
        store.remove(1).await;
        assert!(store.get(1).await.is_none());
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn storage_failures_are_absorbed() {
        let storage = Arc::new(FlakyKVRepo::new());
        let store = MappingStore::new(storage.clone());
        storage.down.store(true, Ordering::SeqCst);

        // Nothing was ever written, so a failing read means "not scheduled"
        assert!(store.get(1).await.is_none());
        assert!(store.list_all().await.is_empty());

        // A failing write is still remembered for the process lifetime
        store.set(1, "handle-1").await;
        assert_eq!(store.get(1).await.as_deref(), Some("handle-1"));
        assert_eq!(store.list_all().await.len(), 1);

        // Storage recovered but never got the write
        storage.down.store(false, Ordering::SeqCst);
        assert!(storage.get("notif:1").await.unwrap().is_none());
        assert_eq!(store.get(1).await.as_deref(), Some("handle-1"));
    }

    #[tokio::test]
    async fn removed_mapping_stays_removed_when_storage_delete_fails() {
        let storage = Arc::new(FlakyKVRepo::new());
        let store = MappingStore::new(storage.clone());
        store.set(1, "handle-1").await;
        store.set(2, "handle-2").await;

        storage.down.store(true, Ordering::SeqCst);
        store.remove(1).await;
        storage.down.store(false, Ordering::SeqCst);

        // Storage still holds the mapping
        assert!(storage.get("notif:1").await.unwrap().is_some());
        assert!(store.get(1).await.is_none());
        assert_eq!(
            store.list_all().await,
            vec![MappingRecord {
                reminder_id: 2,
                handle: "handle-2".into()
            }]
        );

        // Scheduling it again replaces the tombstone
        store.set(1, "handle-3").await;
        assert_eq!(store.get(1).await.as_deref(), Some("handle-3"));
    }
}
