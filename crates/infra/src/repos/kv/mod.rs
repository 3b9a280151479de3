mod inmemory;
mod sqlite;

pub use inmemory::InMemoryKVRepo;
pub use sqlite::SqliteKVRepo;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait IKVRepo: Send + Sync {
    /// Inserts the key value or replaces the value of an existing key
    async fn set(&self, kv: &KeyValue) -> anyhow::Result<()>;
    async fn get(&self, key: &str) -> anyhow::Result<Option<KeyValue>>;
    async fn delete(&self, key: &str) -> anyhow::Result<Option<KeyValue>>;
    /// All key values whose key starts with `prefix`, ordered by key
    async fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<KeyValue>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn create_repos() -> Vec<Arc<dyn IKVRepo>> {
        let sqlite = SqliteKVRepo::connect("sqlite::memory:")
            .await
            .expect("To open inmemory sqlite database");
        vec![Arc::new(InMemoryKVRepo::new()), Arc::new(sqlite)]
    }

    #[tokio::test]
    async fn test_kv_queries() {
        for repo in create_repos().await {
            let kv1 = KeyValue::new("notif:1", "handle-1");
            let kv2 = KeyValue::new("notif:2", "handle-2");
            let kv3 = KeyValue::new("session:1", "token");

            for kv in &[&kv1, &kv2, &kv3] {
                assert!(repo.set(kv).await.is_ok());
                let res = repo
                    .get(&kv.key)
                    .await
                    .expect("Storage to be available")
                    .expect("To find key value just inserted");
                assert_eq!(res, **kv);
            }

            let notifs = repo
                .find_by_prefix("notif:")
                .await
                .expect("Storage to be available");
            assert_eq!(notifs, vec![kv1.clone(), kv2.clone()]);

            // Delete kv2 and query on that should return None
            let deleted = repo.delete(&kv2.key).await.expect("Storage to be available");
            assert_eq!(deleted, Some(kv2.clone()));
            assert!(repo.get(&kv2.key).await.unwrap().is_none());
            assert!(repo.delete(&kv2.key).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn set_replaces_value() {
        for repo in create_repos().await {
            repo.set(&KeyValue::new("a", "1")).await.unwrap();
            repo.set(&KeyValue::new("a", "2")).await.unwrap();
            let res = repo.get("a").await.unwrap().expect("To find key");
            assert_eq!(res.value, "2");
            assert_eq!(repo.find_by_prefix("").await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn prefix_is_matched_literally() {
        for repo in create_repos().await {
            repo.set(&KeyValue::new("notif:1", "x")).await.unwrap();
            repo.set(&KeyValue::new("notifX1", "y")).await.unwrap();
            repo.set(&KeyValue::new("no%if:1", "z")).await.unwrap();
            let res = repo.find_by_prefix("notif:").await.unwrap();
            assert_eq!(res, vec![KeyValue::new("notif:1", "x")]);
        }
    }
}
