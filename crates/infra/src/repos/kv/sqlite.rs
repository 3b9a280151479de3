use super::{IKVRepo, KeyValue};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use tracing::info;

pub struct SqliteKVRepo {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct KeyValueRaw {
    key: String,
    value: String,
}

impl From<KeyValueRaw> for KeyValue {
    fn from(raw: KeyValueRaw) -> Self {
        Self {
            key: raw.key,
            value: raw.value,
        }
    }
}

impl SqliteKVRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (and creates if missing) the database at `database_url` and
    /// makes sure the schema is up to date
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to an inmemory database gets its own database,
        // so it has to be a single connection that is never recycled
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        info!("Running key value storage migrations ...");
        sqlx::migrate!().run(&pool).await?;
        info!("Running key value storage migrations ... [done]");

        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl IKVRepo for SqliteKVRepo {
    async fn set(&self, kv: &KeyValue) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO key_values (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(&kv.key)
        .bind(&kv.value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<KeyValue>> {
        let kv: Option<KeyValueRaw> = sqlx::query_as(
            r#"
            SELECT key, value FROM key_values
            WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(kv.map(KeyValue::from))
    }

    async fn delete(&self, key: &str) -> anyhow::Result<Option<KeyValue>> {
        let kv: Option<KeyValueRaw> = sqlx::query_as(
            r#"
            DELETE FROM key_values
            WHERE key = ?
            RETURNING key, value
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(kv.map(KeyValue::from))
    }

    async fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<KeyValue>> {
        let kvs: Vec<KeyValueRaw> = sqlx::query_as(
            r#"
            SELECT key, value FROM key_values
            WHERE substr(key, 1, length(?1)) = ?1
            ORDER BY key
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;
        Ok(kvs.into_iter().map(KeyValue::from).collect())
    }
}
