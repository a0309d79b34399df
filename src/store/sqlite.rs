use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::debug;

use crate::error::StoreError;

use super::KvStore;

pub struct SqliteKvStore {
    db: SqlitePool,
}

impl SqliteKvStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    /// Single-connection in-memory database. The connection is never recycled
    /// so the data lives as long as the store.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(db: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&db).await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_entries WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.db)
                .await?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&text)
        .bind(&now)
        .execute(&self.db)
        .await?;

        debug!("stored {} bytes under {}", text.len(), key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?")
            .bind(key)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn setup_test_store() -> SqliteKvStore {
        SqliteKvStore::in_memory()
            .await
            .expect("Failed to create test store")
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let store = setup_test_store().await;

        store.set("campus-courses", &json!([{ "id": 1 }])).await.unwrap();
        store.set("campus-courses", &json!([{ "id": 2 }])).await.unwrap();

        let value = store.get("campus-courses").await.unwrap();
        assert_eq!(value, Some(json!([{ "id": 2 }])));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = setup_test_store().await;
        assert_eq!(store.get("nothing-here").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_and_ping() {
        let store = setup_test_store().await;
        store.set("k", &json!("v")).await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.ping().await.expect("ping failed");
    }
}
