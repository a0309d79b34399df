//! Key-value persistence behind the course repository.
//!
//! A store holds opaque JSON values under string keys. Writes replace the
//! whole value; there is no versioning, so concurrent writers race and the
//! last one wins.

pub mod http;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::error::StoreError;

pub use http::{HttpKvStore, HttpStoreConfig};
pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

const PROBE_KEY: &str = "db-test-connection";

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Write, read back and remove a throwaway key.
    async fn ping(&self) -> Result<(), StoreError> {
        let probe = Value::String(format!("test-{}", Utc::now().timestamp_millis()));
        self.set(PROBE_KEY, &probe).await?;
        let read_back = self.get(PROBE_KEY).await?;
        self.delete(PROBE_KEY).await?;

        if read_back.as_ref() != Some(&probe) {
            return Err(StoreError::Probe(
                "retrieved value does not match".to_string(),
            ));
        }
        Ok(())
    }
}
