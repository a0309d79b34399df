use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::StoreError;

use super::KvStore;

/// Connection settings for a REST key-value endpoint
/// (`{base}/get/{key}`, `{base}/set/{key}`, `{base}/del/{key}`).
#[derive(Clone, Debug)]
pub struct HttpStoreConfig {
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpKvStore {
    client: Client,
    base: Url,
    token: String,
}

impl HttpKvStore {
    pub fn new(config: HttpStoreConfig) -> Result<Self, StoreError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| StoreError::Config(format!("invalid store url: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Config(format!(
                "store url cannot be a base: {}",
                config.base_url
            )));
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base,
            token: config.token,
        })
    }

    fn command_url(&self, command: &str, key: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(command).push(key);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Option<Value>, StoreError> {
        let response = request.bearer_auth(&self.token).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("store request failed with {}: {}", status, body);
            return Err(StoreError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CommandResponse = serde_json::from_str(&body)?;
        if let Some(message) = parsed.error {
            return Err(StoreError::Remote {
                status: status.as_u16(),
                body: message,
            });
        }
        Ok(parsed.result)
    }
}

#[async_trait]
impl KvStore for HttpKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let url = self.command_url("get", key);
        debug!("GET {}", url);

        match self.send(self.client.get(url)).await? {
            None | Some(Value::Null) => Ok(None),
            // values are stored as JSON text
            Some(Value::String(text)) => Ok(Some(serde_json::from_str(&text)?)),
            Some(other) => Ok(Some(other)),
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let url = self.command_url("set", key);
        let text = serde_json::to_string(value)?;
        debug!("POST {} ({} bytes)", url, text.len());

        self.send(self.client.post(url).body(text)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let url = self.command_url("del", key);
        debug!("POST {}", url);

        self.send(self.client.post(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base_url: &str) -> HttpKvStore {
        HttpKvStore::new(HttpStoreConfig {
            base_url: base_url.to_string(),
            token: "secret".to_string(),
        })
        .expect("Failed to build store")
    }

    #[test]
    fn test_command_url_appends_segments() {
        let s = store("https://kv.example.test");
        assert_eq!(
            s.command_url("get", "campus-courses").as_str(),
            "https://kv.example.test/get/campus-courses"
        );

        let s = store("https://kv.example.test/v1/");
        assert_eq!(
            s.command_url("set", "campus courses").as_str(),
            "https://kv.example.test/v1/set/campus%20courses"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = HttpKvStore::new(HttpStoreConfig {
            base_url: "mailto:kv@example.test".to_string(),
            token: String::new(),
        });
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
