use std::env;
use std::net::SocketAddr;

use crate::error::AppError;
use crate::repository::DEFAULT_COURSES_KEY;
use crate::store::HttpStoreConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    /// When set, the REST store is authoritative and SQLite becomes the
    /// local cache.
    pub remote_store: Option<HttpStoreConfig>,
    pub courses_key: String,
    /// Zero disables periodic refresh.
    pub refresh_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://courses.db?mode=rwc".to_string());

        let remote_store = match env::var("KV_REST_API_URL") {
            Ok(base_url) if !base_url.is_empty() => {
                let token = env::var("KV_REST_API_TOKEN").map_err(|_| {
                    AppError::Config(
                        "KV_REST_API_TOKEN is not set but KV_REST_API_URL is".to_string(),
                    )
                })?;
                Some(HttpStoreConfig { base_url, token })
            }
            _ => None,
        };

        let courses_key =
            env::var("COURSES_KEY").unwrap_or_else(|_| DEFAULT_COURSES_KEY.to_string());

        let refresh_interval_secs = match env::var("REFRESH_INTERVAL_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("REFRESH_INTERVAL_SECS is invalid: {}", e))
            })?,
            Err(_) => 0,
        };

        Ok(Self {
            bind_addr,
            database_url,
            remote_store,
            courses_key,
            refresh_interval_secs,
        })
    }
}
