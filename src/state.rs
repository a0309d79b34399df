use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::repository::CourseRepository;
use crate::services::CourseService;
use crate::store::{HttpKvStore, KvStore, SqliteKvStore};

#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<CourseService>,
}

impl AppState {
    pub fn new(courses: Arc<CourseService>) -> Self {
        Self { courses }
    }

    /// Wire the stores described by `config`: the REST store as primary with
    /// SQLite as cache, or SQLite alone.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let sqlite: Arc<dyn KvStore> = Arc::new(SqliteKvStore::connect(&config.database_url).await?);

        let (primary, cache) = match &config.remote_store {
            Some(remote) => {
                info!("using remote course store at {}", remote.base_url);
                let http: Arc<dyn KvStore> = Arc::new(HttpKvStore::new(remote.clone())?);
                (
                    CourseRepository::new(http, config.courses_key.clone()),
                    Some(CourseRepository::new(sqlite, config.courses_key.clone())),
                )
            }
            None => {
                info!("using sqlite course store at {}", config.database_url);
                (CourseRepository::new(sqlite, config.courses_key.clone()), None)
            }
        };

        Ok(Self::new(Arc::new(CourseService::new(primary, cache))))
    }
}
