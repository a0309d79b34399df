use std::sync::Arc;

use tracing::debug;

use crate::error::StoreError;
use crate::models::Course;
use crate::store::KvStore;

pub const DEFAULT_COURSES_KEY: &str = "campus-courses";

/// The whole course list, stored as one JSON array under a single key.
///
/// There is no per-record addressing: every save rewrites the full list, so
/// two writers saving different edits will clobber each other.
#[derive(Clone)]
pub struct CourseRepository {
    store: Arc<dyn KvStore>,
    key: String,
}

impl CourseRepository {
    pub fn new(store: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// An absent key is an empty list.
    pub async fn load(&self) -> Result<Vec<Course>, StoreError> {
        let courses = match self.store.get(&self.key).await? {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<Course>>(value)?,
        };
        debug!("loaded {} courses from {}", courses.len(), self.key);
        Ok(courses)
    }

    pub async fn save_all(&self, courses: &[Course]) -> Result<(), StoreError> {
        let value = serde_json::to_value(courses)?;
        self.store.set(&self.key, &value).await?;
        debug!("saved {} courses to {}", courses.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseType, HomePageOption, NewCourseRequest};
    use crate::store::{MemoryKvStore, SqliteKvStore};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample_course(id: i64) -> Course {
        Course::from_request(
            id,
            Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
            NewCourseRequest {
                name: format!("Course {}", id),
                course_type: CourseType::Certificate,
                home_page_option: Some(HomePageOption::AboutLink),
                about_page_link: Some("https://x.test/about".to_string()),
                course_launch_date: Some(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_load_missing_key_is_empty() {
        let repo = CourseRepository::new(Arc::new(MemoryKvStore::new()), DEFAULT_COURSES_KEY);
        let courses = repo.load().await.expect("Failed to load");
        assert!(courses.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_through_sqlite() {
        let store = SqliteKvStore::in_memory().await.expect("Failed to create store");
        let repo = CourseRepository::new(Arc::new(store), DEFAULT_COURSES_KEY);

        let courses = vec![sample_course(1), sample_course(2)];
        repo.save_all(&courses).await.expect("Failed to save");

        let loaded = repo.load().await.expect("Failed to load");
        assert_eq!(loaded, courses);
    }

    #[tokio::test]
    async fn test_dates_stored_as_iso_strings() {
        let store = Arc::new(MemoryKvStore::new());
        let repo = CourseRepository::new(store.clone(), "courses");
        repo.save_all(&[sample_course(1)]).await.expect("Failed to save");

        let raw = store.get("courses").await.unwrap().unwrap();
        assert_eq!(raw[0]["createdAt"], json!("2025-05-01T12:00:00.000Z"));
        assert_eq!(raw[0]["courseLaunchDate"], json!("2025-09-01T00:00:00.000Z"));
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let editor_a = CourseRepository::new(store.clone(), DEFAULT_COURSES_KEY);
        let editor_b = CourseRepository::new(store, DEFAULT_COURSES_KEY);

        editor_a.save_all(&[sample_course(1)]).await.unwrap();
        editor_b.save_all(&[sample_course(2)]).await.unwrap();

        let loaded = editor_a.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 2);
    }

    #[tokio::test]
    async fn test_malformed_list_is_a_codec_error() {
        let store = Arc::new(MemoryKvStore::new());
        store.set("courses", &json!({ "not": "a list" })).await.unwrap();

        let repo = CourseRepository::new(store, "courses");
        let result = repo.load().await;
        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[tokio::test]
    async fn test_one_legacy_record_does_not_fail_the_list() {
        let store = Arc::new(MemoryKvStore::new());
        store
            .set(
                "courses",
                &json!([
                    serde_json::to_value(sample_course(1)).unwrap(),
                    {
                        "id": 2,
                        "name": "Legacy",
                        "type": "workshop",
                        "homePageOption": "",
                        "createdAt": "last spring"
                    }
                ]),
            )
            .await
            .unwrap();

        let repo = CourseRepository::new(store, "courses");
        let loaded = repo.load().await.expect("Failed to load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], sample_course(1));
        assert_eq!(loaded[1].name, "Legacy");
        assert_eq!(loaded[1].home_page_option, None);
        assert_eq!(loaded[1].created_at, None);
    }
}
