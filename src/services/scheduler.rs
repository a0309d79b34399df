use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::services::course_service::CourseService;

/// Periodically reloads the working course list from the store, picking up
/// writes made by other editors.
pub struct RefreshScheduler {
    service: Arc<CourseService>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(service: Arc<CourseService>, interval_secs: u64) -> Self {
        Self {
            service,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Runs until the task is aborted. Failed refreshes are logged and the
    /// loop continues with the current working copy.
    pub async fn start(self) {
        info!("Starting course refresh scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.service.reload().await {
                Ok(count) => info!("Refreshed {} courses from store", count),
                Err(e) => warn!("Course refresh failed: {:?}", e),
            }
        }
    }
}
