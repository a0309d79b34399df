use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::models::CourseId;

/// Millisecond-timestamp ids, bumped so that every id handed out by this
/// generator is strictly greater than the previous one.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure future ids are above `id`.
    pub fn observe(&self, id: CourseId) {
        self.last.fetch_max(id, Ordering::SeqCst);
    }

    pub fn next_id(&self) -> CourseId {
        let now = Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(current + 1);
            match self
                .last
                .compare_exchange(current, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}
