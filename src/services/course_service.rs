use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::models::{Course, CourseId, CourseSummary, NewCourseRequest, UpdateCourseRequest};
use crate::repository::CourseRepository;
use crate::services::dashboard::{ListQuery, arrange};
use crate::services::id_generator::IdGenerator;

/// In-memory working copy of the course list, persisted optimistically.
///
/// Mutations apply to the local list first and then write the whole list to
/// the primary repository. If that write fails the previous list is put back
/// and the error is returned. Successful writes are mirrored to the optional
/// cache repository, which `reload` falls back to when the primary is down.
///
/// Until one load has succeeded the working copy is not the stored list, so
/// mutations first retry the load and fail with `AppError::Unavailable`
/// rather than overwrite courses they have never seen.
pub struct CourseService {
    primary: CourseRepository,
    cache: Option<CourseRepository>,
    courses: RwLock<Vec<Course>>,
    mutation: Mutex<()>,
    loaded: AtomicBool,
    ids: IdGenerator,
}

impl CourseService {
    pub fn new(primary: CourseRepository, cache: Option<CourseRepository>) -> Self {
        Self {
            primary,
            cache,
            courses: RwLock::new(Vec::new()),
            mutation: Mutex::new(()),
            loaded: AtomicBool::new(false),
            ids: IdGenerator::new(),
        }
    }

    /// Replace the working copy with the authoritative list. Returns the
    /// number of courses loaded.
    pub async fn reload(&self) -> Result<usize, AppError> {
        let _guard = self.mutation.lock().await;
        self.reload_locked().await
    }

    /// Whether the working copy reflects a successful load.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    async fn reload_locked(&self) -> Result<usize, AppError> {
        let courses = match self.primary.load().await {
            Ok(courses) => {
                self.mirror_to_cache(&courses).await;
                courses
            }
            Err(err) => {
                warn!("failed to load courses from primary store: {}", err);
                match self.load_cached().await {
                    Some(cached) => {
                        info!("using {} cached courses", cached.len());
                        cached
                    }
                    None => return Err(err.into()),
                }
            }
        };

        for course in &courses {
            self.ids.observe(course.id);
        }
        let count = courses.len();
        *self.courses.write().await = courses;
        self.loaded.store(true, Ordering::SeqCst);
        Ok(count)
    }

    async fn ensure_loaded(&self) -> Result<(), AppError> {
        if self.is_loaded() {
            return Ok(());
        }
        self.reload_locked().await.map_err(|err| match err {
            AppError::Store(store) => AppError::Unavailable(store),
            other => other,
        })?;
        Ok(())
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<CourseSummary>, AppError> {
        let courses = self.courses.read().await.clone();
        let summaries = courses
            .into_iter()
            .map(CourseSummary::from_course)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(arrange(summaries, query))
    }

    pub async fn get(&self, id: CourseId) -> Option<Course> {
        self.courses
            .read()
            .await
            .iter()
            .find(|course| course.id == id)
            .cloned()
    }

    pub async fn create(&self, req: NewCourseRequest) -> Result<Course, AppError> {
        let _guard = self.mutation.lock().await;
        self.ensure_loaded().await?;

        let course = Course::from_request(self.ids.next_id(), Utc::now(), req);
        let previous = self.courses.read().await.clone();
        let mut next = previous.clone();
        next.push(course.clone());

        self.commit(previous, next).await?;
        info!("created course {} ({})", course.id, course.name);
        Ok(course)
    }

    /// `Ok(None)` when no course has the given id.
    pub async fn update(
        &self,
        id: CourseId,
        req: UpdateCourseRequest,
    ) -> Result<Option<Course>, AppError> {
        let _guard = self.mutation.lock().await;
        self.ensure_loaded().await?;

        let previous = self.courses.read().await.clone();
        let mut next = previous.clone();
        let Some(course) = next.iter_mut().find(|course| course.id == id) else {
            warn!("course {} not found", id);
            return Ok(None);
        };
        course.apply(req);
        let updated = course.clone();

        self.commit(previous, next).await?;
        info!("updated course {}", id);
        Ok(Some(updated))
    }

    /// `Ok(false)` when no course has the given id.
    pub async fn delete(&self, id: CourseId) -> Result<bool, AppError> {
        let _guard = self.mutation.lock().await;
        self.ensure_loaded().await?;

        let previous = self.courses.read().await.clone();
        let next: Vec<Course> = previous
            .iter()
            .filter(|course| course.id != id)
            .cloned()
            .collect();
        if next.len() == previous.len() {
            warn!("course {} not found", id);
            return Ok(false);
        }

        self.commit(previous, next).await?;
        info!("deleted course {}", id);
        Ok(true)
    }

    /// Overwrite the whole collection. Needs no prior load.
    pub async fn replace_all(&self, courses: Vec<Course>) -> Result<usize, AppError> {
        let _guard = self.mutation.lock().await;

        for course in &courses {
            self.ids.observe(course.id);
        }
        let count = courses.len();
        let previous = self.courses.read().await.clone();

        self.commit(previous, courses).await?;
        self.loaded.store(true, Ordering::SeqCst);
        info!("replaced course list with {} courses", count);
        Ok(count)
    }

    /// Round-trip a probe value through the primary store.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.primary.store().ping().await?;
        Ok(())
    }

    async fn commit(&self, previous: Vec<Course>, next: Vec<Course>) -> Result<(), AppError> {
        *self.courses.write().await = next.clone();

        if let Err(err) = self.primary.save_all(&next).await {
            error!("failed to persist courses, reverting: {}", err);
            *self.courses.write().await = previous;
            return Err(err.into());
        }

        self.mirror_to_cache(&next).await;
        Ok(())
    }

    async fn mirror_to_cache(&self, courses: &[Course]) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.save_all(courses).await {
                warn!("failed to update local course cache: {}", err);
            }
        }
    }

    async fn load_cached(&self) -> Option<Vec<Course>> {
        let cache = self.cache.as_ref()?;
        match cache.load().await {
            Ok(courses) if !courses.is_empty() => Some(courses),
            Ok(_) => None,
            Err(err) => {
                warn!("failed to read local course cache: {}", err);
                None
            }
        }
    }
}
