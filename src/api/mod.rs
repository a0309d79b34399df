use axum::Json;
use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::*;
use crate::services::ListQuery;
use crate::state::AppState;
use crate::validation::{self, COURSE_SCHEMA, Mode, Readiness};

#[derive(Debug, Serialize)]
struct SaveResponse {
    success: bool,
    count: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/courses",
            get(list_courses).post(create_course).put(replace_courses),
        )
        .route(
            "/courses/{id}",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .route("/courses/{id}/readiness", get(course_readiness))
        .route("/readiness", post(evaluate_record))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.courses.ping().await?;
    Ok(StatusCode::OK)
}

async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let courses = state.courses.list(&query).await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let req: NewCourseRequest = checked(body, Mode::Record)?;
    let course = state.courses.create(req).await?;
    Ok((StatusCode::CREATED, Json(CourseSummary::from_course(course)?)))
}

async fn replace_courses(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SaveResponse>, AppError> {
    let Some(items) = body.as_array() else {
        return Err(AppError::BadRequest(
            "Request body must be an array of courses".to_string(),
        ));
    };

    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if let Err(item_errors) = COURSE_SCHEMA.validate(item, Mode::Record) {
            errors.extend(item_errors.into_iter().map(|mut e| {
                e.field = format!("{}.{}", index, e.field);
                e
            }));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let courses: Vec<Course> = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid course list: {}", e)))?;

    let count = state.courses.replace_all(courses).await?;
    Ok(Json(SaveResponse {
        success: true,
        count,
    }))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<CourseSummary>, AppError> {
    let course = state.courses.get(id).await.ok_or(AppError::NotFound)?;
    Ok(Json(CourseSummary::from_course(course)?))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Json(body): Json<Value>,
) -> Result<Json<CourseSummary>, AppError> {
    let req: UpdateCourseRequest = checked(body, Mode::Patch)?;
    let course = state
        .courses
        .update(id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(CourseSummary::from_course(course)?))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    if state.courses.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn course_readiness(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<Readiness>, AppError> {
    let course = state.courses.get(id).await.ok_or(AppError::NotFound)?;
    Ok(Json(course.readiness()?))
}

async fn evaluate_record(Json(body): Json<Value>) -> Json<Readiness> {
    Json(validation::evaluate(&body))
}

/// Structurally validate a JSON body, then decode it. Null attributes are
/// treated as absent.
fn checked<T: serde::de::DeserializeOwned>(mut body: Value, mode: Mode) -> Result<T, AppError> {
    let Some(map) = body.as_object_mut() else {
        return Err(AppError::BadRequest(
            "Request body must be a course object".to_string(),
        ));
    };
    map.retain(|_, value| !value.is_null());

    COURSE_SCHEMA
        .validate(&body, mode)
        .map_err(AppError::Validation)?;
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))
}
