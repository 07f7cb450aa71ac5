use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_id;
use super::{
    ApiError, ApiResponse, AppState, CourseDto, CourseUpdateDto, DeletedDto, FamilySyncDto,
    LocaleQuery,
};
use crate::db::CourseInput;
use crate::domain::CourseId;

#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub name: String,
    pub language: String,
    pub level: Option<String>,
    pub price: Option<String>,
    pub discount: Option<String>,
    pub duration: Option<String>,
    pub advantages: Option<Vec<String>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub slug: String,
    pub description: Option<String>,
    pub locale: Option<String>,
}

const fn default_active() -> bool {
    true
}

impl CourseRequest {
    fn into_input(self, default_locale: &str) -> CourseInput {
        CourseInput {
            name: self.name.trim().to_string(),
            language: self.language,
            level: self.level,
            price: self.price,
            discount: self.discount,
            duration: self.duration,
            advantages: self.advantages,
            is_active: self.is_active,
            slug: self.slug.trim().to_string(),
            description: self.description,
            locale: self.locale.unwrap_or_else(|| default_locale.to_string()),
        }
    }
}

/// GET /admin/courses
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CourseDto>>>, ApiError> {
    let courses = state.course_service().list_all().await?;
    Ok(Json(ApiResponse::success(
        courses.into_iter().map(CourseDto::from).collect(),
    )))
}

/// POST /admin/courses
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CourseDto>>), ApiError> {
    let input = payload.into_input(state.default_locale());
    let course = state.course_service().create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CourseDto::from(course))),
    ))
}

/// PUT /admin/courses/{id}
/// Replaces the row's fields; `is_active` is applied to every locale variant
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<CourseRequest>,
) -> Result<Json<ApiResponse<CourseUpdateDto>>, ApiError> {
    let id = validate_id("course", id)?;
    let input = payload.into_input(state.default_locale());

    let update = state
        .course_service()
        .update(CourseId::new(id), input)
        .await?;

    Ok(Json(ApiResponse::success(CourseUpdateDto {
        course: CourseDto::from(update.course),
        family: FamilySyncDto::from(update.family),
    })))
}

/// DELETE /admin/courses/{id}
/// Deletes the course together with all its locale variants
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id("course", id)?;
    let family = state.course_service().delete(CourseId::new(id)).await?;

    Ok(Json(ApiResponse::success(DeletedDto {
        deleted: family.rows_affected,
    })))
}

/// GET /public/courses
pub async fn list_active_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<Vec<CourseDto>>>, ApiError> {
    let courses = state
        .course_service()
        .list_active(query.locale.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(
        courses.into_iter().map(CourseDto::from).collect(),
    )))
}

/// GET /public/courses/{slug}
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<CourseDto>>, ApiError> {
    let course = state
        .course_service()
        .get_by_slug(&slug, query.locale.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(CourseDto::from(course))))
}
