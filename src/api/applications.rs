use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{
    normalize_phone, normalize_telegram_username, validate_applicant_name, validate_id,
};
use super::{ApiError, ApiResponse, AppState, ApplicationDto, DeletedDto};
use crate::domain::ApplicationStatus;
use crate::services::ApplicationSubmission;

#[derive(Debug, Deserialize)]
pub struct SubmitApplicationRequest {
    pub name: String,
    pub phone: String,
    pub tg_username: String,
    pub course: Option<String>,
    pub course_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

/// POST /public/applications
/// Records an application; staff notification happens in the background
pub async fn submit_application(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationDto>>), ApiError> {
    let submission = ApplicationSubmission {
        name: validate_applicant_name(&payload.name)?,
        phone: normalize_phone(&payload.phone)?,
        tg_username: normalize_telegram_username(&payload.tg_username)?,
        course: payload.course,
        course_id: payload.course_id,
    };

    let application = state.application_service().submit(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ApplicationDto::from(application))),
    ))
}

/// GET /admin/applications
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<ApiResponse<Vec<ApplicationDto>>>, ApiError> {
    let applications = state.application_service().list(query.status).await?;
    Ok(Json(ApiResponse::success(
        applications.into_iter().map(ApplicationDto::from).collect(),
    )))
}

/// PATCH /admin/applications/{id}
pub async fn update_application_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<ApplicationDto>>, ApiError> {
    let id = validate_id("application", id)?;
    let application = state
        .application_service()
        .set_status(id, payload.status)
        .await?;

    Ok(Json(ApiResponse::success(ApplicationDto::from(application))))
}

/// DELETE /admin/applications/{id}
pub async fn delete_application(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id("application", id)?;
    state.application_service().remove(id).await?;
    Ok(Json(ApiResponse::success(DeletedDto { deleted: 1 })))
}
