use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_locale, validate_required};
use super::{ApiError, ApiResponse, AppState, DeletedDto, LocaleQuery, TeacherDto};
use crate::db::TeacherInput;

#[derive(Debug, Deserialize)]
pub struct TeacherRequest {
    pub name: String,
    pub bio: Option<String>,
    pub photo_base64: Option<String>,
    pub socials: Option<serde_json::Value>,
    pub locale: Option<String>,
}

fn to_input(state: &AppState, payload: TeacherRequest) -> Result<TeacherInput, ApiError> {
    let name = validate_required("Name", &payload.name)?.to_string();
    let locale = payload
        .locale
        .unwrap_or_else(|| state.default_locale().to_string());
    validate_locale(state.locales(), &locale)?;

    Ok(TeacherInput {
        name,
        bio: payload.bio,
        photo_base64: payload.photo_base64,
        socials: payload.socials,
        locale,
    })
}

/// GET /public/teachers
pub async fn list_public_teachers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<Vec<TeacherDto>>>, ApiError> {
    let teachers = state.store().teachers().list(query.locale.as_deref()).await?;
    Ok(Json(ApiResponse::success(
        teachers.into_iter().map(TeacherDto::from).collect(),
    )))
}

/// GET /admin/teachers
pub async fn list_teachers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TeacherDto>>>, ApiError> {
    let teachers = state.store().teachers().list(None).await?;
    Ok(Json(ApiResponse::success(
        teachers.into_iter().map(TeacherDto::from).collect(),
    )))
}

/// POST /admin/teachers
pub async fn create_teacher(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TeacherRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TeacherDto>>), ApiError> {
    let input = to_input(&state, payload)?;
    let teacher = state.store().teachers().create(input).await?;

    tracing::info!("Created teacher {} ({})", teacher.id, teacher.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TeacherDto::from(teacher))),
    ))
}

/// PUT /admin/teachers/{id}
pub async fn update_teacher(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<TeacherRequest>,
) -> Result<Json<ApiResponse<TeacherDto>>, ApiError> {
    let id = validate_id("teacher", id)?;
    let input = to_input(&state, payload)?;

    let teacher = state
        .store()
        .teachers()
        .update(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Teacher", id))?;

    Ok(Json(ApiResponse::success(TeacherDto::from(teacher))))
}

/// DELETE /admin/teachers/{id}
pub async fn delete_teacher(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id("teacher", id)?;
    if !state.store().teachers().remove(id).await? {
        return Err(ApiError::not_found("Teacher", id));
    }
    Ok(Json(ApiResponse::success(DeletedDto { deleted: 1 })))
}
