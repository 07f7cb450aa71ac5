use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_locale, validate_required};
use super::{ApiError, ApiResponse, AppState, DeletedDto, LocaleQuery, TrackStepDto};
use crate::db::TrackStepInput;

#[derive(Debug, Deserialize)]
pub struct TrackStepRequest {
    pub title: String,
    pub body: Option<String>,
    #[serde(default, rename = "order")]
    pub sort_order: i32,
    pub course_links: Option<serde_json::Value>,
    pub locale: Option<String>,
}

fn to_input(state: &AppState, payload: TrackStepRequest) -> Result<TrackStepInput, ApiError> {
    let title = validate_required("Title", &payload.title)?.to_string();
    let locale = payload
        .locale
        .unwrap_or_else(|| state.default_locale().to_string());
    validate_locale(state.locales(), &locale)?;

    // A list of slugs or a label -> slug map.
    if payload
        .course_links
        .as_ref()
        .is_some_and(|v| !(v.is_array() || v.is_object() || v.is_null()))
    {
        return Err(ApiError::validation(
            "course_links must be a list or an object",
        ));
    }

    Ok(TrackStepInput {
        title,
        body: payload.body,
        sort_order: payload.sort_order,
        course_links: payload.course_links.filter(|v| !v.is_null()),
        locale,
    })
}

/// GET /public/track
pub async fn list_public_track(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<Vec<TrackStepDto>>>, ApiError> {
    let steps = state
        .store()
        .track_steps()
        .list(query.locale.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(
        steps.into_iter().map(TrackStepDto::from).collect(),
    )))
}

/// GET /admin/track
pub async fn list_track(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TrackStepDto>>>, ApiError> {
    let steps = state.store().track_steps().list(None).await?;
    Ok(Json(ApiResponse::success(
        steps.into_iter().map(TrackStepDto::from).collect(),
    )))
}

/// POST /admin/track
pub async fn create_track_step(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackStepRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TrackStepDto>>), ApiError> {
    let input = to_input(&state, payload)?;
    let step = state.store().track_steps().create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TrackStepDto::from(step))),
    ))
}

/// PUT /admin/track/{id}
pub async fn update_track_step(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<TrackStepRequest>,
) -> Result<Json<ApiResponse<TrackStepDto>>, ApiError> {
    let id = validate_id("track step", id)?;
    let input = to_input(&state, payload)?;

    let step = state
        .store()
        .track_steps()
        .update(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Track step", id))?;

    Ok(Json(ApiResponse::success(TrackStepDto::from(step))))
}

/// DELETE /admin/track/{id}
pub async fn delete_track_step(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id("track step", id)?;
    if !state.store().track_steps().remove(id).await? {
        return Err(ApiError::not_found("Track step", id));
    }
    Ok(Json(ApiResponse::success(DeletedDto { deleted: 1 })))
}
