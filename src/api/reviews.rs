use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_locale, validate_required};
use super::{ApiError, ApiResponse, AppState, DeletedDto, LocaleQuery, ReviewDto};
use crate::db::ReviewInput;

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    pub locale: Option<String>,
}

const fn default_visible() -> bool {
    true
}

fn to_input(state: &AppState, payload: ReviewRequest) -> Result<ReviewInput, ApiError> {
    let name = validate_required("Name", &payload.name)?.to_string();
    let quote = validate_required("Quote", &payload.quote)?.to_string();
    let locale = payload
        .locale
        .unwrap_or_else(|| state.default_locale().to_string());
    validate_locale(state.locales(), &locale)?;

    Ok(ReviewInput {
        name,
        role: payload.role,
        quote,
        is_visible: payload.is_visible,
        locale,
    })
}

/// GET /public/reviews
pub async fn list_visible_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state
        .store()
        .reviews()
        .list_visible(query.locale.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from).collect(),
    )))
}

/// GET /admin/reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state.store().reviews().list_all().await?;
    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from).collect(),
    )))
}

/// POST /admin/reviews
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), ApiError> {
    let input = to_input(&state, payload)?;
    let review = state.store().reviews().create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReviewDto::from(review))),
    ))
}

/// PUT /admin/reviews/{id}
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id("review", id)?;
    let input = to_input(&state, payload)?;

    let review = state
        .store()
        .reviews()
        .update(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Review", id))?;

    Ok(Json(ApiResponse::success(ReviewDto::from(review))))
}

/// DELETE /admin/reviews/{id}
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id("review", id)?;
    if !state.store().reviews().remove(id).await? {
        return Err(ApiError::not_found("Review", id));
    }
    Ok(Json(ApiResponse::success(DeletedDto { deleted: 1 })))
}
