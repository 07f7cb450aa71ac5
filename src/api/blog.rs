use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_locale, validate_required};
use super::{ApiError, ApiResponse, AppState, BlogPostDto, DeletedDto, LocaleQuery};
use crate::db::{BlogPostInput, WriteOutcome};

#[derive(Debug, Deserialize)]
pub struct BlogPostRequest {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub cover_base64: Option<String>,
    pub locale: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    pub published_at: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

fn to_input(state: &AppState, payload: BlogPostRequest) -> Result<BlogPostInput, ApiError> {
    let title = validate_required("Title", &payload.title)?.to_string();
    let slug = validate_required("Slug", &payload.slug)?.to_string();
    let locale = payload
        .locale
        .unwrap_or_else(|| state.default_locale().to_string());
    validate_locale(state.locales(), &locale)?;

    if let Some(published_at) = &payload.published_at {
        chrono::DateTime::parse_from_rfc3339(published_at).map_err(|_| {
            ApiError::validation(format!(
                "published_at must be an RFC 3339 timestamp, got '{published_at}'"
            ))
        })?;
    }

    Ok(BlogPostInput {
        title,
        slug,
        body: payload.body,
        excerpt: payload.excerpt,
        cover_base64: payload.cover_base64,
        locale,
        is_published: payload.is_published,
        published_at: payload.published_at,
        seo_title: payload.seo_title,
        seo_description: payload.seo_description,
    })
}

/// GET /public/blog
pub async fn list_published_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<Vec<BlogPostDto>>>, ApiError> {
    let posts = state
        .store()
        .blog()
        .list_published(query.locale.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(
        posts.into_iter().map(BlogPostDto::from).collect(),
    )))
}

/// GET /public/blog/{slug}
pub async fn get_published_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<BlogPostDto>>, ApiError> {
    let post = state
        .store()
        .blog()
        .get_published_by_slug(&slug, query.locale.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(ApiResponse::success(BlogPostDto::from(post))))
}

/// GET /admin/blog
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BlogPostDto>>>, ApiError> {
    let posts = state.store().blog().list_all().await?;
    Ok(Json(ApiResponse::success(
        posts.into_iter().map(BlogPostDto::from).collect(),
    )))
}

/// POST /admin/blog
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BlogPostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlogPostDto>>), ApiError> {
    let input = to_input(&state, payload)?;
    let slug = input.slug.clone();

    match state.store().blog().create(input).await? {
        WriteOutcome::Done(post) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(BlogPostDto::from(post))),
        )),
        WriteOutcome::SlugTaken => Err(ApiError::conflict(format!("Slug already exists: {slug}"))),
        WriteOutcome::NotFound => Err(ApiError::internal("Blog post vanished during insert")),
    }
}

/// PUT /admin/blog/{id}
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<BlogPostRequest>,
) -> Result<Json<ApiResponse<BlogPostDto>>, ApiError> {
    let id = validate_id("post", id)?;
    let input = to_input(&state, payload)?;
    let slug = input.slug.clone();

    match state.store().blog().update(id, input).await? {
        WriteOutcome::Done(post) => Ok(Json(ApiResponse::success(BlogPostDto::from(post)))),
        WriteOutcome::SlugTaken => Err(ApiError::conflict(format!("Slug already exists: {slug}"))),
        WriteOutcome::NotFound => Err(ApiError::not_found("Post", id)),
    }
}

/// DELETE /admin/blog/{id}
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id("post", id)?;
    if !state.store().blog().remove(id).await? {
        return Err(ApiError::not_found("Post", id));
    }
    Ok(Json(ApiResponse::success(DeletedDto { deleted: 1 })))
}
