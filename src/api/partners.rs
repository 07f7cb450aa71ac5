use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_locale, validate_required};
use super::{ApiError, ApiResponse, AppState, DeletedDto, LocaleQuery, PartnerDto};
use crate::db::PartnerInput;

#[derive(Debug, Deserialize)]
pub struct PartnerRequest {
    pub name: String,
    pub url: Option<String>,
    pub logo_base64: Option<String>,
    pub locale: Option<String>,
    #[serde(default, rename = "order")]
    pub sort_order: i32,
}

fn to_input(state: &AppState, payload: PartnerRequest) -> Result<PartnerInput, ApiError> {
    let name = validate_required("Name", &payload.name)?.to_string();
    let locale = payload
        .locale
        .unwrap_or_else(|| state.default_locale().to_string());
    validate_locale(state.locales(), &locale)?;

    let url = match payload.url.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            url::Url::parse(raw)
                .map_err(|e| ApiError::validation(format!("Invalid partner URL '{raw}': {e}")))?;
            Some(raw.to_string())
        }
    };

    Ok(PartnerInput {
        name,
        url,
        logo_base64: payload.logo_base64,
        locale,
        sort_order: payload.sort_order,
    })
}

/// GET /public/partners
pub async fn list_public_partners(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<Vec<PartnerDto>>>, ApiError> {
    let partners = state
        .store()
        .partners()
        .list(query.locale.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(
        partners.into_iter().map(PartnerDto::from).collect(),
    )))
}

/// GET /admin/partners
pub async fn list_partners(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<PartnerDto>>>, ApiError> {
    let partners = state.store().partners().list(None).await?;
    Ok(Json(ApiResponse::success(
        partners.into_iter().map(PartnerDto::from).collect(),
    )))
}

/// POST /admin/partners
pub async fn create_partner(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PartnerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartnerDto>>), ApiError> {
    let input = to_input(&state, payload)?;
    let partner = state.store().partners().create(input).await?;

    tracing::info!("Created partner {} ({})", partner.id, partner.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PartnerDto::from(partner))),
    ))
}

/// PUT /admin/partners/{id}
pub async fn update_partner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<PartnerRequest>,
) -> Result<Json<ApiResponse<PartnerDto>>, ApiError> {
    let id = validate_id("partner", id)?;
    let input = to_input(&state, payload)?;

    let partner = state
        .store()
        .partners()
        .update(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner", id))?;

    Ok(Json(ApiResponse::success(PartnerDto::from(partner))))
}

/// DELETE /admin/partners/{id}
pub async fn delete_partner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id("partner", id)?;
    if !state.store().partners().remove(id).await? {
        return Err(ApiError::not_found("Partner", id));
    }
    Ok(Json(ApiResponse::success(DeletedDto { deleted: 1 })))
}
