use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_locale};
use super::{ApiError, ApiResponse, AppState, ContactDto, DeletedDto, LocaleQuery};
use crate::db::ContactInput;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub locale: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub socials: Option<serde_json::Value>,
    pub map_embed: Option<String>,
}

fn to_input(state: &AppState, payload: ContactRequest) -> Result<ContactInput, ApiError> {
    let locale = payload
        .locale
        .unwrap_or_else(|| state.default_locale().to_string());
    validate_locale(state.locales(), &locale)?;

    if payload
        .socials
        .as_ref()
        .is_some_and(|v| !(v.is_object() || v.is_null()))
    {
        return Err(ApiError::validation(
            "socials must be an object of network name to link",
        ));
    }

    Ok(ContactInput {
        locale,
        address: payload.address,
        phone: payload.phone,
        email: payload.email,
        socials: payload.socials.filter(|v| !v.is_null()),
        map_embed: payload.map_embed,
    })
}

/// GET /public/contacts
/// One contact block: the oldest one for the requested locale
pub async fn get_public_contacts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<ContactDto>>, ApiError> {
    let contact = state
        .store()
        .contacts()
        .first(query.locale.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Contacts not found".to_string()))?;

    Ok(Json(ApiResponse::success(ContactDto::from(contact))))
}

/// GET /admin/contacts
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ContactDto>>>, ApiError> {
    let contacts = state.store().contacts().list_all().await?;
    Ok(Json(ApiResponse::success(
        contacts.into_iter().map(ContactDto::from).collect(),
    )))
}

/// POST /admin/contacts
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContactDto>>), ApiError> {
    let input = to_input(&state, payload)?;
    let contact = state.store().contacts().create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ContactDto::from(contact))),
    ))
}

/// PUT /admin/contacts/{id}
pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<ApiResponse<ContactDto>>, ApiError> {
    let id = validate_id("contact", id)?;
    let input = to_input(&state, payload)?;

    let contact = state
        .store()
        .contacts()
        .update(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact", id))?;

    Ok(Json(ApiResponse::success(ContactDto::from(contact))))
}

/// DELETE /admin/contacts/{id}
pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id("contact", id)?;
    if !state.store().contacts().remove(id).await? {
        return Err(ApiError::not_found("Contact", id));
    }
    Ok(Json(ApiResponse::success(DeletedDto { deleted: 1 })))
}
