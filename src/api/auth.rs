use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::AuthError;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: String,
}

#[derive(Serialize)]
pub struct PrincipalResponse {
    pub username: String,
}

/// The admin principal attached to a request that passed [`require_admin`].
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub String);

// ============================================================================
// Middleware
// ============================================================================

/// Rejects the request with 401 before the handler runs unless it carries a
/// valid `Authorization: Bearer <token>` naming the admin principal.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers);

    let principal = state.auth_service().authorize(token).map_err(|e| {
        tracing::debug!("Admin request rejected: {e}");
        ApiError::from(e)
    })?;

    tracing::Span::current().record("admin", principal.as_str());
    request.extensions_mut().insert(AdminPrincipal(principal));

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    scheme
        .eq_ignore_ascii_case("bearer")
        .then_some(token.trim())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Exchange admin credentials for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.login.is_empty() || payload.password.is_empty() {
        tracing::debug!("Login rejected: empty login or password");
        return Err(ApiError::from(AuthError::InvalidCredentials));
    }

    let result = state
        .auth_service()
        .login(&payload.login, &payload.password)
        .await
        .inspect_err(|e| tracing::warn!("Login failed for '{}': {e}", payload.login))?;

    tracing::info!(
        "Admin '{}' logged in via {:?}",
        result.identity.username,
        result.identity.source
    );

    Ok(Json(ApiResponse::success(LoginResponse {
        access_token: result.access_token,
        token_type: "bearer",
        expires_at: result.expires_at.to_rfc3339(),
    })))
}

/// GET /admin/me
pub async fn current_admin(
    Extension(AdminPrincipal(username)): Extension<AdminPrincipal>,
) -> Json<ApiResponse<PrincipalResponse>> {
    Json(ApiResponse::success(PrincipalResponse { username }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("Basic abc")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
