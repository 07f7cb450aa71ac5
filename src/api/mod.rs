use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domain::LocaleSet;
use crate::services::{ApplicationService, AuthService, CourseService, Notifier};
use crate::state::SharedState;

mod applications;
pub mod auth;
mod blog;
mod contacts;
mod courses;
mod error;
mod observability;
mod partners;
mod reviews;
mod system;
mod teachers;
mod track;
mod types;
mod validation;

pub use auth::AdminPrincipal;
pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn locales(&self) -> &LocaleSet {
        &self.shared.locales
    }

    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.shared.config.content.default_locale
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn course_service(&self) -> &Arc<dyn CourseService> {
        &self.shared.course_service
    }

    #[must_use]
    pub fn application_service(&self) -> &Arc<ApplicationService> {
        &self.shared.application_service
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

/// Same as [`create_app_state_from_config`] but delivers notifications to `notifier`.
pub async fn create_app_state_with_notifier(
    config: Config,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_notifier(config, notifier).await?);
    Ok(create_app_state(shared))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/auth/login", post(auth::login))
        .nest("/public", create_public_router())
        .nest("/admin", create_admin_router(state.clone()))
        .with_state(state.clone());

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/health", get(system::health))
        .with_state(state)
        .nest("/api", api_router)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locales", get(system::list_locales))
        .route("/courses", get(courses::list_active_courses))
        .route("/courses/{slug}", get(courses::get_course))
        .route("/teachers", get(teachers::list_public_teachers))
        .route("/track", get(track::list_public_track))
        .route("/partners", get(partners::list_public_partners))
        .route("/contacts", get(contacts::get_public_contacts))
        .route("/reviews", get(reviews::list_visible_reviews))
        .route("/blog", get(blog::list_published_posts))
        .route("/blog/{slug}", get(blog::get_published_post))
        .route("/applications", post(applications::submit_application))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(auth::current_admin))
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/courses/{id}",
            put(courses::update_course).delete(courses::delete_course),
        )
        .route("/applications", get(applications::list_applications))
        .route(
            "/applications/{id}",
            patch(applications::update_application_status)
                .delete(applications::delete_application),
        )
        .route(
            "/teachers",
            get(teachers::list_teachers).post(teachers::create_teacher),
        )
        .route(
            "/teachers/{id}",
            put(teachers::update_teacher).delete(teachers::delete_teacher),
        )
        .route(
            "/track",
            get(track::list_track).post(track::create_track_step),
        )
        .route(
            "/track/{id}",
            put(track::update_track_step).delete(track::delete_track_step),
        )
        .route(
            "/partners",
            get(partners::list_partners).post(partners::create_partner),
        )
        .route(
            "/partners/{id}",
            put(partners::update_partner).delete(partners::delete_partner),
        )
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/contacts/{id}",
            put(contacts::update_contact).delete(contacts::delete_contact),
        )
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/{id}",
            put(reviews::update_review).delete(reviews::delete_review),
        )
        .route("/blog", get(blog::list_posts).post(blog::create_post))
        .route("/blog/{id}", put(blog::update_post).delete(blog::delete_post))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}
