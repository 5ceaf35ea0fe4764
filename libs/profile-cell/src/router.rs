use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn profile_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/me", get(handlers::get_my_profile))
        .route("/", get(handlers::list_profiles))
        .route("/patients", get(handlers::list_patients))
        .route("/specialists", get(handlers::list_specialists))
        .route("/{profile_id}", get(handlers::get_profile))
        .route("/{profile_id}/enabled", patch(handlers::set_account_enabled))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn specialty_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_specialties))
        .route("/", post(handlers::add_specialty))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
