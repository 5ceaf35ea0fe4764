use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        // Availability window management
        .route("/specialists/{specialist_id}/windows", get(handlers::list_windows))
        .route("/specialists/{specialist_id}/windows", post(handlers::create_window))
        .route("/windows/{window_id}", delete(handlers::delete_window))

        // Candidate slot generation
        .route("/specialists/{specialist_id}/slots", get(handlers::available_slots))

        // Bookings
        .route("/bookings", post(handlers::submit_booking))
        .route("/bookings", get(handlers::search_bookings))
        .route("/bookings/{booking_id}/status", patch(handlers::update_booking_status))

        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
