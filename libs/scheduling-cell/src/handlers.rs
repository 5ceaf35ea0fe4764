use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    BookingSearchQuery, BookingStatus, CreateBookingRequest, CreateWindowRequest,
    SchedulingError, UpdateBookingStatusRequest,
};
use crate::services::{availability::AvailabilityService, booking::BookingService};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub specialty: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub patient_id: Option<String>,
    pub specialist_id: Option<String>,
    pub status: Option<BookingStatus>,
}

fn map_scheduling_error(error: SchedulingError) -> AppError {
    match error {
        SchedulingError::Validation(msg) => AppError::ValidationError(msg),
        SchedulingError::SlotTaken => {
            AppError::Conflict("Slot is no longer available".to_string())
        }
        SchedulingError::NotOwner => AppError::Forbidden(
            "Availability windows can only be managed by their owner".to_string(),
        ),
        SchedulingError::NotFound => AppError::NotFound("Not found".to_string()),
        SchedulingError::InvalidStatusTransition { from, to } => {
            AppError::ValidationError(format!("Booking cannot move from {} to {}", from, to))
        }
        SchedulingError::Persistence(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// AVAILABILITY WINDOWS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_windows(
    State(state): State<Arc<AppConfig>>,
    Extension(_user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(specialist_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);

    let windows = service.list_windows(&specialist_id, auth.token())
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "windows": windows,
        "total": windows.len()
    })))
}

#[axum::debug_handler]
pub async fn create_window(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(specialist_id): Path<String>,
    Json(request): Json<CreateWindowRequest>,
) -> Result<Json<Value>, AppError> {
    // Windows can only be created on one's own schedule.
    if user.id != specialist_id {
        return Err(AppError::Forbidden(
            "Availability windows can only be managed by their owner".to_string(),
        ));
    }

    let service = AvailabilityService::new(&state);

    let window = service.create_window(&specialist_id, request, auth.token())
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(window)))
}

#[axum::debug_handler]
pub async fn delete_window(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(window_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);

    service.delete_window(window_id, &user.id, auth.token())
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({ "deleted": window_id })))
}

// ==============================================================================
// SLOT GENERATION
// ==============================================================================

#[axum::debug_handler]
pub async fn available_slots(
    State(state): State<Arc<AppConfig>>,
    Extension(_user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(specialist_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    debug!("Slot request for specialist {} / {}", specialist_id, query.specialty);

    let service = BookingService::new(&state);

    let days = service.available_slots(&specialist_id, &query.specialty, Utc::now(), auth.token())
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "specialist_id": specialist_id,
        "specialty": query.specialty,
        "days": days
    })))
}

// ==============================================================================
// BOOKINGS
// ==============================================================================

#[axum::debug_handler]
pub async fn submit_booking(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Booking submission by user {}", user.id);

    let service = BookingService::new(&state);

    let booking = service.submit_booking(request, auth.token())
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(booking)))
}

#[axum::debug_handler]
pub async fn search_bookings(
    State(state): State<Arc<AppConfig>>,
    Extension(_user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let search = BookingSearchQuery {
        patient_id: query.patient_id,
        specialist_id: query.specialist_id,
        status: query.status,
    };

    let bookings = service.search_bookings(search, auth.token())
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "bookings": bookings,
        "total": bookings.len()
    })))
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(booking_id): Path<i64>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Status change for booking {} requested by {}", booking_id, user.id);

    let service = BookingService::new(&state);

    let booking = service.update_status(booking_id, request, auth.token())
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(booking)))
}
