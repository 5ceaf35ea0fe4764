use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateSpecialtyRequest, ProfileError, SetAccountEnabledRequest};
use crate::services::{profile::ProfileService, specialty::SpecialtyService};

#[derive(Debug, Deserialize)]
pub struct SpecialistQuery {
    pub specialty: Option<String>,
}

fn map_profile_error(error: ProfileError) -> AppError {
    match error {
        ProfileError::NotFound => AppError::NotFound("Profile not found".to_string()),
        ProfileError::Validation(msg) => AppError::ValidationError(msg),
        ProfileError::Unauthorized => AppError::Forbidden("Not allowed".to_string()),
        ProfileError::Database(msg) => AppError::Database(msg),
    }
}

/// Administrator gate: the clinic role lives in the profiles table, not in
/// the token, so it has to be looked up per request.
async fn require_administrator(
    service: &ProfileService,
    user: &User,
    token: &str,
) -> Result<(), AppError> {
    let profile = service.get_profile(&user.id, token)
        .await
        .map_err(map_profile_error)?;

    if !ProfileService::is_administrator(&profile) {
        return Err(AppError::Forbidden("Administrator role required".to_string()));
    }

    Ok(())
}

#[axum::debug_handler]
pub async fn get_my_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&state);

    let profile = service.get_profile(&user.id, auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!(profile)))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(_user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(profile_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&state);

    let profile = service.get_profile(&profile_id, auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!(profile)))
}

#[axum::debug_handler]
pub async fn list_profiles(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&state);
    require_administrator(&service, &user, auth.token()).await?;

    let profiles = service.list_profiles(auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!({
        "profiles": profiles,
        "total": profiles.len()
    })))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&state);
    require_administrator(&service, &user, auth.token()).await?;

    let patients = service.list_patients(auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn list_specialists(
    State(state): State<Arc<AppConfig>>,
    Extension(_user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<SpecialistQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&state);

    let specialists = service.list_specialists(query.specialty.as_deref(), auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!({
        "specialists": specialists,
        "total": specialists.len()
    })))
}

#[axum::debug_handler]
pub async fn set_account_enabled(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(profile_id): Path<String>,
    Json(request): Json<SetAccountEnabledRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Account enabled change requested by {}", user.id);

    let service = ProfileService::new(&state);
    require_administrator(&service, &user, auth.token()).await?;

    let profile = service.set_account_enabled(&profile_id, request.account_enabled, auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!(profile)))
}

#[axum::debug_handler]
pub async fn list_specialties(
    State(state): State<Arc<AppConfig>>,
    Extension(_user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialtyService::new(&state);

    let specialties = service.list_specialties(auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!({
        "specialties": specialties,
        "total": specialties.len()
    })))
}

#[axum::debug_handler]
pub async fn add_specialty(
    State(state): State<Arc<AppConfig>>,
    Extension(_user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateSpecialtyRequest>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialtyService::new(&state);

    let specialty = service.add_specialty(&request.name, auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!(specialty)))
}
