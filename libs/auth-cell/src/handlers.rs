use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    body::Body,
    Json,
};
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::extractor::extract_user;
use shared_utils::jwt;

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match jwt::validate_token(&token, &config.supabase_jwt_secret) {
        Ok(user) => {
            let response = TokenResponse {
                valid: true,
                user_id: user.id,
                email: user.email,
                role: user.role,
            };

            Ok(Json(response))
        },
        Err(err) => Err(AppError::Auth(err)),
    }
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    debug!("Verifying token");

    let token = extract_bearer_token(&headers)?;

    match jwt::validate_token(&token, &config.supabase_jwt_secret) {
        Ok(_) => Ok(Json(json!({ "valid": true }))),
        Err(_) => Ok(Json(json!({ "valid": false }))),
    }
}

/// Authenticated session profile: the auth user plus the clinic profile.
/// Specialists whose account an administrator has not yet enabled are
/// refused here, mirroring the login gate of the patient-facing app.
pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
    req: Request<Body>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = extract_user(&req)?;
    debug!("Getting session profile for user: {}", user.id);

    let token = extract_bearer_token(&headers)?;

    let client = SupabaseClient::new(&config);

    let auth_user = client.get_auth_user(&token)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let profile = client.get_clinic_profile(&user.id, &token)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let is_specialist = profile["role"].as_str() == Some("specialist");
    let enabled = profile["account_enabled"].as_bool().unwrap_or(false);
    if is_specialist && !enabled {
        return Err(AppError::Forbidden(
            "Account pending administrator approval".to_string(),
        ));
    }

    Ok(Json(json!({
        "user_id": user.id,
        "auth_user": auth_user,
        "profile": profile
    })))
}
