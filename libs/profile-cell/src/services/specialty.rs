use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ProfileError, Specialty};

pub struct SpecialtyService {
    supabase: SupabaseClient,
}

impl SpecialtyService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_specialties(
        &self,
        auth_token: &str,
    ) -> Result<Vec<Specialty>, ProfileError> {
        debug!("Listing specialties");

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            "/rest/v1/specialties?order=name.asc",
            Some(auth_token),
            None,
        ).await.map_err(|e| ProfileError::Database(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Specialty>, _>>()
            .map_err(|e| ProfileError::Database(format!("Failed to parse specialties: {}", e)))
    }

    /// Specialty names are stored as entered; normalization happens only at
    /// comparison time in the scheduling flow.
    pub async fn add_specialty(
        &self,
        name: &str,
        auth_token: &str,
    ) -> Result<Specialty, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::Validation("Specialty name must not be empty".to_string()));
        }

        debug!("Adding specialty: {}", name);

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/specialties",
            Some(auth_token),
            Some(json!({ "name": name })),
            Some(headers),
        ).await.map_err(|e| ProfileError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(ProfileError::Database("Failed to create specialty".to_string()));
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| ProfileError::Database(format!("Failed to parse specialty: {}", e)))
    }
}
