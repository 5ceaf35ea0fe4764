use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Profile, ProfileError, Role};

pub struct ProfileService {
    supabase: SupabaseClient,
}

impl ProfileService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_profile(
        &self,
        profile_id: &str,
        auth_token: &str,
    ) -> Result<Profile, ProfileError> {
        debug!("Fetching profile: {}", profile_id);

        let path = format!("/rest/v1/profiles?id=eq.{}", urlencoding::encode(profile_id));
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| ProfileError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(ProfileError::NotFound);
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| ProfileError::Database(format!("Failed to parse profile: {}", e)))
    }

    /// All profiles, specialists grouped together (admin user table).
    pub async fn list_profiles(
        &self,
        auth_token: &str,
    ) -> Result<Vec<Profile>, ProfileError> {
        debug!("Listing all profiles");

        let path = "/rest/v1/profiles?order=role.asc,last_name.asc";
        self.fetch_profiles(path, auth_token).await
    }

    pub async fn list_patients(
        &self,
        auth_token: &str,
    ) -> Result<Vec<Profile>, ProfileError> {
        debug!("Listing patient profiles");

        let path = "/rest/v1/profiles?role=eq.patient&order=last_name.asc";
        self.fetch_profiles(path, auth_token).await
    }

    /// Approved specialists, optionally narrowed to one specialty.
    /// Unapproved accounts never show up in booking flows.
    pub async fn list_specialists(
        &self,
        specialty: Option<&str>,
        auth_token: &str,
    ) -> Result<Vec<Profile>, ProfileError> {
        debug!("Listing specialists (specialty filter: {:?})", specialty);

        let mut path = "/rest/v1/profiles?role=eq.specialist&account_enabled=eq.true".to_string();
        if let Some(specialty) = specialty {
            path.push_str(&format!("&specialty=eq.{}", urlencoding::encode(specialty)));
        }
        path.push_str("&order=last_name.asc");

        self.fetch_profiles(&path, auth_token).await
    }

    /// Admin approval switch for specialist accounts; also used to block
    /// a user outright.
    pub async fn set_account_enabled(
        &self,
        profile_id: &str,
        enabled: bool,
        auth_token: &str,
    ) -> Result<Profile, ProfileError> {
        debug!("Setting account_enabled={} for profile {}", enabled, profile_id);

        let path = format!("/rest/v1/profiles?id=eq.{}", urlencoding::encode(profile_id));
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "account_enabled": enabled })),
            Some(headers),
        ).await.map_err(|e| ProfileError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(ProfileError::NotFound);
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| ProfileError::Database(format!("Failed to parse profile: {}", e)))
    }

    pub fn is_administrator(profile: &Profile) -> bool {
        profile.role == Role::Administrator
    }

    async fn fetch_profiles(
        &self,
        path: &str,
        auth_token: &str,
    ) -> Result<Vec<Profile>, ProfileError> {
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            Some(auth_token),
            None,
        ).await.map_err(|e| ProfileError::Database(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Profile>, _>>()
            .map_err(|e| ProfileError::Database(format!("Failed to parse profiles: {}", e)))
    }
}
