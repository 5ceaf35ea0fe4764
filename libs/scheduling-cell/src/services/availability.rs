use tracing::debug;

use shared_config::AppConfig;

use crate::models::{AvailabilityWindow, CreateWindowRequest, SchedulingError};
use crate::services::slots::WEEKDAY_NAMES;
use crate::services::store::SchedulingStore;
use crate::services::text::normalize;

/// Management of a specialist's recurring availability windows.
pub struct AvailabilityService {
    store: SchedulingStore,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: SchedulingStore::new(config),
        }
    }

    pub async fn list_windows(
        &self,
        specialist_id: &str,
        auth_token: &str,
    ) -> Result<Vec<AvailabilityWindow>, SchedulingError> {
        self.store.fetch_availability(specialist_id, auth_token).await
    }

    /// Create a window. `start_hour < end_hour` is enforced here and only
    /// here; the slot generator tolerates malformed rows at read time.
    pub async fn create_window(
        &self,
        specialist_id: &str,
        request: CreateWindowRequest,
        auth_token: &str,
    ) -> Result<AvailabilityWindow, SchedulingError> {
        debug!("Creating availability window for specialist {}", specialist_id);

        let specialty = request.specialty.trim();
        if specialty.is_empty() {
            return Err(SchedulingError::Validation("Specialty must not be empty".to_string()));
        }

        let weekday_key = normalize(&request.weekday);
        if !WEEKDAY_NAMES.iter().any(|name| normalize(name) == weekday_key) {
            return Err(SchedulingError::Validation(
                format!("Unknown weekday: {}", request.weekday),
            ));
        }

        if !(0..=24).contains(&request.start_hour) || !(0..=24).contains(&request.end_hour) {
            return Err(SchedulingError::Validation(
                "Hours must be within the 24-hour clock".to_string(),
            ));
        }

        if request.start_hour >= request.end_hour {
            return Err(SchedulingError::Validation(
                "Start hour must be before end hour".to_string(),
            ));
        }

        self.store.insert_window(
            specialist_id,
            specialty,
            request.weekday.trim(),
            request.start_hour,
            request.end_hour,
            auth_token,
        ).await
    }

    /// Windows are never mutated in place; owners delete and recreate.
    /// Only the owner may delete a window.
    pub async fn delete_window(
        &self,
        window_id: i64,
        owner_id: &str,
        auth_token: &str,
    ) -> Result<(), SchedulingError> {
        let window = self.store.find_window(window_id, auth_token)
            .await?
            .ok_or(SchedulingError::NotFound)?;

        if window.specialist_id != owner_id {
            return Err(SchedulingError::NotOwner);
        }

        self.store.delete_window(window_id, owner_id, auth_token).await
    }
}
