use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AvailabilityWindow, Booking, BookingSearchQuery, BookingStatus, SchedulingError,
};

/// Every external query the scheduling core needs, as named typed
/// operations over the hosted store. Nothing else in the cell talks to the
/// backend directly.
pub struct SchedulingStore {
    supabase: SupabaseClient,
}

impl SchedulingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    // --------------------------------------------------------------------
    // Availability windows
    // --------------------------------------------------------------------

    pub async fn fetch_availability(
        &self,
        specialist_id: &str,
        auth_token: &str,
    ) -> Result<Vec<AvailabilityWindow>, SchedulingError> {
        debug!("Fetching availability windows for specialist {}", specialist_id);

        let path = format!(
            "/rest/v1/specialist_schedules?specialist_id=eq.{}&order=id.asc",
            urlencoding::encode(specialist_id)
        );

        let result: Vec<Value> = self.request(Method::GET, &path, auth_token, None).await?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AvailabilityWindow>, _>>()
            .map_err(|e| SchedulingError::Persistence(format!("Failed to parse windows: {}", e)))
    }

    pub async fn insert_window(
        &self,
        specialist_id: &str,
        specialty: &str,
        weekday: &str,
        start_hour: i32,
        end_hour: i32,
        auth_token: &str,
    ) -> Result<AvailabilityWindow, SchedulingError> {
        let window_data = json!({
            "specialist_id": specialist_id,
            "specialty": specialty,
            "weekday": weekday,
            "start_hour": start_hour,
            "end_hour": end_hour
        });

        let result: Vec<Value> = self.request_returning(
            Method::POST,
            "/rest/v1/specialist_schedules",
            auth_token,
            Some(window_data),
        ).await?;

        let row = result.into_iter().next()
            .ok_or_else(|| SchedulingError::Persistence("Failed to create window".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| SchedulingError::Persistence(format!("Failed to parse window: {}", e)))
    }

    pub async fn find_window(
        &self,
        window_id: i64,
        auth_token: &str,
    ) -> Result<Option<AvailabilityWindow>, SchedulingError> {
        let path = format!("/rest/v1/specialist_schedules?id=eq.{}", window_id);
        let result: Vec<Value> = self.request(Method::GET, &path, auth_token, None).await?;

        match result.into_iter().next() {
            Some(row) => {
                let window = serde_json::from_value(row)
                    .map_err(|e| SchedulingError::Persistence(format!("Failed to parse window: {}", e)))?;
                Ok(Some(window))
            }
            None => Ok(None),
        }
    }

    /// Deletes answer `204 No Content`, so the response body is discarded.
    /// The owner filter makes the statement a no-op for anyone else's row.
    pub async fn delete_window(
        &self,
        window_id: i64,
        specialist_id: &str,
        auth_token: &str,
    ) -> Result<(), SchedulingError> {
        debug!("Deleting availability window {}", window_id);

        let path = format!(
            "/rest/v1/specialist_schedules?id=eq.{}&specialist_id=eq.{}",
            window_id,
            urlencoding::encode(specialist_id)
        );
        self.supabase.execute(Method::DELETE, &path, Some(auth_token), None)
            .await
            .map_err(|e| SchedulingError::Persistence(e.to_string()))
    }

    // --------------------------------------------------------------------
    // Bookings
    // --------------------------------------------------------------------

    /// Timestamps of future bookings that still occupy their slot
    /// (pending or accepted). A snapshot at query time.
    pub async fn fetch_booked_slots(
        &self,
        specialist_id: &str,
        after: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<DateTime<Utc>>, SchedulingError> {
        debug!("Fetching booked slots for specialist {}", specialist_id);

        let path = format!(
            "/rest/v1/appointments?specialist_id=eq.{}&scheduled_at=gt.{}&status=in.(pending,accepted)&select=scheduled_at",
            urlencoding::encode(specialist_id),
            urlencoding::encode(&after.to_rfc3339())
        );

        let result: Vec<Value> = self.request(Method::GET, &path, auth_token, None).await?;

        result.into_iter()
            .map(|row| {
                serde_json::from_value::<DateTime<Utc>>(row["scheduled_at"].clone())
                    .map_err(|e| SchedulingError::Persistence(format!("Failed to parse timestamp: {}", e)))
            })
            .collect()
    }

    /// Uniqueness probe at the storage boundary: any booking still occupying
    /// exactly this (specialist, timestamp)?
    pub async fn find_active_booking_at(
        &self,
        specialist_id: &str,
        at: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Option<Booking>, SchedulingError> {
        let path = format!(
            "/rest/v1/appointments?specialist_id=eq.{}&scheduled_at=eq.{}&status=in.(pending,accepted)",
            urlencoding::encode(specialist_id),
            urlencoding::encode(&at.to_rfc3339())
        );

        let result: Vec<Value> = self.request(Method::GET, &path, auth_token, None).await?;

        match result.into_iter().next() {
            Some(row) => {
                let booking = serde_json::from_value(row)
                    .map_err(|e| SchedulingError::Persistence(format!("Failed to parse booking: {}", e)))?;
                Ok(Some(booking))
            }
            None => Ok(None),
        }
    }

    pub async fn create_booking(
        &self,
        patient_id: &str,
        specialist_id: &str,
        specialty: &str,
        scheduled_at: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Booking, SchedulingError> {
        let booking_data = json!({
            "patient_id": patient_id,
            "specialist_id": specialist_id,
            "specialty": specialty,
            "scheduled_at": scheduled_at.to_rfc3339(),
            "status": BookingStatus::Pending.to_string()
        });

        let result: Vec<Value> = self.request_returning(
            Method::POST,
            "/rest/v1/appointments",
            auth_token,
            Some(booking_data),
        ).await?;

        let row = result.into_iter().next()
            .ok_or_else(|| SchedulingError::Persistence("Failed to create booking".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| SchedulingError::Persistence(format!("Failed to parse booking: {}", e)))
    }

    pub async fn find_booking(
        &self,
        booking_id: i64,
        auth_token: &str,
    ) -> Result<Booking, SchedulingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", booking_id);
        let result: Vec<Value> = self.request(Method::GET, &path, auth_token, None).await?;

        let row = result.into_iter().next().ok_or(SchedulingError::NotFound)?;

        serde_json::from_value(row)
            .map_err(|e| SchedulingError::Persistence(format!("Failed to parse booking: {}", e)))
    }

    pub async fn update_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
        comment: Option<&str>,
        auth_token: &str,
    ) -> Result<Booking, SchedulingError> {
        let mut update_data = serde_json::Map::new();
        update_data.insert("status".to_string(), json!(status.to_string()));
        if let Some(comment) = comment {
            update_data.insert("status_comment".to_string(), json!(comment));
        }

        let path = format!("/rest/v1/appointments?id=eq.{}", booking_id);
        let result: Vec<Value> = self.request_returning(
            Method::PATCH,
            &path,
            auth_token,
            Some(Value::Object(update_data)),
        ).await?;

        let row = result.into_iter().next().ok_or(SchedulingError::NotFound)?;

        serde_json::from_value(row)
            .map_err(|e| SchedulingError::Persistence(format!("Failed to parse booking: {}", e)))
    }

    pub async fn search_bookings(
        &self,
        query: &BookingSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<Booking>, SchedulingError> {
        let mut filters = Vec::new();
        if let Some(patient_id) = &query.patient_id {
            filters.push(format!("patient_id=eq.{}", urlencoding::encode(patient_id)));
        }
        if let Some(specialist_id) = &query.specialist_id {
            filters.push(format!("specialist_id=eq.{}", urlencoding::encode(specialist_id)));
        }
        if let Some(status) = query.status {
            filters.push(format!("status=eq.{}", status));
        }
        filters.push("order=scheduled_at.asc".to_string());

        let path = format!("/rest/v1/appointments?{}", filters.join("&"));
        let result: Vec<Value> = self.request(Method::GET, &path, auth_token, None).await?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Booking>, _>>()
            .map_err(|e| SchedulingError::Persistence(format!("Failed to parse bookings: {}", e)))
    }

    // --------------------------------------------------------------------
    // Plumbing
    // --------------------------------------------------------------------

    async fn request(
        &self,
        method: Method,
        path: &str,
        auth_token: &str,
        body: Option<Value>,
    ) -> Result<Vec<Value>, SchedulingError> {
        self.supabase.request(method, path, Some(auth_token), body)
            .await
            .map_err(|e| SchedulingError::Persistence(e.to_string()))
    }

    async fn request_returning(
        &self,
        method: Method,
        path: &str,
        auth_token: &str,
        body: Option<Value>,
    ) -> Result<Vec<Value>, SchedulingError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        self.supabase.request_with_headers(method, path, Some(auth_token), body, Some(headers))
            .await
            .map_err(|e| SchedulingError::Persistence(e.to_string()))
    }
}
