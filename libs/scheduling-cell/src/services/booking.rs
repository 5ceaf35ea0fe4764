use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::models::{
    Booking, BookingSearchQuery, CreateBookingRequest, DaySlots, SchedulingError,
    UpdateBookingStatusRequest,
};
use crate::services::slots::{generate_slots, SlotConfig};
use crate::services::store::SchedulingStore;

/// The booking flow: candidate slot generation over fetched data, and
/// validated submission of one chosen slot.
pub struct BookingService {
    store: SchedulingStore,
    slot_config: SlotConfig,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: SchedulingStore::new(config),
            slot_config: SlotConfig::default(),
        }
    }

    pub fn with_slot_config(config: &AppConfig, slot_config: SlotConfig) -> Self {
        Self {
            store: SchedulingStore::new(config),
            slot_config,
        }
    }

    /// Fetch the specialist's windows and occupied timestamps, then expand
    /// them into bookable candidates. The booked list is a snapshot; the
    /// submission path re-checks the chosen slot against the store.
    pub async fn available_slots(
        &self,
        specialist_id: &str,
        specialty: &str,
        now: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<DaySlots>, SchedulingError> {
        debug!("Generating slots for specialist {} / specialty {}", specialist_id, specialty);

        let windows = self.store.fetch_availability(specialist_id, auth_token).await?;
        let booked = self.store.fetch_booked_slots(specialist_id, now, auth_token).await?;

        let days = generate_slots(specialty, &windows, &booked, now, &self.slot_config);

        debug!("Generated {} day buckets for specialist {}", days.len(), specialist_id);
        Ok(days)
    }

    /// Validate and submit a single booking with `pending` status.
    ///
    /// Validation failures issue no request to the store. The chosen slot is
    /// re-checked against the store right before the write; the write itself
    /// is still racy without a storage-side uniqueness constraint on
    /// (specialist_id, scheduled_at), which the schema is expected to carry.
    pub async fn submit_booking(
        &self,
        request: CreateBookingRequest,
        auth_token: &str,
    ) -> Result<Booking, SchedulingError> {
        Self::validate_booking_request(&request)?;

        let existing = self.store.find_active_booking_at(
            &request.specialist_id,
            request.scheduled_at,
            auth_token,
        ).await?;

        if let Some(existing) = existing {
            warn!(
                "Slot {} for specialist {} already held by booking {}",
                request.scheduled_at, request.specialist_id, existing.id
            );
            return Err(SchedulingError::SlotTaken);
        }

        let booking = self.store.create_booking(
            request.patient_id.trim(),
            request.specialist_id.trim(),
            request.specialty.trim(),
            request.scheduled_at,
            auth_token,
        ).await?;

        info!(
            "Booking {} created for patient {} with specialist {} at {}",
            booking.id, booking.patient_id, booking.specialist_id, booking.scheduled_at
        );
        Ok(booking)
    }

    pub async fn get_booking(
        &self,
        booking_id: i64,
        auth_token: &str,
    ) -> Result<Booking, SchedulingError> {
        self.store.find_booking(booking_id, auth_token).await
    }

    pub async fn search_bookings(
        &self,
        query: BookingSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<Booking>, SchedulingError> {
        self.store.search_bookings(&query, auth_token).await
    }

    /// Move a booking through its lifecycle. Terminal statuses are
    /// immutable; the allowed transitions are pending → accepted, rejected
    /// or cancelled, and accepted → completed or cancelled.
    pub async fn update_status(
        &self,
        booking_id: i64,
        request: UpdateBookingStatusRequest,
        auth_token: &str,
    ) -> Result<Booking, SchedulingError> {
        let current = self.store.find_booking(booking_id, auth_token).await?;

        if !current.status.can_transition_to(request.status) {
            return Err(SchedulingError::InvalidStatusTransition {
                from: current.status,
                to: request.status,
            });
        }

        let updated = self.store.update_booking_status(
            booking_id,
            request.status,
            request.comment.as_deref(),
            auth_token,
        ).await?;

        info!("Booking {} moved from {} to {}", booking_id, current.status, updated.status);
        Ok(updated)
    }

    fn validate_booking_request(request: &CreateBookingRequest) -> Result<(), SchedulingError> {
        if request.patient_id.trim().is_empty() {
            return Err(SchedulingError::Validation("Patient is required".to_string()));
        }
        if request.specialist_id.trim().is_empty() {
            return Err(SchedulingError::Validation("Specialist is required".to_string()));
        }
        if request.specialty.trim().is_empty() {
            return Err(SchedulingError::Validation("Specialty is required".to_string()));
        }
        Ok(())
    }
}
