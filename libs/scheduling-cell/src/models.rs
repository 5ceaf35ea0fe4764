use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// A recurring weekly slot template owned by one specialist. Windows are
/// never edited in place; changes are delete + recreate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: i64,
    pub specialist_id: String,
    /// Free-text label as stored; normalized only for comparison.
    pub specialty: String,
    /// One of the seven weekday names, e.g. "Lunes".
    pub weekday: String,
    /// 24-hour clock; `start_hour < end_hour` is enforced at creation and
    /// deliberately not re-validated at read time.
    pub start_hour: i32,
    pub end_hour: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWindowRequest {
    pub specialty: String,
    pub weekday: String,
    pub start_hour: i32,
    pub end_hour: i32,
}

/// One calendar day's surviving candidate slots, ordered by time.
/// Ephemeral: recomputed on every generation pass, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<DateTime<Utc>>,
}

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub patient_id: String,
    pub specialist_id: String,
    pub specialty: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub status_comment: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Terminal statuses free the slot and accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// A booking in this status still occupies its slot.
    pub fn occupies_slot(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Accepted)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        match self {
            BookingStatus::Pending => matches!(
                next,
                BookingStatus::Accepted | BookingStatus::Rejected | BookingStatus::Cancelled
            ),
            BookingStatus::Accepted => matches!(
                next,
                BookingStatus::Completed | BookingStatus::Cancelled
            ),
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Accepted => write!(f, "accepted"),
            BookingStatus::Rejected => write!(f, "rejected"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub patient_id: String,
    pub specialist_id: String,
    pub specialty: String,
    /// One candidate slot previously produced by the slot generator in the
    /// same interaction.
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingSearchQuery {
    pub patient_id: Option<String>,
    pub specialist_id: Option<String>,
    pub status: Option<BookingStatus>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Slot is no longer available")]
    SlotTaken,

    #[error("Availability windows can only be managed by their owner")]
    NotOwner,

    #[error("Not found")]
    NotFound,

    #[error("Booking cannot move from {from} to {to}")]
    InvalidStatusTransition { from: BookingStatus, to: BookingStatus },

    #[error("Persistence error: {0}")]
    Persistence(String),
}
