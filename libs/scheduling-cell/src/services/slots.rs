use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::warn;

use crate::models::{AvailabilityWindow, DaySlots};
use crate::services::text::normalize;

/// Weekday display names, indexed by days-from-Sunday. The stored window
/// `weekday` field holds one of these (modulo case and accents).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Domingo", "Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado",
];

/// Localized weekday name for a date. Pure and total.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// Slot generation parameters. Callers normally take the defaults; they are
/// explicit configuration rather than buried constants so tests and future
/// clinics can vary them.
#[derive(Debug, Clone, Copy)]
pub struct SlotConfig {
    /// Forward calendar days considered, starting today.
    pub horizon_days: i64,
    /// Minute offset of the second sub-slot within each hour. Zero means
    /// hourly slots only.
    pub granularity_minutes: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            horizon_days: 15,
            granularity_minutes: 30,
        }
    }
}

/// Expand recurring weekly availability windows into concrete bookable
/// timestamps over the configured horizon.
///
/// Pure computation over already-fetched data: no I/O, no shared state,
/// deterministic for a fixed `now`. Guarantees that every emitted slot is
/// strictly after `now` and does not coincide with any `booked` timestamp
/// (exact equality is the sole conflict test; a booking occupies exactly
/// one generated slot).
///
/// Malformed windows (`start_hour >= end_hour`, out-of-range hours) yield
/// zero slots for their day rather than an error.
pub fn generate_slots(
    specialty: &str,
    windows: &[AvailabilityWindow],
    booked: &[DateTime<Utc>],
    now: DateTime<Utc>,
    config: &SlotConfig,
) -> Vec<DaySlots> {
    let wanted = normalize(specialty);
    let booked: HashSet<DateTime<Utc>> = booked.iter().copied().collect();

    // A zero granularity collapses to one slot per hour instead of
    // emitting :00 twice.
    let mut sub_slots = vec![0];
    if config.granularity_minutes != 0 {
        sub_slots.push(config.granularity_minutes);
    }

    let mut days = Vec::new();

    for offset in 0..config.horizon_days {
        let date = (now + Duration::days(offset)).date_naive();
        let day_key = normalize(weekday_name(date));

        let mut matching = windows.iter().filter(|w| {
            normalize(&w.weekday) == day_key && normalize(&w.specialty) == wanted
        });

        // Stored data carries at most one window per (weekday, specialty).
        // If a duplicate slips in, the first stored window wins.
        let Some(window) = matching.next() else { continue };
        if matching.next().is_some() {
            warn!(
                "Multiple availability windows for specialist {} on {} / {}; using window {}",
                window.specialist_id, window.weekday, window.specialty, window.id
            );
        }

        let mut slots = Vec::new();
        for hour in window.start_hour..window.end_hour {
            let Ok(hour) = u32::try_from(hour) else { continue };
            for &minute in &sub_slots {
                let Some(naive) = date.and_hms_opt(hour, minute, 0) else { continue };
                let candidate = naive.and_utc();

                if candidate > now && !booked.contains(&candidate) {
                    slots.push(candidate);
                }
            }
        }

        if !slots.is_empty() {
            days.push(DaySlots { date, slots });
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn weekday_names_cover_a_full_week() {
        // 2026-08-23 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(sunday.weekday(), Weekday::Sun);

        let names: Vec<&str> = (0..7)
            .map(|d| weekday_name(sunday + Duration::days(d)))
            .collect();

        assert_eq!(names, WEEKDAY_NAMES.to_vec());
    }

    #[test]
    fn default_config_matches_clinic_policy() {
        let config = SlotConfig::default();
        assert_eq!(config.horizon_days, 15);
        assert_eq!(config.granularity_minutes, 30);
    }

    #[test]
    fn zero_granularity_emits_each_hour_once() {
        use chrono::{TimeZone, Utc};

        let windows = vec![AvailabilityWindow {
            id: 1,
            specialist_id: "specialist-1".to_string(),
            specialty: "Cardiología".to_string(),
            weekday: "Lunes".to_string(),
            start_hour: 8,
            end_hour: 10,
        }];
        // 2025-06-01 is a Sunday.
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let config = SlotConfig { horizon_days: 2, granularity_minutes: 0 };

        let days = generate_slots("Cardiología", &windows, &[], now, &config);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].slots, vec![
            Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
        ]);
    }
}
