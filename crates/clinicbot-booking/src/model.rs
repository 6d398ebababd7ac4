//! Data model — reduced DTOs the agent sees, plus the remote wire formats.
//!
//! The remote availability response groups slots by day, then by time
//! window; inside a window the `providers`, `services`, and `durations`
//! arrays are parallel and index-aligned — position *i* across all three
//! describes one slot. [`flatten_days`] enforces that invariant and turns
//! the nesting into a flat `Vec<AvailabilitySlot>`.

use serde::{Deserialize, Serialize};

use crate::error::BookingError;

// ─────────────────────────────────────────────
// Reduced DTOs
// ─────────────────────────────────────────────

/// A bookable clinic offering. Projected to `{id, name}` from the catalog;
/// any extra remote fields are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
}

/// A staff member who can perform a service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: i64,
    pub name: String,
}

/// One free slot: a provider can perform a service on a day, within a time
/// window, with an expected duration in minutes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AvailabilitySlot {
    pub service_id: i64,
    pub provider_id: i64,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: i64,
}

// ─────────────────────────────────────────────
// Query
// ─────────────────────────────────────────────

/// An availability lookup: a date range plus the service and provider ids
/// to match. Both id lists must be non-empty.
#[derive(Clone, Debug)]
pub struct AvailabilityQuery {
    /// Start of the range, `YYYY-MM-DDTHH:MM:SSZ`.
    pub date_init: String,
    /// End of the range, `YYYY-MM-DDTHH:MM:SSZ`.
    pub date_end: String,
    pub services: Vec<i64>,
    pub providers: Vec<i64>,
}

impl AvailabilityQuery {
    /// Reject queries the remote can never answer meaningfully.
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.services.is_empty() {
            return Err(BookingError::InvalidQuery(
                "services must not be empty".to_string(),
            ));
        }
        if self.providers.is_empty() {
            return Err(BookingError::InvalidQuery(
                "providers must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Wire formats
// ─────────────────────────────────────────────

/// The `{data: [...]}` envelope every booking endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Vec<T>,
}

/// POST body for the availability endpoint (camelCase on the wire).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AvailabilityRequest<'a> {
    pub date_init: &'a str,
    pub date_end: &'a str,
    pub services: &'a [i64],
    pub providers: &'a [i64],
}

/// The remote's grouping of time windows under one calendar day.
#[derive(Debug, Deserialize)]
pub(crate) struct DayRecord {
    pub day: String,
    pub hours: Vec<TimeWindow>,
}

/// One time window with position-aligned slot arrays.
#[derive(Debug, Deserialize)]
pub(crate) struct TimeWindow {
    pub start: String,
    pub end: String,
    pub providers: Vec<i64>,
    pub services: Vec<i64>,
    pub durations: Vec<i64>,
}

// ─────────────────────────────────────────────
// Flattening
// ─────────────────────────────────────────────

/// Flatten day records into slots, preserving day → window → index order.
///
/// Errors with `MalformedResponse` if any window's parallel arrays disagree
/// on length.
pub(crate) fn flatten_days(days: Vec<DayRecord>) -> Result<Vec<AvailabilitySlot>, BookingError> {
    let mut slots = Vec::new();
    for record in days {
        for window in record.hours {
            if window.providers.len() != window.services.len()
                || window.providers.len() != window.durations.len()
            {
                return Err(BookingError::MalformedResponse(format!(
                    "misaligned slot arrays in window {}-{} on {}: \
                     {} providers, {} services, {} durations",
                    window.start,
                    window.end,
                    record.day,
                    window.providers.len(),
                    window.services.len(),
                    window.durations.len(),
                )));
            }
            for i in 0..window.providers.len() {
                slots.push(AvailabilitySlot {
                    service_id: window.services[i],
                    provider_id: window.providers[i],
                    day: record.day.clone(),
                    start_time: window.start.clone(),
                    end_time: window.end.clone(),
                    duration: window.durations[i],
                });
            }
        }
    }
    Ok(slots)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
