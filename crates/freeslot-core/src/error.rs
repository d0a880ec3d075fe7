//! Error types for availability computation and provider access.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the slot computation itself.
///
/// The scan is pure and total over a valid window, so a malformed window is
/// the only way it can fail.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid time range: time_min {time_min} must be before time_max {time_max}")]
    InvalidRange {
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    },
}

pub type Result<T> = std::result::Result<T, SlotError>;

/// Failures at the calendar-provider boundary.
///
/// Kept separate from [`SlotError`] so callers can always tell "the provider
/// broke" apart from "the requested window was malformed". Absent data for a
/// requested calendar is an error, never an empty busy list.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Authentication with the calendar provider failed: {0}")]
    Auth(String),

    #[error("Transport error talking to the calendar provider: {0}")]
    Transport(String),

    #[error("Provider returned no data for calendar '{0}'")]
    MissingCalendar(String),

    #[error("Provider reported an error for calendar '{calendar_id}': {reason}")]
    CalendarError { calendar_id: String, reason: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Operation not supported by this provider: {0}")]
    Unsupported(&'static str),
}

/// Union error for the availability service, which spans both the provider
/// boundary and the pure computation.
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
