//! Data model for free/busy input and computed availability output.
//!
//! All intervals are half-open `[start, end)` in UTC. Inputs arriving with a
//! non-UTC offset are normalized before they reach these types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Fixed note attached to every emitted slot.
pub const SLOT_NOTE: &str = "Available for travel";

/// A busy period reported for a single calendar, half-open `[start, end)`.
///
/// A period ending exactly when a day starts (or starting exactly when it
/// ends) does not overlap that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBusyPeriod")]
pub struct BusyPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Unvalidated mirror of [`BusyPeriod`]; deserialization goes through
/// [`BusyPeriod::new`] so the wire path enforces the same invariant.
#[derive(Deserialize)]
struct RawBusyPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawBusyPeriod> for BusyPeriod {
    type Error = SlotError;

    fn try_from(raw: RawBusyPeriod) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl BusyPeriod {
    /// Builds a busy period, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(SlotError::InvalidRange {
                time_min: start,
                time_max: end,
            });
        }
        Ok(Self { start, end })
    }

    /// Half-open overlap test against `[other_start, other_end)`.
    pub fn overlaps(&self, other_start: DateTime<Utc>, other_end: DateTime<Utc>) -> bool {
        other_start < self.end && other_end > self.start
    }
}

/// Busy periods keyed by calendar identifier. Periods may overlap across
/// calendars; a day is blocked if any calendar is busy on it.
pub type BusyCalendars = BTreeMap<String, Vec<BusyPeriod>>;

/// A computed free day at the granularity the planner works with.
///
/// `end_date` keeps the clipped instant when the requested window ends
/// mid-day, so duration and PTO counts never overrun the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Whole days spanned: 1 for a full day, 0 when the window clips the day.
    pub duration: i64,
    /// Monday-to-Friday days within the slot; the PTO cost of using it.
    pub weekdays_pto_count: u32,
    pub notes: String,
}

/// Requested window echoed back in the report envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Summary envelope handed to the downstream planning workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub available_slots: Vec<AvailableSlot>,
    /// Whole-day count of the requested window.
    pub total_days_checked: i64,
    pub free_slots_found: usize,
    pub time_range: ReportWindow,
}
