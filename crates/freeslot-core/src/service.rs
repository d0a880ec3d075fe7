//! Availability service: fetch free/busy, compute the report, book a slot.
//!
//! The provider is injected at construction and owned by the caller's
//! composition root; there is no process-wide client cache.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::{AvailabilityError, SlotError};
use crate::provider::{CalendarProvider, CreatedEvent, EventDraft, FreeBusyRequest};
use crate::slots::availability_report_in_tz;
use crate::types::AvailabilityReport;

/// Ties a [`CalendarProvider`] to the slot computation.
#[derive(Debug, Clone)]
pub struct AvailabilityService<P> {
    provider: P,
    time_zone: Tz,
}

impl<P: CalendarProvider> AvailabilityService<P> {
    /// Service with UTC day boundaries.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            time_zone: chrono_tz::UTC,
        }
    }

    /// Use local midnights in `tz` as day boundaries instead of UTC.
    pub fn with_time_zone(mut self, tz: Tz) -> Self {
        self.time_zone = tz;
        self
    }

    /// Query busy periods for `calendar_ids` over `[time_min, time_max)` and
    /// compute the availability report.
    ///
    /// The window is validated before the provider is contacted, so an
    /// inverted window never costs a network round trip.
    pub fn check(
        &self,
        calendar_ids: &[String],
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<AvailabilityReport, AvailabilityError> {
        if time_min >= time_max {
            return Err(SlotError::InvalidRange { time_min, time_max }.into());
        }

        let request =
            FreeBusyRequest::new(calendar_ids, time_min, time_max, self.time_zone.name());
        let response = self.provider.free_busy(&request)?;
        let busy_by_calendar = crate::provider::into_busy_map(&response, calendar_ids)?;

        Ok(availability_report_in_tz(
            &busy_by_calendar,
            time_min,
            time_max,
            self.time_zone,
        )?)
    }

    /// Book the chosen slot as a calendar event.
    pub fn book(
        &self,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<CreatedEvent, AvailabilityError> {
        Ok(self.provider.create_event(calendar_id, draft)?)
    }
}
