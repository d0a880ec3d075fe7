//! Calendar-provider boundary: free/busy queries and event booking.
//!
//! Wire shapes mirror the Google Calendar v3 `freebusy.query` payload, which
//! is also what other providers can be adapted to. Timestamps on the wire are
//! RFC3339 with any UTC offset and are normalized to UTC on ingestion.
//!
//! Transport, authentication, and retry policy live with the caller behind
//! [`CalendarProvider`]; this crate only defines the seam and the
//! deterministic conversion into [`BusyCalendars`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, SlotError};
use crate::types::{BusyCalendars, BusyPeriod};

/// A free/busy query for one or more calendars over a half-open window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyRequest {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub time_zone: String,
    pub items: Vec<FreeBusyItem>,
}

impl FreeBusyRequest {
    pub fn new(
        calendar_ids: &[String],
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            time_min,
            time_max,
            time_zone: time_zone.into(),
            items: calendar_ids
                .iter()
                .map(|id| FreeBusyItem { id: id.clone() })
                .collect(),
        }
    }
}

/// One calendar identifier in a free/busy query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBusyItem {
    pub id: String,
}

/// Raw free/busy response, keyed by calendar identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: BTreeMap<String, CalendarFreeBusy>,
}

impl FreeBusyResponse {
    /// Parse a response document from JSON.
    ///
    /// # Errors
    /// Returns [`ProviderError::MalformedResponse`] when the document does
    /// not deserialize.
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(raw).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

/// Per-calendar section of a free/busy response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarFreeBusy {
    #[serde(default)]
    pub busy: Vec<WirePeriod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CalendarIssue>,
}

/// A busy period as it appears on the wire: RFC3339 strings, any offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePeriod {
    pub start: String,
    pub end: String,
}

/// A per-calendar error reported inside an otherwise successful response
/// (e.g. `notFound` for an unknown calendar identifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub reason: String,
}

/// Convert a wire response into the busy map the slot scan consumes.
///
/// Every identifier in `requested` must have a section in the response: a
/// missing section means the provider dropped the calendar, which is an
/// error, not "no conflicts". Per-calendar issues and unparseable or
/// inverted periods also fail the whole conversion.
pub fn into_busy_map(
    response: &FreeBusyResponse,
    requested: &[String],
) -> Result<BusyCalendars, ProviderError> {
    let mut busy_by_calendar = BusyCalendars::new();

    for id in requested {
        let section = response
            .calendars
            .get(id)
            .ok_or_else(|| ProviderError::MissingCalendar(id.clone()))?;

        if let Some(issue) = section.errors.first() {
            return Err(ProviderError::CalendarError {
                calendar_id: id.clone(),
                reason: issue.reason.clone(),
            });
        }

        let mut periods = Vec::with_capacity(section.busy.len());
        for wire in &section.busy {
            let start = parse_utc(&wire.start)?;
            let end = parse_utc(&wire.end)?;
            let period = BusyPeriod::new(start, end).map_err(|_| {
                ProviderError::MalformedResponse(format!(
                    "busy period for '{}' ends at or before its start: {} .. {}",
                    id, wire.start, wire.end
                ))
            })?;
            periods.push(period);
        }
        busy_by_calendar.insert(id.clone(), periods);
    }

    Ok(busy_by_calendar)
}

fn parse_utc(raw: &str) -> Result<DateTime<Utc>, ProviderError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ProviderError::MalformedResponse(format!("bad timestamp '{}': {}", raw, e)))
}

/// A calendar event to book once the traveler picks a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub time_zone: String,
    pub attendees: Vec<String>,
}

impl EventDraft {
    /// Builds a draft, rejecting `end <= start`.
    pub fn new(
        summary: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> crate::error::Result<Self> {
        if end <= start {
            return Err(SlotError::InvalidRange {
                time_min: start,
                time_max: end,
            });
        }
        Ok(Self {
            summary: summary.into(),
            description: String::new(),
            start,
            end,
            time_zone: "UTC".to_string(),
            attendees: Vec::new(),
        })
    }
}

/// The provider's acknowledgment of a booked event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The seam to an external calendar service.
///
/// Implementations own their transport, credentials, and retry policy. The
/// trait is synchronous over already-materialized data; async callers wrap
/// their client and block or bridge as they see fit.
pub trait CalendarProvider {
    /// Query busy periods for the calendars named in the request.
    fn free_busy(&self, request: &FreeBusyRequest) -> Result<FreeBusyResponse, ProviderError>;

    /// Book an event on `calendar_id`.
    fn create_event(
        &self,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<CreatedEvent, ProviderError>;
}

/// Provider backed by a fixed busy table. Used in tests and offline runs.
///
/// Behaves like a real service: busy periods are clipped to the requested
/// window, and unknown calendars come back with a `notFound` issue rather
/// than an empty section.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    table: BusyCalendars,
}

impl StaticProvider {
    pub fn new(table: BusyCalendars) -> Self {
        Self { table }
    }
}

impl CalendarProvider for StaticProvider {
    fn free_busy(&self, request: &FreeBusyRequest) -> Result<FreeBusyResponse, ProviderError> {
        let mut calendars = BTreeMap::new();
        for item in &request.items {
            let section = match self.table.get(&item.id) {
                Some(periods) => CalendarFreeBusy {
                    busy: periods
                        .iter()
                        .filter(|p| p.overlaps(request.time_min, request.time_max))
                        .map(|p| WirePeriod {
                            start: p.start.max(request.time_min).to_rfc3339(),
                            end: p.end.min(request.time_max).to_rfc3339(),
                        })
                        .collect(),
                    errors: Vec::new(),
                },
                None => CalendarFreeBusy {
                    busy: Vec::new(),
                    errors: vec![CalendarIssue {
                        domain: Some("global".to_string()),
                        reason: "notFound".to_string(),
                    }],
                },
            };
            calendars.insert(item.id.clone(), section);
        }
        Ok(FreeBusyResponse { calendars })
    }

    fn create_event(
        &self,
        _calendar_id: &str,
        _draft: &EventDraft,
    ) -> Result<CreatedEvent, ProviderError> {
        Err(ProviderError::Unsupported(
            "StaticProvider cannot create events",
        ))
    }
}
