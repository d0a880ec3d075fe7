//! # freeslot-core
//!
//! Deterministic day-granularity availability for travel planning.
//!
//! Given per-calendar busy periods over a requested window, the engine emits
//! one slot per fully free calendar day, annotated with the number of weekday
//! PTO days the slot costs. Any busy overlap blocks the whole day; the LLM
//! side of a planning workflow cannot do this arithmetic reliably, so it
//! lives here.
//!
//! ## Modules
//!
//! - [`slots`] — free/busy map → available day slots and the report envelope
//! - [`provider`] — calendar-provider seam: free/busy wire shapes, booking
//! - [`service`] — provider + computation behind one injected handle
//! - [`types`] — busy periods, slots, report envelope
//! - [`error`] — error types

pub mod error;
pub mod provider;
pub mod service;
pub mod slots;
pub mod types;

pub use error::{AvailabilityError, ProviderError, SlotError};
pub use provider::{CalendarProvider, FreeBusyRequest, FreeBusyResponse, StaticProvider};
pub use service::AvailabilityService;
pub use slots::{availability_report, availability_report_in_tz, compute_slots, compute_slots_in_tz};
pub use types::{AvailabilityReport, AvailableSlot, BusyCalendars, BusyPeriod, SLOT_NOTE};
