//! Day-by-day availability scan over per-calendar busy periods.
//!
//! Walks every calendar day of a `[time_min, time_max)` window and emits one
//! [`AvailableSlot`] per day that no calendar touches. Any overlap blocks the
//! whole day: a one-hour meeting still consumes a PTO day, which is the right
//! approximation for vacation planning. Sub-day scheduling is out of scope.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::types::{AvailabilityReport, AvailableSlot, BusyCalendars, ReportWindow, SLOT_NOTE};

/// Compute free day slots for a window, using UTC day boundaries.
///
/// The window is half-open and normalized to day boundaries: the scan starts
/// at the UTC midnight on or before `time_min` and steps one calendar day at
/// a time. Days overlapping any busy period of any calendar are skipped. The
/// final slot is clipped to `time_max` when the window ends mid-day.
///
/// An empty `busy_by_calendar` yields one slot per day in the window.
///
/// # Errors
/// Returns [`SlotError::InvalidRange`] when `time_min >= time_max`.
pub fn compute_slots(
    busy_by_calendar: &BusyCalendars,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
) -> Result<Vec<AvailableSlot>> {
    compute_slots_in_tz(busy_by_calendar, time_min, time_max, chrono_tz::UTC)
}

/// Compute free day slots with day boundaries taken at local midnight in `tz`.
///
/// All comparisons still happen on UTC instants; only the day grid moves.
/// Local midnights that do not exist (DST spring-forward) resolve to the
/// first valid instant after the gap, and doubled midnights (fall-back) to
/// the earlier of the two. A local day shortened or stretched by DST still
/// counts as one whole day.
pub fn compute_slots_in_tz(
    busy_by_calendar: &BusyCalendars,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
    tz: Tz,
) -> Result<Vec<AvailableSlot>> {
    if time_min >= time_max {
        return Err(SlotError::InvalidRange { time_min, time_max });
    }

    let mut slots = Vec::new();
    let mut date = time_min.with_timezone(&tz).date_naive();
    let mut day_start = midnight_in(date, tz);

    while day_start < time_max {
        let next_date = match date.succ_opt() {
            Some(d) => d,
            None => break, // end of representable time
        };
        let day_end = midnight_in(next_date, tz);

        let day_is_busy = busy_by_calendar
            .values()
            .flatten()
            .any(|period| period.overlaps(day_start, day_end));

        if !day_is_busy {
            let slot_end = day_end.min(time_max);
            // A DST-shortened local day is still one whole day on the local
            // grid; only a window that clips the day mid-way shrinks it.
            let duration = if slot_end == day_end {
                1
            } else {
                (slot_end - day_start).num_days()
            };
            slots.push(AvailableSlot {
                start_date: day_start,
                end_date: slot_end,
                duration,
                weekdays_pto_count: count_weekdays(date, day_start, slot_end, tz),
                notes: SLOT_NOTE.to_string(),
            });
        }

        date = next_date;
        day_start = day_end;
    }

    Ok(slots)
}

/// Compute the summary envelope consumed by the planning workflow, using UTC
/// day boundaries.
///
/// # Errors
/// Returns [`SlotError::InvalidRange`] when `time_min >= time_max`.
pub fn availability_report(
    busy_by_calendar: &BusyCalendars,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
) -> Result<AvailabilityReport> {
    availability_report_in_tz(busy_by_calendar, time_min, time_max, chrono_tz::UTC)
}

/// [`availability_report`] with day boundaries taken in `tz`.
pub fn availability_report_in_tz(
    busy_by_calendar: &BusyCalendars,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
    tz: Tz,
) -> Result<AvailabilityReport> {
    let slots = compute_slots_in_tz(busy_by_calendar, time_min, time_max, tz)?;
    Ok(AvailabilityReport {
        total_days_checked: (time_max - time_min).num_days(),
        free_slots_found: slots.len(),
        time_range: ReportWindow {
            start: time_min,
            end: time_max,
        },
        available_slots: slots,
    })
}

/// The UTC instant of local midnight on `date` in `tz`.
///
/// Some zones skip local midnight on spring-forward days; probe forward to
/// the first instant that exists. Doubled midnights take the earlier reading.
fn midnight_in(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let mut naive = date.and_time(NaiveTime::MIN);
    for _ in 0..6 {
        if let Some(local) = tz.from_local_datetime(&naive).earliest() {
            return local.with_timezone(&Utc);
        }
        naive = naive + Duration::hours(1);
    }
    // No real zone has a six-hour midnight gap; read the wall time as UTC.
    Utc.from_utc_datetime(&naive)
}

/// Count Monday-to-Friday days whose local midnight falls in `[start, end)`.
///
/// For a single-day slot this is 0 or 1; the loop form also handles clipped
/// final days and stays correct if slots ever span multiple days.
fn count_weekdays(start_date: NaiveDate, start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> u32 {
    let mut count = 0;
    let mut date = start_date;
    let mut cursor = start;
    while cursor < end {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        date = match date.succ_opt() {
            Some(d) => d,
            None => break,
        };
        cursor = midnight_in(date, tz);
    }
    count
}
