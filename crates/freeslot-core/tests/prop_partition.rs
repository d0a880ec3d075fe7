//! Property-based tests for the availability scan using proptest.
//!
//! The key invariant is the partition property: every day of the window is
//! classified exactly once, as either busy or covered by exactly one slot.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use freeslot_core::types::SLOT_NOTE;
use freeslot_core::{compute_slots, BusyCalendars, BusyPeriod};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

const CALENDAR_IDS: [&str; 3] = ["work", "personal", "shared"];

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// A window somewhere in early 2025, 1 minute to 2 weeks long, with
/// arbitrary (possibly mid-day) bounds.
fn arb_window() -> impl Strategy<Value = (DateTime<Utc>, DateTime<Utc>)> {
    (0i64..=4320, 1i64..=20_160).prop_map(|(offset_min, len_min)| {
        let start = base() + Duration::minutes(offset_min);
        (start, start + Duration::minutes(len_min))
    })
}

/// Up to 8 busy periods spread over up to 3 calendars, 1 minute to 2 days
/// long each, landing in and around the window range above.
fn arb_busy() -> impl Strategy<Value = BusyCalendars> {
    prop::collection::vec((0usize..3, 0i64..=30_000, 1i64..=2_880), 0..8).prop_map(|entries| {
        let mut map = BusyCalendars::new();
        for (cal, offset_min, len_min) in entries {
            let start = base() + Duration::minutes(offset_min);
            let period = BusyPeriod::new(start, start + Duration::minutes(len_min)).unwrap();
            map.entry(CALENDAR_IDS[cal].to_string())
                .or_insert_with(Vec::new)
                .push(period);
        }
        map
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn utc_midnight_of(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&instant.date_naive().and_time(NaiveTime::MIN))
}

fn day_overlaps_any(busy: &BusyCalendars, day_start: DateTime<Utc>, day_end: DateTime<Utc>) -> bool {
    busy.values()
        .flatten()
        .any(|p| p.overlaps(day_start, day_end))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Every day in the window is either busy (no slot) or free (exactly one
    /// slot starting at its midnight), in order, with nothing left over.
    #[test]
    fn every_day_is_classified_exactly_once(
        (time_min, time_max) in arb_window(),
        busy in arb_busy(),
    ) {
        let slots = compute_slots(&busy, time_min, time_max).unwrap();

        let mut expected_starts = Vec::new();
        let mut day = utc_midnight_of(time_min);
        while day < time_max {
            let day_end = day + Duration::days(1);
            if !day_overlaps_any(&busy, day, day_end) {
                expected_starts.push(day);
            }
            day = day_end;
        }

        let actual_starts: Vec<_> = slots.iter().map(|s| s.start_date).collect();
        prop_assert_eq!(actual_starts, expected_starts);
    }

    /// Slots are chronological, non-overlapping, at most one day long, and
    /// never extend past the window end.
    #[test]
    fn slots_are_ordered_and_bounded(
        (time_min, time_max) in arb_window(),
        busy in arb_busy(),
    ) {
        let slots = compute_slots(&busy, time_min, time_max).unwrap();

        for pair in slots.windows(2) {
            prop_assert!(pair[0].end_date <= pair[1].start_date);
        }
        for slot in &slots {
            prop_assert!(slot.start_date < slot.end_date);
            prop_assert!(slot.end_date <= time_max);
            prop_assert!(slot.end_date - slot.start_date <= Duration::days(1));
            prop_assert!(slot.duration == 0 || slot.duration == 1);
            prop_assert!(slot.weekdays_pto_count <= 1);
            prop_assert_eq!(slot.notes.as_str(), SLOT_NOTE);
        }
    }

    /// With no busy data the scan emits one slot per day, and the slot count
    /// never exceeds the number of days touched by the window.
    #[test]
    fn fully_free_window_has_one_slot_per_day(
        (time_min, time_max) in arb_window(),
    ) {
        let slots = compute_slots(&BusyCalendars::new(), time_min, time_max).unwrap();

        let mut days = 0;
        let mut day = utc_midnight_of(time_min);
        while day < time_max {
            days += 1;
            day += Duration::days(1);
        }
        prop_assert_eq!(slots.len(), days);
    }

    /// An inverted or empty window always fails, regardless of busy data.
    #[test]
    fn inverted_window_always_errors(
        offset in 0i64..=4320,
        shrink in 0i64..=1000,
        busy in arb_busy(),
    ) {
        let time_max = base() + Duration::minutes(offset);
        let time_min = time_max + Duration::minutes(shrink);
        prop_assert!(compute_slots(&busy, time_min, time_max).is_err());
    }
}
