//! Free time slot search within working hours.
//!
//! Walks the range one calendar day at a time and finds the gaps between
//! events inside that day's working window.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schedule::{Event, WorkingHours};

/// Days searched by [`FreeSlotFinder::find_next_available_slot`]
pub const DEFAULT_SEARCH_HORIZON_DAYS: i64 = 14;
/// Longest horizon a finder accepts
pub const MAX_SEARCH_HORIZON_DAYS: i64 = 366;

/// An open interval inside working hours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub duration_minutes: i64,
}

impl FreeSlot {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }

    /// Check if this slot can fit a block of given duration
    pub fn can_fit(&self, minutes: i64) -> bool {
        self.duration_minutes >= minutes
    }

    /// The first `minutes` of this slot.
    pub fn trimmed(&self, minutes: i64) -> Self {
        Self::new(self.start, self.start + Duration::minutes(minutes))
    }

    /// Hour of day at which the slot starts (local to its offset)
    pub fn hour(&self) -> u32 {
        self.start.hour()
    }

    /// Day of week of the slot start (0 = Sunday)
    pub fn day_of_week(&self) -> u8 {
        self.start.weekday().num_days_from_sunday() as u8
    }
}

/// Finder for open slots across a date range
#[derive(Debug, Clone)]
pub struct FreeSlotFinder {
    working_hours: WorkingHours,
    horizon_days: i64,
}

impl FreeSlotFinder {
    pub fn new(working_hours: WorkingHours) -> Self {
        Self {
            working_hours,
            horizon_days: DEFAULT_SEARCH_HORIZON_DAYS,
        }
    }

    /// Set how many days ahead `find_next_available_slot` looks, clamped to
    /// `0..=MAX_SEARCH_HORIZON_DAYS`
    pub fn with_horizon(mut self, days: i64) -> Self {
        self.horizon_days = days.clamp(0, MAX_SEARCH_HORIZON_DAYS);
        self
    }

    pub fn working_hours(&self) -> WorkingHours {
        self.working_hours
    }

    /// Find slots of at least `min_duration_minutes` between `range_start` and
    /// `range_end`, both boundary days included.
    ///
    /// Days are taken in `range_start`'s UTC offset. Slots come out in
    /// chronological order.
    pub fn find_free_slots(
        &self,
        events: &[Event],
        range_start: DateTime<FixedOffset>,
        range_end: DateTime<FixedOffset>,
        min_duration_minutes: i64,
    ) -> Vec<FreeSlot> {
        let offset = *range_start.offset();
        let first_day = range_start.date_naive();
        let last_day = range_end.with_timezone(&offset).date_naive();

        let mut slots = Vec::new();
        for day in first_day.iter_days().take_while(|d| *d <= last_day) {
            let Some((window_start, window_end)) = self.working_hours.window_on(day, offset) else {
                continue;
            };
            self.scan_window(events, window_start, window_end, min_duration_minutes, &mut slots);
        }

        debug!(
            events = events.len(),
            %first_day,
            %last_day,
            working_hours = %self.working_hours,
            slots = slots.len(),
            "free slot search"
        );

        slots
    }

    /// Cursor scan over one working window.
    fn scan_window(
        &self,
        events: &[Event],
        window_start: DateTime<FixedOffset>,
        window_end: DateTime<FixedOffset>,
        min_duration_minutes: i64,
        slots: &mut Vec<FreeSlot>,
    ) {
        // Zero-length events consume no time and must not split a slot.
        let mut busy: Vec<(DateTime<FixedOffset>, DateTime<FixedOffset>)> = events
            .iter()
            .filter(|e| !e.all_day && e.end > e.start)
            .filter(|e| e.start < window_end && e.end > window_start)
            .map(|e| (e.start.max(window_start), e.end.min(window_end)))
            .collect();
        busy.sort_by_key(|(start, _)| *start);

        let mut cursor = window_start;
        for (start, end) in busy {
            if start > cursor && (start - cursor).num_minutes() >= min_duration_minutes {
                slots.push(FreeSlot::new(cursor, start));
            }
            if end > cursor {
                cursor = end;
            }
        }

        if window_end > cursor && (window_end - cursor).num_minutes() >= min_duration_minutes {
            slots.push(FreeSlot::new(cursor, window_end));
        }
    }

    /// First slot of at least `duration_minutes` starting no earlier than
    /// `start_from`, trimmed to exactly that duration.
    ///
    /// Returns `None` when nothing fits within the search horizon.
    pub fn find_next_available_slot(
        &self,
        events: &[Event],
        duration_minutes: i64,
        start_from: DateTime<FixedOffset>,
    ) -> Option<FreeSlot> {
        let range_end = Duration::try_days(self.horizon_days)
            .and_then(|horizon| start_from.checked_add_signed(horizon))?;

        self.find_free_slots(events, start_from, range_end, duration_minutes)
            .into_iter()
            .filter(|slot| slot.end > start_from)
            .map(|slot| FreeSlot::new(slot.start.max(start_from), slot.end))
            .find(|slot| slot.can_fit(duration_minutes))
            .map(|slot| slot.trimmed(duration_minutes))
    }
}

/// Convenience function to find free slots with an explicit working window
pub fn find_free_slots(
    events: &[Event],
    range_start: DateTime<FixedOffset>,
    range_end: DateTime<FixedOffset>,
    working_hours: &WorkingHours,
    min_duration_minutes: i64,
) -> Vec<FreeSlot> {
    FreeSlotFinder::new(*working_hours).find_free_slots(
        events,
        range_start,
        range_end,
        min_duration_minutes,
    )
}

/// Convenience function searching the default 14-day horizon
pub fn find_next_available_slot(
    events: &[Event],
    duration_minutes: i64,
    working_hours: &WorkingHours,
    start_from: DateTime<FixedOffset>,
) -> Option<FreeSlot> {
    FreeSlotFinder::new(*working_hours).find_next_available_slot(events, duration_minutes, start_from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn event(id: &str, start: &str, end: &str) -> Event {
        Event::new(id, at(start), at(end))
    }

    fn nine_to_five() -> WorkingHours {
        WorkingHours::parse("09:00", "17:00").unwrap()
    }

    fn monday() -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        (at("2026-10-19T00:00:00+00:00"), at("2026-10-19T23:59:00+00:00"))
    }

    #[test]
    fn test_empty_day_is_one_full_slot() {
        let (from, to) = monday();
        let slots = find_free_slots(&[], from, to, &nine_to_five(), 480);

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, at("2026-10-19T09:00:00+00:00"));
        assert_eq!(slots[0].end, at("2026-10-19T17:00:00+00:00"));
        assert_eq!(slots[0].duration_minutes, 480);

        assert!(find_free_slots(&[], from, to, &nine_to_five(), 481).is_empty());
    }

    #[test]
    fn test_event_covering_window_leaves_nothing() {
        let (from, to) = monday();
        let events = vec![event("all", "2026-10-19T08:00:00+00:00", "2026-10-19T18:00:00+00:00")];
        assert!(find_free_slots(&events, from, to, &nine_to_five(), 15).is_empty());
    }

    #[test]
    fn test_gaps_between_events() {
        let (from, to) = monday();
        let events = vec![
            event("b", "2026-10-19T13:00:00+00:00", "2026-10-19T14:00:00+00:00"),
            event("a", "2026-10-19T10:00:00+00:00", "2026-10-19T11:00:00+00:00"),
        ];
        let slots = find_free_slots(&events, from, to, &nine_to_five(), 30);

        let spans: Vec<(i64, u32)> = slots.iter().map(|s| (s.duration_minutes, s.hour())).collect();
        assert_eq!(spans, vec![(60, 9), (120, 11), (180, 14)]);
    }

    #[test]
    fn test_min_duration_filters_short_gaps() {
        let (from, to) = monday();
        let events = vec![
            event("a", "2026-10-19T09:20:00+00:00", "2026-10-19T12:00:00+00:00"),
            event("b", "2026-10-19T12:10:00+00:00", "2026-10-19T17:00:00+00:00"),
        ];
        assert!(find_free_slots(&events, from, to, &nine_to_five(), 30).is_empty());
        assert_eq!(find_free_slots(&events, from, to, &nine_to_five(), 10).len(), 2);
    }

    #[test]
    fn test_straddling_events_are_clamped() {
        let (from, to) = monday();
        let events = vec![
            event("early", "2026-10-19T07:00:00+00:00", "2026-10-19T10:00:00+00:00"),
            event("late", "2026-10-19T16:00:00+00:00", "2026-10-19T20:00:00+00:00"),
            event("outside", "2026-10-19T18:00:00+00:00", "2026-10-19T19:00:00+00:00"),
        ];
        let slots = find_free_slots(&events, from, to, &nine_to_five(), 30);

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, at("2026-10-19T10:00:00+00:00"));
        assert_eq!(slots[0].end, at("2026-10-19T16:00:00+00:00"));
    }

    #[test]
    fn test_nested_events_do_not_move_cursor_back() {
        let (from, to) = monday();
        let events = vec![
            event("outer", "2026-10-19T10:00:00+00:00", "2026-10-19T13:00:00+00:00"),
            event("inner", "2026-10-19T11:00:00+00:00", "2026-10-19T12:00:00+00:00"),
        ];
        let slots = find_free_slots(&events, from, to, &nine_to_five(), 30);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].start, at("2026-10-19T13:00:00+00:00"));
    }

    #[test]
    fn test_all_day_and_zero_length_events_take_no_time() {
        let (from, to) = monday();
        let events = vec![
            event("holiday", "2026-10-19T00:00:00+00:00", "2026-10-20T00:00:00+00:00").all_day(),
            event("mark", "2026-10-19T12:00:00+00:00", "2026-10-19T12:00:00+00:00"),
        ];
        let slots = find_free_slots(&events, from, to, &nine_to_five(), 30);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].duration_minutes, 480);
    }

    #[test]
    fn test_multi_day_range_includes_both_ends() {
        let from = at("2026-10-19T15:00:00+00:00");
        let to = at("2026-10-21T08:00:00+00:00");
        let slots = find_free_slots(&[], from, to, &nine_to_five(), 30);

        assert_eq!(slots.len(), 3);
        let days: Vec<u8> = slots.iter().map(|s| s.day_of_week()).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_days_follow_range_offset() {
        let hours = WorkingHours::parse("09:00", "10:00").unwrap();
        let from = at("2026-10-19T00:00:00+09:00");
        let slots = find_free_slots(&[], from, from, &hours, 30);

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, at("2026-10-19T00:00:00+00:00"));
        assert_eq!(slots[0].hour(), 9);
    }

    #[test]
    fn test_empty_working_window_yields_nothing() {
        let (from, to) = monday();
        let hours = WorkingHours::parse("17:00", "09:00").unwrap();
        assert!(find_free_slots(&[], from, to, &hours, 0).is_empty());
    }

    #[test]
    fn test_next_available_skips_past_and_busy_time() {
        let events = vec![event("a", "2026-10-19T13:00:00+00:00", "2026-10-19T16:30:00+00:00")];
        let start_from = at("2026-10-19T12:15:00+00:00");
        let slot = find_next_available_slot(&events, 45, &nine_to_five(), start_from).unwrap();

        // 12:15-13:00 fits exactly.
        assert_eq!(slot.start, start_from);
        assert_eq!(slot.duration_minutes, 45);

        let slot = find_next_available_slot(&events, 60, &nine_to_five(), start_from).unwrap();
        assert_eq!(slot.start, at("2026-10-20T09:00:00+00:00"));
        assert_eq!(slot.end, at("2026-10-20T10:00:00+00:00"));
    }

    #[test]
    fn test_next_available_none_within_horizon() {
        let start_from = at("2026-10-19T08:00:00+00:00");
        assert!(find_next_available_slot(&[], 600, &nine_to_five(), start_from).is_none());

        let finder = FreeSlotFinder::new(nine_to_five()).with_horizon(0);
        let busy = vec![event("x", "2026-10-19T09:00:00+00:00", "2026-10-19T17:00:00+00:00")];
        assert!(finder.find_next_available_slot(&busy, 30, start_from).is_none());
    }

    #[test]
    fn test_next_available_with_oversized_horizon() {
        let start_from = at("2026-10-19T08:00:00+00:00");
        let finder = FreeSlotFinder::new(nine_to_five()).with_horizon(100_000_000);
        let slot = finder.find_next_available_slot(&[], 30, start_from).unwrap();
        assert_eq!(slot.start, at("2026-10-19T09:00:00+00:00"));

        // Horizon end past the representable range finds nothing.
        let last_day = DateTime::<Utc>::MAX_UTC.fixed_offset() - Duration::hours(12);
        let finder = FreeSlotFinder::new(nine_to_five()).with_horizon(MAX_SEARCH_HORIZON_DAYS);
        assert!(finder.find_next_available_slot(&[], 30, last_day).is_none());
    }
}
