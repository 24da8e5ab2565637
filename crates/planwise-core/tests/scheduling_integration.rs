//! Integration tests for the detect → find → rank flow.

use chrono::{DateTime, Duration, FixedOffset};
use planwise_core::{
    detect_conflicts, find_free_slots, find_next_available_slot, suggest_best_times, ConflictKind,
    ConflictSeverity, Event, EventCategory, HabitLearner, WorkingHours,
};

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn event(id: &str, start: &str, end: &str) -> Event {
    Event::new(id, at(start), at(end))
}

#[test]
fn test_touching_events_leave_afternoon_free() {
    let events = vec![
        event("standup", "2026-10-19T09:00:00+02:00", "2026-10-19T10:00:00+02:00")
            .with_category(EventCategory::Work),
        event("dentist", "2026-10-19T10:00:00+02:00", "2026-10-19T11:00:00+02:00")
            .with_category(EventCategory::Personal),
    ];
    let hours = WorkingHours::parse("09:00", "18:00").unwrap();

    assert!(detect_conflicts(&events).is_empty());

    let day_start = at("2026-10-19T00:00:00+02:00");
    let day_end = at("2026-10-19T23:59:59+02:00");
    let slots = find_free_slots(&events, day_start, day_end, &hours, 30);

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start, at("2026-10-19T11:00:00+02:00"));
    assert_eq!(slots[0].end, at("2026-10-19T18:00:00+02:00"));
    assert_eq!(slots[0].duration_minutes, 420);
}

#[test]
fn test_half_hour_overlap_is_low_severity() {
    let events = vec![
        event("a", "2026-10-19T09:00:00+00:00", "2026-10-19T10:30:00+00:00"),
        event("b", "2026-10-19T10:00:00+00:00", "2026-10-19T11:00:00+00:00"),
    ];
    let conflicts = detect_conflicts(&events);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].severity, ConflictSeverity::Low);
    assert_eq!(conflicts[0].kind, ConflictKind::Overlap);
    assert_eq!(conflicts[0].size(), 2);
}

#[test]
fn test_transitive_triple_is_medium() {
    // a overlaps b, b overlaps c, a and c do not touch.
    let events = vec![
        event("c", "2026-10-19T11:00:00+00:00", "2026-10-19T12:00:00+00:00"),
        event("a", "2026-10-19T09:00:00+00:00", "2026-10-19T10:00:00+00:00"),
        event("b", "2026-10-19T09:30:00+00:00", "2026-10-19T11:30:00+00:00"),
    ];
    let conflicts = detect_conflicts(&events);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].event_ids, vec!["a", "b", "c"]);
    assert_eq!(conflicts[0].severity, ConflictSeverity::Medium);
    assert_eq!(conflicts[0].kind, ConflictKind::Overbooking);
}

#[test]
fn test_all_day_event_never_bridges_a_conflict() {
    let events = vec![
        event("morning", "2026-10-19T09:00:00+00:00", "2026-10-19T10:00:00+00:00"),
        event("offsite", "2026-10-19T00:00:00+00:00", "2026-10-20T00:00:00+00:00").all_day(),
        event("noon", "2026-10-19T12:00:00+00:00", "2026-10-19T13:00:00+00:00"),
    ];
    assert!(detect_conflicts(&events).is_empty());
}

#[test]
fn test_week_of_learning_ranks_usual_slot_first() {
    let mut habits = HabitLearner::new();
    // Three Mondays of 07:00 runs.
    for start in [
        "2026-09-28T07:00:00+00:00",
        "2026-10-05T07:00:00+00:00",
        "2026-10-12T07:00:00+00:00",
    ] {
        let start = at(start);
        habits.learn_from_event(
            &Event::new("run", start, start + Duration::minutes(45)).with_category(EventCategory::Health),
        );
    }
    assert_eq!(habits.average_duration(EventCategory::Health), 45);

    let hours = WorkingHours::parse("06:00", "20:00").unwrap();
    let busy = vec![event("work", "2026-10-19T08:00:00+00:00", "2026-10-19T17:00:00+00:00")];
    let slots = find_free_slots(
        &busy,
        at("2026-10-19T00:00:00+00:00"),
        at("2026-10-19T23:59:00+00:00"),
        &hours,
        30,
    );
    assert_eq!(slots.len(), 2);

    let ranked = suggest_best_times(&slots, 45, &habits, Some(EventCategory::Health));
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].slot.start, at("2026-10-19T06:00:00+00:00"));
    assert_eq!(ranked[0].slot.duration_minutes, 45);
    assert!(ranked[0].score > ranked[1].score);
    assert!(ranked[0].reasons.iter().any(|r| r.contains("Mon")));
}

#[test]
fn test_next_slot_crosses_into_following_day() {
    let hours = WorkingHours::parse("09:00", "17:00").unwrap();
    let events = vec![
        event("a", "2026-10-19T09:00:00+00:00", "2026-10-19T17:00:00+00:00"),
        event("b", "2026-10-20T09:00:00+00:00", "2026-10-20T10:15:00+00:00"),
    ];
    let slot = find_next_available_slot(&events, 90, &hours, at("2026-10-19T08:00:00+00:00")).unwrap();

    assert_eq!(slot.start, at("2026-10-20T10:15:00+00:00"));
    assert_eq!(slot.end, at("2026-10-20T11:45:00+00:00"));
}
