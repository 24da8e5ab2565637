//! Schedule types: calendar events, categories and working hours.
//!
//! Events are owned by an external store; the core only reads them. Instants
//! carry their UTC offset so that hour-of-day and weekday are the caller's
//! wall-clock values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Category of an event. Drives habit grouping and time-of-day heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Work,
    Personal,
    Health,
    Social,
    Learning,
    Other,
}

/// An hour range `[start_hour, end_hour)` that earns a fixed bonus for a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourBand {
    pub start_hour: u32,
    pub end_hour: u32,
    pub bonus: f64,
    pub reason: &'static str,
}

impl HourBand {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }
}

const FOCUS_MORNING: &[HourBand] = &[HourBand {
    start_hour: 9,
    end_hour: 12,
    bonus: 0.15,
    reason: "Morning hours suit focused work",
}];

const SOCIAL_EVENING: &[HourBand] = &[HourBand {
    start_hour: 17,
    end_hour: 24,
    bonus: 0.1,
    reason: "Evening slot suits social plans",
}];

const HEALTH_BANDS: &[HourBand] = &[
    HourBand {
        start_hour: 6,
        end_hour: 8,
        bonus: 0.15,
        reason: "Early morning is a good time for exercise",
    },
    HourBand {
        start_hour: 17,
        end_hour: 19,
        bonus: 0.15,
        reason: "After-work hours are a good time for exercise",
    },
];

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        EventCategory::Work,
        EventCategory::Personal,
        EventCategory::Health,
        EventCategory::Social,
        EventCategory::Learning,
        EventCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Health => "health",
            Self::Social => "social",
            Self::Learning => "learning",
            Self::Other => "other",
        }
    }

    /// Fixed (not learned) time-of-day preferences for this category.
    ///
    /// Bands within one category never overlap, so at most one applies to a
    /// given hour.
    pub fn time_of_day_bias(&self) -> &'static [HourBand] {
        match self {
            Self::Work | Self::Learning => FOCUS_MORNING,
            Self::Social => SOCIAL_EVENING,
            Self::Health => HEALTH_BANDS,
            Self::Personal | Self::Other => &[],
        }
    }
}

impl Default for EventCategory {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".to_string(),
                message: format!(
                    "unknown category '{s}' (expected work, personal, health, social, learning or other)"
                ),
            })
    }
}

/// A calendar event as supplied by the event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub category: Option<EventCategory>,
}

impl Event {
    /// Create a timed, uncategorized event
    pub fn new(id: impl Into<String>, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            id: id.into(),
            title: None,
            start,
            end,
            all_day: false,
            category: None,
        }
    }

    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Category used for habit grouping; uncategorized events count as `Other`.
    pub fn category_or_default(&self) -> EventCategory {
        self.category.unwrap_or_default()
    }

    /// Strict half-open overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Day of week of the start instant (0 = Sunday).
    pub fn day_of_week(&self) -> u8 {
        self.start.weekday().num_days_from_sunday() as u8
    }

    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Parse a wall-clock "HH:mm" string.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTimeOfDay {
        value: value.to_string(),
    };

    let parts: Vec<&str> = value.trim().split(':').collect();
    if parts.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = parts[0].parse().map_err(|_| invalid())?;
    let minute: u32 = parts[1].parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Daily working window, e.g. 09:00 to 17:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Build from two "HH:mm" strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            start: parse_time_of_day(start)?,
            end: parse_time_of_day(end)?,
        })
    }

    /// Length of the window in minutes (zero when end is not after start).
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }

    /// The `[start, end)` window on a calendar day, or `None` if it is empty.
    pub fn window_on(
        &self,
        day: NaiveDate,
        offset: FixedOffset,
    ) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        if self.end <= self.start {
            return None;
        }
        let start = day.and_time(self.start).and_local_timezone(offset).single()?;
        let end = day.and_time(self.end).and_local_timezone(offset).single()?;
        Some((start, end))
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl fmt::Display for WorkingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_category_roundtrip_names() {
        for category in EventCategory::ALL {
            assert_eq!(category.as_str().parse::<EventCategory>().unwrap(), category);
        }
        assert_eq!("  Work ".parse::<EventCategory>().unwrap(), EventCategory::Work);
        assert!("meetings".parse::<EventCategory>().is_err());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&EventCategory::Learning).unwrap();
        assert_eq!(json, "\"learning\"");
    }

    #[test]
    fn test_time_of_day_bias_table() {
        assert!(EventCategory::Work.time_of_day_bias()[0].contains(9));
        assert!(!EventCategory::Work.time_of_day_bias()[0].contains(12));
        assert!(EventCategory::Social.time_of_day_bias()[0].contains(23));
        assert_eq!(EventCategory::Health.time_of_day_bias().len(), 2);
        assert!(EventCategory::Personal.time_of_day_bias().is_empty());
        assert!(EventCategory::Other.time_of_day_bias().is_empty());
    }

    #[test]
    fn test_event_overlap_is_strict() {
        let a = Event::new("a", at("2026-10-19T09:00:00+00:00"), at("2026-10-19T10:00:00+00:00"));
        let b = Event::new("b", at("2026-10-19T10:00:00+00:00"), at("2026-10-19T11:00:00+00:00"));
        let c = Event::new("c", at("2026-10-19T09:30:00+00:00"), at("2026-10-19T10:30:00+00:00"));

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_event_deserializes_with_defaults() {
        let json = r#"{"id":"e1","start":"2026-10-19T09:00:00+02:00","end":"2026-10-19T09:45:00+02:00"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(!event.all_day);
        assert_eq!(event.category, None);
        assert_eq!(event.category_or_default(), EventCategory::Other);
        assert_eq!(event.duration_minutes(), 45);
        assert_eq!(event.day_of_week(), 1);
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(parse_time_of_day("24:00").is_err());
        assert!(parse_time_of_day("9").is_err());
        assert!(parse_time_of_day("ab:cd").is_err());
    }

    #[test]
    fn test_working_hours_window() {
        let hours = WorkingHours::parse("09:00", "17:00").unwrap();
        assert_eq!(hours.minutes(), 480);
        assert_eq!(hours.to_string(), "09:00-17:00");

        let offset = FixedOffset::east_opt(3600).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let (start, end) = hours.window_on(day, offset).unwrap();
        assert_eq!(start, at("2026-10-19T09:00:00+01:00"));
        assert_eq!(end, at("2026-10-19T17:00:00+01:00"));

        let inverted = WorkingHours::parse("18:00", "08:00").unwrap();
        assert!(inverted.window_on(day, offset).is_none());
        assert_eq!(inverted.minutes(), 0);
    }
}
