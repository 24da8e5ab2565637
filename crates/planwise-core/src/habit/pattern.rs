//! Habit pattern types.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::bounded::BoundedLog;
use crate::schedule::{Event, EventCategory};

/// Maximum number of preferred times kept per category
pub const MAX_PREFERRED_TIMES: usize = 5;
/// Maximum number of recent start instants kept per category
pub const MAX_OCCURRENCES: usize = 10;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A recurring wall-clock start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredTime {
    /// Day of week (0-6, Sunday=0)
    pub day_of_week: u8,
    /// Hour of day (0-23)
    pub hour: u8,
    pub minute: u8,
}

impl PreferredTime {
    pub fn new(day_of_week: u8, hour: u8, minute: u8) -> Self {
        Self {
            day_of_week,
            hour,
            minute,
        }
    }

    pub fn from_instant(at: &DateTime<FixedOffset>) -> Self {
        Self {
            day_of_week: at.weekday().num_days_from_sunday() as u8,
            hour: at.hour() as u8,
            minute: at.minute() as u8,
        }
    }

    /// Same weekday and within one hour either way.
    pub fn is_near(&self, other: &PreferredTime) -> bool {
        self.day_of_week == other.day_of_week && self.hour.abs_diff(other.hour) <= 1
    }

    /// Single-step midpoint of two times on the same weekday.
    ///
    /// Halves round up, so 09:00 and 10:00 merge to 10:00.
    pub fn midpoint(&self, other: &PreferredTime) -> Self {
        let avg = |a: u8, b: u8| ((a as f64 + b as f64) / 2.0).round() as u8;
        Self {
            day_of_week: self.day_of_week,
            hour: avg(self.hour, other.hour),
            minute: avg(self.minute, other.minute),
        }
    }

    pub fn day_name(&self) -> &'static str {
        DAY_NAMES
            .get(self.day_of_week as usize)
            .copied()
            .unwrap_or("???")
    }
}

impl fmt::Display for PreferredTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:{:02}", self.day_name(), self.hour, self.minute)
    }
}

/// How often a category tends to recur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl Frequency {
    /// Classify an average gap between occurrences, in days.
    pub fn from_average_gap_days(avg_gap: f64) -> Self {
        if avg_gap <= 1.5 {
            Self::Daily
        } else if avg_gap <= 10.0 {
            Self::Weekly
        } else {
            Self::Monthly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Learned scheduling pattern for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitPattern {
    pub category: EventCategory,
    pub preferred_times: BoundedLog<PreferredTime, MAX_PREFERRED_TIMES>,
    pub avg_duration_minutes: i64,
    /// Recent start instants, oldest first
    pub last_occurrences: BoundedLog<DateTime<FixedOffset>, MAX_OCCURRENCES>,
    pub frequency: Frequency,
    pub occurrence_count: u64,
    pub updated_at: DateTime<Utc>,
}

impl HabitPattern {
    /// Seed a pattern from the first event seen for its category.
    pub fn from_first_event(event: &Event) -> Self {
        let mut preferred_times = BoundedLog::new();
        preferred_times.push(PreferredTime::from_instant(&event.start));

        let mut last_occurrences = BoundedLog::new();
        last_occurrences.push(event.start);

        Self {
            category: event.category_or_default(),
            preferred_times,
            avg_duration_minutes: event.duration_minutes(),
            last_occurrences,
            frequency: Frequency::default(),
            occurrence_count: 1,
            updated_at: Utc::now(),
        }
    }

    /// Fold one more event of this category into the pattern.
    pub fn observe(&mut self, event: &Event) {
        let count = self.occurrence_count as f64;
        let total = self.avg_duration_minutes as f64 * count + event.duration_minutes() as f64;
        self.avg_duration_minutes = (total / (count + 1.0)).round() as i64;

        self.last_occurrences.insert_sorted(event.start);
        self.merge_preferred_time(PreferredTime::from_instant(&event.start));

        self.occurrence_count += 1;
        self.frequency = analyze_frequency(self);
        self.updated_at = Utc::now();
    }

    /// Replace the first nearby entry with the midpoint, or append.
    fn merge_preferred_time(&mut self, time: PreferredTime) {
        if let Some(existing) = self.preferred_times.iter_mut().find(|t| t.is_near(&time)) {
            *existing = existing.midpoint(&time);
        } else {
            self.preferred_times.push(time);
        }
    }

    /// Preferred time falling on the given weekday (0 = Sunday), if any.
    pub fn preferred_time_on(&self, day_of_week: u8) -> Option<&PreferredTime> {
        self.preferred_times
            .iter()
            .find(|t| t.day_of_week == day_of_week)
    }
}

/// Infer recurrence from the stored occurrences.
///
/// Needs at least two occurrences; otherwise weekly is assumed.
pub fn analyze_frequency(pattern: &HabitPattern) -> Frequency {
    if pattern.last_occurrences.len() < 2 {
        return Frequency::Weekly;
    }

    let mut starts: Vec<DateTime<FixedOffset>> = pattern.last_occurrences.to_vec();
    starts.sort();

    let gaps: Vec<f64> = starts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 86_400.0)
        .collect();
    let avg_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;

    Frequency::from_average_gap_days(avg_gap)
}
