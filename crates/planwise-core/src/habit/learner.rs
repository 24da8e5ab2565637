//! Per-category habit learner.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pattern::{Frequency, HabitPattern, PreferredTime};
use crate::schedule::{Event, EventCategory};

/// Average duration assumed for a category with no history
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Condensed view of one pattern for prompt context and listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitSummary {
    pub category: EventCategory,
    pub occurrence_count: u64,
    pub avg_duration_minutes: i64,
    pub frequency: Frequency,
    pub preferred_times: Vec<PreferredTime>,
}

impl HabitSummary {
    pub fn from_pattern(pattern: &HabitPattern) -> Self {
        Self {
            category: pattern.category,
            occurrence_count: pattern.occurrence_count,
            avg_duration_minutes: pattern.avg_duration_minutes,
            frequency: pattern.frequency,
            preferred_times: pattern.preferred_times.to_vec(),
        }
    }

    /// e.g. `work: 12 events, ~60 min, weekly; usually Mon 09:00, Wed 10:30`
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{}: {} event{}, ~{} min, {}",
            self.category,
            self.occurrence_count,
            if self.occurrence_count == 1 { "" } else { "s" },
            self.avg_duration_minutes,
            self.frequency.as_str()
        );
        if !self.preferred_times.is_empty() {
            let times: Vec<String> = self.preferred_times.iter().map(|t| t.to_string()).collect();
            line.push_str("; usually ");
            line.push_str(&times.join(", "));
        }
        line
    }
}

/// Owns one [`HabitPattern`] per category.
///
/// Updates are a read-modify-write through `&mut self`; callers that learn from
/// concurrently created events must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct HabitLearner {
    patterns: BTreeMap<EventCategory, HabitPattern>,
}

impl HabitLearner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted patterns. A later pattern for the same category
    /// replaces an earlier one.
    pub fn from_patterns(patterns: impl IntoIterator<Item = HabitPattern>) -> Self {
        Self {
            patterns: patterns.into_iter().map(|p| (p.category, p)).collect(),
        }
    }

    /// Create or update the pattern for the event's category.
    ///
    /// Returns the updated pattern so the caller can upsert it.
    pub fn learn_from_event(&mut self, event: &Event) -> &HabitPattern {
        let category = event.category_or_default();
        let pattern = self
            .patterns
            .entry(category)
            .and_modify(|p| p.observe(event))
            .or_insert_with(|| HabitPattern::from_first_event(event));

        debug!(
            %category,
            occurrences = pattern.occurrence_count,
            avg_duration = pattern.avg_duration_minutes,
            frequency = pattern.frequency.as_str(),
            "habit pattern updated"
        );

        pattern
    }

    /// Learn from a batch in the given order.
    pub fn learn_from_events<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.learn_from_event(event);
        }
    }

    pub fn pattern(&self, category: EventCategory) -> Option<&HabitPattern> {
        self.patterns.get(&category)
    }

    /// All patterns in category order.
    pub fn patterns(&self) -> impl Iterator<Item = &HabitPattern> {
        self.patterns.values()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn average_duration(&self, category: EventCategory) -> i64 {
        self.pattern(category)
            .map(|p| p.avg_duration_minutes)
            .unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    /// Frequency for a category, weekly when nothing has been learned.
    pub fn frequency(&self, category: EventCategory) -> Frequency {
        self.pattern(category)
            .map(|p| p.frequency)
            .unwrap_or_default()
    }

    /// Suggest a start time for a category on a date.
    ///
    /// Prefers a learned time on the same weekday, then the first learned time.
    pub fn suggest_time(&self, category: EventCategory, date: NaiveDate) -> Option<PreferredTime> {
        let pattern = self.pattern(category)?;
        let day_of_week = date.weekday().num_days_from_sunday() as u8;

        pattern
            .preferred_time_on(day_of_week)
            .or_else(|| pattern.preferred_times.first())
            .copied()
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.patterns.clear();
    }

    /// Summaries, most frequent category first.
    pub fn summaries(&self) -> Vec<HabitSummary> {
        let mut summaries: Vec<HabitSummary> =
            self.patterns.values().map(HabitSummary::from_pattern).collect();
        summaries.sort_by(|a, b| b.occurrence_count.cmp(&a.occurrence_count));
        summaries
    }

    /// Plain-text habit context, one line per category.
    pub fn render_context(&self) -> String {
        if self.patterns.is_empty() {
            return "No scheduling habits learned yet.".to_string();
        }
        let lines: Vec<String> = self.summaries().iter().map(HabitSummary::to_line).collect();
        lines.join("\n")
    }
}
