//! Slot scoring engine.
//!
//! Ranks free slots for a desired duration using additive heuristic bonuses:
//!
//! | Signal | Bonus |
//! |--------|-------|
//! | Base | 0.5 |
//! | Learned weekday match (per preferred time) | +0.1 |
//! | Learned hour within 1 / within 2 (per preferred time) | +0.2 / +0.1 |
//! | Category time-of-day band | +0.15 or +0.1 |
//! | Slot leaves 30+ minutes spare | +0.1 |
//!
//! The total is capped at 1.0. Every applied bonus adds a human-readable reason,
//! in evaluation order, for explanation UIs and prompt construction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::habit::{HabitLearner, HabitPattern};
use crate::schedule::EventCategory;
use crate::slots::FreeSlot;

/// Score every candidate starts from
pub const BASE_SCORE: f64 = 0.5;
/// Upper bound on any score
pub const MAX_SCORE: f64 = 1.0;
/// Spare minutes a slot needs beyond the desired duration to earn the buffer bonus
pub const BUFFER_MINUTES: i64 = 30;

const WEEKDAY_BONUS: f64 = 0.1;
const CLOSE_HOUR_BONUS: f64 = 0.2;
const NEAR_HOUR_BONUS: f64 = 0.1;
const BUFFER_BONUS: f64 = 0.1;

/// A ranked candidate time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSuggestion {
    /// Trimmed to exactly the desired duration
    pub slot: FreeSlot,
    /// 0.5 to 1.0
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Heuristic slot ranker
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotScorer;

impl SlotScorer {
    pub fn new() -> Self {
        Self
    }

    /// Rank `free_slots` for a block of `desired_minutes`.
    ///
    /// Slots too short are dropped. Output is sorted by score descending; equal
    /// scores keep their input order.
    pub fn suggest_best_times(
        &self,
        free_slots: &[FreeSlot],
        desired_minutes: i64,
        habits: &HabitLearner,
        category: Option<EventCategory>,
    ) -> Vec<TimeSuggestion> {
        let pattern = category.and_then(|c| habits.pattern(c));

        let mut suggestions: Vec<TimeSuggestion> = free_slots
            .iter()
            .filter(|slot| slot.can_fit(desired_minutes))
            .map(|slot| self.score_slot(slot, desired_minutes, pattern, category))
            .collect();

        suggestions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            candidates = free_slots.len(),
            suggestions = suggestions.len(),
            desired_minutes,
            category = category.map(|c| c.as_str()).unwrap_or("none"),
            "slot ranking"
        );

        suggestions
    }

    /// Score a single slot.
    pub fn score_slot(
        &self,
        slot: &FreeSlot,
        desired_minutes: i64,
        pattern: Option<&HabitPattern>,
        category: Option<EventCategory>,
    ) -> TimeSuggestion {
        let mut score = BASE_SCORE;
        let mut reasons = Vec::new();
        let hour = slot.hour();
        let day_of_week = slot.day_of_week();

        if let Some(pattern) = pattern {
            for preferred in pattern.preferred_times.iter() {
                if preferred.day_of_week == day_of_week {
                    score += WEEKDAY_BONUS;
                    reasons.push(format!("You usually schedule this on {}", preferred.day_name()));
                }

                let hour_diff = hour.abs_diff(preferred.hour as u32);
                if hour_diff <= 1 {
                    score += CLOSE_HOUR_BONUS;
                    reasons.push(format!(
                        "Close to your usual time ({:02}:{:02})",
                        preferred.hour, preferred.minute
                    ));
                } else if hour_diff <= 2 {
                    score += NEAR_HOUR_BONUS;
                    reasons.push(format!(
                        "Near your usual time ({:02}:{:02})",
                        preferred.hour, preferred.minute
                    ));
                }
            }
        }

        if let Some(category) = category {
            if let Some(band) = category.time_of_day_bias().iter().find(|b| b.contains(hour)) {
                score += band.bonus;
                reasons.push(band.reason.to_string());
            }
        }

        if slot.duration_minutes >= desired_minutes + BUFFER_MINUTES {
            score += BUFFER_BONUS;
            reasons.push("Leaves buffer time afterwards".to_string());
        }

        TimeSuggestion {
            slot: slot.trimmed(desired_minutes),
            score: score.min(MAX_SCORE),
            reasons,
        }
    }
}

/// Convenience function ranking with the default scorer
pub fn suggest_best_times(
    free_slots: &[FreeSlot],
    desired_minutes: i64,
    habits: &HabitLearner,
    category: Option<EventCategory>,
) -> Vec<TimeSuggestion> {
    SlotScorer::new().suggest_best_times(free_slots, desired_minutes, habits, category)
}
