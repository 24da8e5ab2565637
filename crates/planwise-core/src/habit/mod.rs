//! Habit learning module.
//!
//! Learns, per event category, when events usually start, how long they
//! usually last and how often they recur. Patterns are updated incrementally
//! once per created event and never replay history.

mod bounded;
mod learner;
mod pattern;

pub use bounded::BoundedLog;
pub use learner::{HabitLearner, HabitSummary, DEFAULT_DURATION_MINUTES};
pub use pattern::{
    analyze_frequency, Frequency, HabitPattern, PreferredTime, MAX_OCCURRENCES,
    MAX_PREFERRED_TIMES,
};
