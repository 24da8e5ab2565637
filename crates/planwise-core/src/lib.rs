//! # Planwise Core Library
//!
//! This library provides the scheduling intelligence behind Planwise: given the
//! events visible in a window, it finds conflicts, open time and the best place
//! for something new, and it learns when each kind of event usually happens.
//! The CLI and any assistant front end are thin layers over these functions.
//!
//! ## Architecture
//!
//! - **Conflicts**: strict overlap detection with transitive grouping
//! - **Habits**: per-category preferred times, durations and recurrence
//! - **Slots**: free time inside working hours across a date range
//! - **Scoring**: ranking of free slots against habits and category biases
//! - **Storage**: TOML configuration and a JSON habit store
//!
//! Everything except storage is pure and synchronous over caller-owned data.
//!
//! ## Key Components
//!
//! - [`detect_conflicts`]: Conflict groups for an event set
//! - [`HabitLearner`]: Incremental per-category habit patterns
//! - [`FreeSlotFinder`]: Working-hours gap search
//! - [`SlotScorer`]: Heuristic slot ranking
//! - [`Session`]: Capped conversation log for the assistant

pub mod conflict;
pub mod error;
pub mod habit;
pub mod schedule;
pub mod scoring;
pub mod session;
pub mod slots;
pub mod storage;

pub use conflict::{
    detect_conflicts, find_back_to_back, BackToBack, Conflict, ConflictDetector, ConflictKind,
    ConflictSeverity,
};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use habit::{
    analyze_frequency, BoundedLog, Frequency, HabitLearner, HabitPattern, HabitSummary,
    PreferredTime,
};
pub use schedule::{Event, EventCategory, WorkingHours};
pub use scoring::{suggest_best_times, SlotScorer, TimeSuggestion};
pub use session::{Role, Session, Turn};
pub use slots::{find_free_slots, find_next_available_slot, FreeSlot, FreeSlotFinder};
pub use storage::{Config, HabitStore};
