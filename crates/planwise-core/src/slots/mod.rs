//! Free time slot search.
//!
//! This module provides:
//! - Working-hours-constrained gap detection over a date range
//! - Next-available-slot lookup over a fixed horizon

mod finder;

pub use finder::{
    find_free_slots, find_next_available_slot, FreeSlot, FreeSlotFinder,
    DEFAULT_SEARCH_HORIZON_DAYS, MAX_SEARCH_HORIZON_DAYS,
};
