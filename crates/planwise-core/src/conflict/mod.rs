//! Conflict detection.
//!
//! This module provides:
//! - Strict pairwise overlap testing between timed events
//! - Transitive grouping of overlaps into conflict groups
//! - Severity classification by group size
//! - Back-to-back detection for tightly packed schedules

mod detector;
mod graph;

pub use detector::{
    detect_conflicts, find_back_to_back, BackToBack, Conflict, ConflictDetector, ConflictKind,
    ConflictSeverity,
};
pub use graph::OverlapGraph;
