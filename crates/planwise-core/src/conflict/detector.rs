//! Conflict detection and tight-scheduling signals.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::graph::OverlapGraph;
use crate::schedule::Event;

/// How bad a conflict group is, derived from its size only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

impl ConflictSeverity {
    /// 2 events → low, 3 → medium, 4 or more → high
    pub fn from_group_size(size: usize) -> Self {
        match size {
            0..=2 => Self::Low,
            3 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Informational classification; not used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Overlap,
    Overbooking,
}

impl ConflictKind {
    pub fn from_group_size(size: usize) -> Self {
        if size > 2 {
            Self::Overbooking
        } else {
            Self::Overlap
        }
    }
}

/// A group of transitively overlapping events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Derived from the member ids, stable across detection passes
    pub id: String,
    /// Member event ids ordered by start
    pub event_ids: Vec<String>,
    pub severity: ConflictSeverity,
    pub kind: ConflictKind,
    /// Earliest member start
    pub starts_at: DateTime<FixedOffset>,
    /// Latest member end
    pub ends_at: DateTime<FixedOffset>,
}

impl Conflict {
    fn from_members(members: &[&Event]) -> Option<Self> {
        if members.len() < 2 {
            return None;
        }

        let event_ids: Vec<String> = members.iter().map(|e| e.id.clone()).collect();
        let starts_at = members.iter().map(|e| e.start).min()?;
        let ends_at = members.iter().map(|e| e.end).max()?;

        Some(Self {
            id: format!("conflict-{}", event_ids.join("+")),
            severity: ConflictSeverity::from_group_size(members.len()),
            kind: ConflictKind::from_group_size(members.len()),
            event_ids,
            starts_at,
            ends_at,
        })
    }

    /// Number of events in the group
    pub fn size(&self) -> usize {
        self.event_ids.len()
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.event_ids.iter().any(|id| id == event_id)
    }

    /// One-line description for banners and resolution prompts.
    pub fn summary(&self) -> String {
        let kind = match self.kind {
            ConflictKind::Overlap => "overlap",
            ConflictKind::Overbooking => "overbooking",
        };
        format!(
            "{} events {} between {} and {} ({:?} severity): {}",
            self.size(),
            kind,
            self.starts_at.format("%a %H:%M"),
            self.ends_at.format("%a %H:%M"),
            self.severity,
            self.event_ids.join(", ")
        )
    }
}

/// Two consecutive events with little or no breathing room between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackToBack {
    pub first_id: String,
    pub second_id: String,
    pub gap_minutes: i64,
}

/// Detector with a configurable back-to-back buffer.
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    buffer_minutes: i64,
}

impl ConflictDetector {
    /// Create a detector with the default 15 minute buffer
    pub fn new() -> Self {
        Self { buffer_minutes: 15 }
    }

    pub fn with_buffer(mut self, minutes: i64) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    /// Group overlapping timed events into conflicts.
    ///
    /// Pure function of its input; callers re-run it on every change to the
    /// visible event set.
    pub fn detect(&self, events: &[Event]) -> Vec<Conflict> {
        let graph = OverlapGraph::build(events);
        let conflicts: Vec<Conflict> = graph
            .components()
            .iter()
            .filter_map(|members| Conflict::from_members(members))
            .collect();

        debug!(
            events = events.len(),
            timed = graph.len(),
            overlaps = graph.edge_count(),
            conflicts = conflicts.len(),
            "conflict detection pass"
        );

        conflicts
    }

    /// Adjacent timed events whose gap is non-negative and below the buffer.
    pub fn back_to_back(&self, events: &[Event]) -> Vec<BackToBack> {
        let mut timed: Vec<&Event> = events.iter().filter(|e| !e.all_day).collect();
        timed.sort_by_key(|e| e.start);

        // A buffer too large for a Duration bounds nothing.
        let buffer = Duration::try_minutes(self.buffer_minutes);
        let below_buffer = |gap: Duration| match buffer {
            Some(buffer) => gap < buffer,
            None => self.buffer_minutes > 0,
        };
        timed
            .windows(2)
            .filter_map(|pair| {
                let gap = pair[1].start - pair[0].end;
                if gap >= Duration::zero() && below_buffer(gap) {
                    Some(BackToBack {
                        first_id: pair[0].id.clone(),
                        second_id: pair[1].id.clone(),
                        gap_minutes: gap.num_minutes(),
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to detect conflicts with default settings
pub fn detect_conflicts(events: &[Event]) -> Vec<Conflict> {
    ConflictDetector::new().detect(events)
}

/// Convenience function to find back-to-back pairs with an explicit buffer
pub fn find_back_to_back(events: &[Event], buffer_minutes: i64) -> Vec<BackToBack> {
    ConflictDetector::new()
        .with_buffer(buffer_minutes)
        .back_to_back(events)
}
