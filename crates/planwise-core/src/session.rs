//! Assistant conversation session.
//!
//! The assistant remembers recent turns within a session. The session is an
//! explicit value owned by the caller; nothing is kept in module state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::habit::BoundedLog;

/// Turns kept per session unless another capacity is chosen
pub const DEFAULT_MAX_TURNS: usize = 20;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Capped, append-only conversation log holding the most recent `N` turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session<const N: usize = DEFAULT_MAX_TURNS> {
    pub id: String,
    pub created_at: DateTime<Utc>,
    turns: BoundedLog<Turn, N>,
}

impl<const N: usize> Session<N> {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            turns: BoundedLog::new(),
        }
    }

    /// Append a turn; the oldest turn is dropped once the session is full.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn {
            role,
            content: content.into(),
            at: Utc::now(),
        });
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content);
    }

    /// All retained turns, oldest first
    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> Vec<&Turn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Drop all turns. The session keeps its id.
    pub fn reset(&mut self) {
        self.turns.clear();
    }
}

impl<const N: usize> Default for Session<N> {
    fn default() -> Self {
        Self::new()
    }
}
