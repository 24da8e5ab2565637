//! JSON file store for learned habit patterns.
//!
//! Patterns are kept as a JSON array at `<data_dir>/habits.json`, one record
//! per category. Writes go through a temporary file and a rename so a crash
//! never leaves a half-written store behind.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::data_dir;
use crate::error::{Result, StoreError};
use crate::habit::{HabitLearner, HabitPattern};

/// File-backed habit pattern store
#[derive(Debug, Clone)]
pub struct HabitStore {
    path: PathBuf,
}

impl HabitStore {
    /// Store at `<data_dir>/habits.json`
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(data_dir()?.join("habits.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all patterns into a learner. A missing file is an empty store.
    pub fn load(&self) -> Result<HabitLearner> {
        Ok(HabitLearner::from_patterns(self.read_patterns()?))
    }

    /// Replace the stored patterns with everything the learner holds.
    pub fn save(&self, learner: &HabitLearner) -> Result<()> {
        let patterns: Vec<&HabitPattern> = learner.patterns().collect();
        self.write_patterns(&patterns)
    }

    /// Insert or replace the record for the pattern's category.
    pub fn upsert(&self, pattern: &HabitPattern) -> Result<()> {
        let mut patterns = self.read_patterns()?;
        match patterns.iter_mut().find(|p| p.category == pattern.category) {
            Some(existing) => *existing = pattern.clone(),
            None => patterns.push(pattern.clone()),
        }
        let refs: Vec<&HabitPattern> = patterns.iter().collect();
        self.write_patterns(&refs)
    }

    /// Remove every stored pattern.
    pub fn clear(&self) -> Result<()> {
        self.write_patterns(&[])
    }

    fn read_patterns(&self) -> Result<Vec<HabitPattern>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no habit store yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::ReadFailed {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };

        if content.trim().is_empty() {
            warn!(path = %self.path.display(), "habit store is empty, treating as no patterns");
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            StoreError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn write_patterns(&self, patterns: &[&HabitPattern]) -> Result<()> {
        let json = serde_json::to_string_pretty(patterns)?;
        let write_failed = |source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(write_failed)?;
        std::fs::rename(&tmp, &self.path).map_err(write_failed)?;

        debug!(path = %self.path.display(), patterns = patterns.len(), "habit store written");
        Ok(())
    }
}
