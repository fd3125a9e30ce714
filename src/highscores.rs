//! High score record
//!
//! A single best score and best combo, persisted as a small JSON document.
//! Read once at startup and written only when a run ends with a new record.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};

/// Best score and combo on record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScoreRecord {
    pub high_score: u32,
    pub max_combo: u32,
}

impl HighScoreRecord {
    pub fn new(high_score: u32, max_combo: u32) -> Self {
        Self {
            high_score,
            max_combo,
        }
    }

    /// Check if a score would beat the record
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.high_score
    }

    /// Fold a finished run into the record. Returns true if anything improved.
    pub fn submit(&mut self, score: u32, max_combo: u32) -> bool {
        let mut improved = false;
        if score > self.high_score {
            self.high_score = score;
            improved = true;
        }
        if max_combo > self.max_combo {
            self.max_combo = max_combo;
            improved = true;
        }
        improved
    }

    /// Load the record; a missing or malformed file yields `(0, 0)`
    pub fn load(path: &Path) -> Self {
        persistence::load_or_default(path)
    }

    /// Atomically write the record
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, self)?;
        log::info!(
            "High score saved (score {}, combo {})",
            self.high_score,
            self.max_combo
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_improves_each_field_independently() {
        let mut record = HighScoreRecord::new(50, 10);
        assert!(!record.submit(40, 5));
        assert!(record.submit(40, 12));
        assert_eq!(record, HighScoreRecord::new(50, 12));
        assert!(record.submit(60, 0));
        assert_eq!(record, HighScoreRecord::new(60, 12));
        assert!(record.qualifies(61));
        assert!(!record.qualifies(60));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        let record = HighScoreRecord::new(123, 45);
        record.save(&path).unwrap();
        assert_eq!(HighScoreRecord::load(&path), record);
    }

    #[test]
    fn test_missing_or_corrupt_loads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        assert_eq!(HighScoreRecord::load(&path), HighScoreRecord::new(0, 0));

        std::fs::write(&path, "high_score=12").unwrap();
        assert_eq!(HighScoreRecord::load(&path), HighScoreRecord::new(0, 0));

        // Negative values are malformed for unsigned fields
        std::fs::write(&path, r#"{"high_score": -5, "max_combo": 3}"#).unwrap();
        assert_eq!(HighScoreRecord::load(&path), HighScoreRecord::new(0, 0));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        std::fs::write(&path, r#"{"high_score": 77}"#).unwrap();
        assert_eq!(HighScoreRecord::load(&path), HighScoreRecord::new(77, 0));
    }
}
