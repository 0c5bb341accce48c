//! Difficulty ladder scheduling.
//!
//! The interval depends only on the rating and how many times the card has
//! been reviewed before, not on how long ago the last review was:
//! - easy: `times_reviewed * 2 + 3` days
//! - medium: `times_reviewed + 1` days
//! - hard: 1 day, whatever the history
//!
//! Every interval is capped at [`MAX_INTERVAL_DAYS`](super::MAX_INTERVAL_DAYS),
//! so easy intervals stop growing from 18 249 previous reviews on.

use super::ReviewScheduler;
use crate::types::Difficulty;

#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyLadder;

impl ReviewScheduler for DifficultyLadder {
    fn name(&self) -> &'static str {
        "ladder"
    }

    fn interval_days(&self, times_reviewed: u32, difficulty: Difficulty) -> i64 {
        let reviews = i64::from(times_reviewed);
        match difficulty {
            Difficulty::Easy => reviews * 2 + 3,
            Difficulty::Medium => reviews + 1,
            Difficulty::Hard => 1,
        }
    }
}
