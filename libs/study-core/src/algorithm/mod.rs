//! Spaced repetition scheduling.

pub mod ladder;

pub use ladder::DifficultyLadder;

use crate::types::{Difficulty, Flashcard};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Upper bound on a single interval, keeps due dates representable.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// Result of scheduling a card after a rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingResult {
    pub card: Flashcard,
    pub interval_days: i64,
    pub next_review: DateTime<Utc>,
}

/// Interval each rating would give a card, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalPreview {
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
}

/// Trait for review schedulers.
pub trait ReviewScheduler: Send + Sync {
    /// Scheduler identifier.
    fn name(&self) -> &'static str;

    /// Days until the next review, from the review count before this rating.
    fn interval_days(&self, times_reviewed: u32, difficulty: Difficulty) -> i64;

    /// Apply a rating given at `now`.
    fn rate(&self, card: &Flashcard, difficulty: Difficulty, now: DateTime<Utc>) -> SchedulingResult {
        let interval_days = self
            .interval_days(card.times_reviewed, difficulty)
            .clamp(1, MAX_INTERVAL_DAYS);
        let next_review = now + Duration::days(interval_days);

        SchedulingResult {
            card: Flashcard {
                difficulty,
                times_reviewed: card.times_reviewed.saturating_add(1),
                last_reviewed: Some(now),
                next_review: Some(next_review),
                ..card.clone()
            },
            interval_days,
            next_review,
        }
    }

    fn preview(&self, card: &Flashcard) -> IntervalPreview {
        let days = |d| self.interval_days(card.times_reviewed, d).clamp(1, MAX_INTERVAL_DAYS);
        IntervalPreview {
            easy: days(Difficulty::Easy),
            medium: days(Difficulty::Medium),
            hard: days(Difficulty::Hard),
        }
    }
}

/// Rate a card with the default scheduler.
pub fn rate(card: &Flashcard, difficulty: Difficulty, now: DateTime<Utc>) -> Flashcard {
    DifficultyLadder.rate(card, difficulty, now).card
}

/// A card is due once its next review has passed, or if it was never scheduled.
pub fn is_due(card: &Flashcard, now: DateTime<Utc>) -> bool {
    card.next_review.map_or(true, |next| next <= now)
}

/// Due cards, never-scheduled first, then by next review date.
pub fn due_cards(cards: &[Flashcard], now: DateTime<Utc>) -> Vec<Flashcard> {
    let mut due: Vec<Flashcard> = cards.iter().filter(|c| is_due(c, now)).cloned().collect();
    // Option orders None first; sort_by_key is stable.
    due.sort_by_key(|c| c.next_review);
    due
}
