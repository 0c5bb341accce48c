//! Adaptive review and study analytics engine.
//!
//! Provides:
//! - Flashcard review scheduling from self-rated difficulty
//! - Quiz sessions with scoring and strength/weakness breakdown
//! - Statistics aggregation over quiz attempts, study sessions and notes
//!
//! Everything here is synchronous and free of I/O; persisting results is up
//! to the caller.

pub mod algorithm;
pub mod analytics;
pub mod error;
mod lenient;
pub mod quiz;
pub mod types;

pub use algorithm::{
    due_cards, is_due, rate, DifficultyLadder, IntervalPreview, ReviewScheduler,
    SchedulingResult,
};
pub use analytics::{aggregate, ActivityItem, AnalyticsAggregator, StatisticsSnapshot, StudySnapshot};
pub use error::{EngineError, Result};
pub use quiz::{score_answers, QuizOutcome, QuizSession, QuizState};
pub use types::{Difficulty, Flashcard, NoteEvent, Quiz, QuizAttempt, QuizQuestion, StudySessionEvent};
