//! Database rows and API types

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub use study_core::{
    Difficulty, Flashcard, IntervalPreview, NoteEvent, Quiz, QuizAttempt, QuizOutcome,
    QuizQuestion, QuizSession, QuizState, SchedulingResult, StatisticsSnapshot, StudySessionEvent,
    StudySnapshot,
};

// === Database Entity Types ===

/// Flashcard stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbFlashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub difficulty: String,
    pub times_reviewed: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
}

impl DbFlashcard {
    pub fn into_core(self) -> Flashcard {
        let difficulty = self.difficulty.parse().unwrap_or_else(|_| {
            tracing::warn!(card_id = %self.id, value = %self.difficulty, "unknown stored difficulty");
            Difficulty::default()
        });
        Flashcard {
            id: self.id,
            question: self.question,
            answer: self.answer,
            difficulty,
            times_reviewed: u32::try_from(self.times_reviewed).unwrap_or(0),
            last_reviewed: self.last_reviewed,
            next_review: self.next_review,
        }
    }
}

/// Quiz stored in PostgreSQL, questions as JSONB
#[derive(Debug, Clone, FromRow)]
pub struct DbQuiz {
    pub id: String,
    pub topic: String,
    pub difficulty: String,
    pub duration_minutes: i32,
    pub questions: Json<Vec<QuizQuestion>>,
}

impl DbQuiz {
    pub fn into_core(self) -> Quiz {
        Quiz {
            id: self.id,
            topic: self.topic,
            difficulty: self.difficulty.parse().unwrap_or_default(),
            duration: u32::try_from(self.duration_minutes).unwrap_or(0),
            questions: self.questions.0,
        }
    }
}

/// Quiz attempt row. Legacy rows may lack any of the optional columns.
#[derive(Debug, Clone, FromRow)]
pub struct DbQuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub topic: Option<String>,
    pub answers: Json<serde_json::Value>,
    pub score: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub time_spent_seconds: Option<i64>,
}

impl DbQuizAttempt {
    pub fn into_core(self) -> QuizAttempt {
        let answers: BTreeMap<String, String> =
            serde_json::from_value(self.answers.0).unwrap_or_default();
        QuizAttempt {
            id: self.id,
            quiz_id: self.quiz_id,
            user_id: self.user_id,
            topic: self.topic,
            answers,
            score: self.score.filter(|s| s.is_finite()),
            started_at: self.started_at,
            completed_at: self.completed_at,
            time_spent: self.time_spent_seconds.and_then(|s| u64::try_from(s).ok()),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbStudySession {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub time_spent_minutes: Option<i32>,
}

impl DbStudySession {
    pub fn into_core(self) -> StudySessionEvent {
        StudySessionEvent {
            id: Some(self.id),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            time_spent: self.time_spent_minutes.and_then(|m| u32::try_from(m).ok()),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbNote {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl DbNote {
    pub fn into_core(self) -> NoteEvent {
        NoteEvent {
            id: Some(self.id),
            created_at: self.created_at,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCardsResponse {
    pub cards: Vec<Flashcard>,
    pub as_of: DateTime<Utc>,
}

/// Difficulty arrives as text so unknown ratings surface as engine errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub card_id: String,
    pub times_reviewed: u32,
    pub scheduler: &'static str,
    pub intervals: IntervalPreview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartQuizSessionRequest {
    pub quiz_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: String,
    pub option: String,
}

/// A question as shown while answering; the correct answer is withheld.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// 1-based position in the quiz.
    pub number: usize,
}

/// Per-question feedback, only available after completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub id: String,
    pub question: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSessionView {
    pub session_id: Uuid,
    pub quiz_id: String,
    pub topic: String,
    pub total_questions: usize,
    pub state: QuizState,
    pub current_question: Option<PresentedQuestion>,
    pub answers: BTreeMap<String, String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Vec<QuestionReview>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<String>,
}
