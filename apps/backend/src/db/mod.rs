//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use study_core::ReviewScheduler;

use crate::error::Result;
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that opens connections on first use.
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Flashcard Repository ===

    /// Get one of the user's cards
    pub async fn get_flashcard(&self, user_id: &str, card_id: &str) -> Result<Option<Flashcard>> {
        let card = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, question, answer, difficulty, times_reviewed,
                   last_reviewed, next_review
            FROM flashcards
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(card_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card.map(DbFlashcard::into_core))
    }

    /// All of the user's cards, in creation order
    pub async fn get_flashcards(&self, user_id: &str) -> Result<Vec<Flashcard>> {
        let cards = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, question, answer, difficulty, times_reviewed,
                   last_reviewed, next_review
            FROM flashcards
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards.into_iter().map(DbFlashcard::into_core).collect())
    }

    /// Rate one of the user's cards and store the result. The row stays locked
    /// from read to write, so concurrent reviews of a card apply in turn.
    /// Returns `None` if the card does not exist.
    pub async fn rate_flashcard(
        &self,
        user_id: &str,
        card_id: &str,
        scheduler: &dyn ReviewScheduler,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Result<Option<SchedulingResult>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, question, answer, difficulty, times_reviewed,
                   last_reviewed, next_review
            FROM flashcards
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(card_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let result = scheduler.rate(&row.into_core(), difficulty, now);
        let card = &result.card;

        sqlx::query(
            r#"
            UPDATE flashcards
            SET difficulty = $3,
                times_reviewed = $4,
                last_reviewed = $5,
                next_review = $6,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(&card.id)
        .bind(user_id)
        .bind(card.difficulty.as_str())
        .bind(i32::try_from(card.times_reviewed).unwrap_or(i32::MAX))
        .bind(card.last_reviewed)
        .bind(card.next_review)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(result))
    }

    // === Quiz Repository ===

    pub async fn get_quiz(&self, user_id: &str, quiz_id: &str) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, DbQuiz>(
            r#"
            SELECT id, topic, difficulty, duration_minutes, questions
            FROM quizzes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(quiz_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz.map(DbQuiz::into_core))
    }

    /// Store a completed attempt. Inserting the same id twice is a no-op.
    pub async fn insert_quiz_attempt(&self, attempt: &QuizAttempt) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quiz_attempts
                (id, quiz_id, user_id, topic, answers, score,
                 started_at, completed_at, time_spent_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&attempt.id)
        .bind(&attempt.quiz_id)
        .bind(&attempt.user_id)
        .bind(attempt.topic.as_deref())
        .bind(Json(&attempt.answers))
        .bind(attempt.score)
        .bind(attempt.started_at)
        .bind(attempt.completed_at)
        .bind(attempt.time_spent.and_then(|s| i64::try_from(s).ok()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Statistics ===

    /// Read the user's attempts, sessions and notes as of one instant.
    pub async fn fetch_snapshot(&self, user_id: &str) -> Result<StudySnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let attempts = sqlx::query_as::<_, DbQuizAttempt>(
            r#"
            SELECT id, quiz_id, user_id, topic, answers, score,
                   started_at, completed_at, time_spent_seconds
            FROM quiz_attempts
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let sessions = sqlx::query_as::<_, DbStudySession>(
            r#"
            SELECT id, date, start_time, end_time, time_spent_minutes
            FROM study_sessions
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let notes = sqlx::query_as::<_, DbNote>(
            r#"
            SELECT id, created_at
            FROM notes
            WHERE user_id = $1
            ORDER BY created_at NULLS LAST, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(StudySnapshot {
            attempts: attempts.into_iter().map(DbQuizAttempt::into_core).collect(),
            sessions: sessions.into_iter().map(DbStudySession::into_core).collect(),
            notes: notes.into_iter().map(DbNote::into_core).collect(),
        })
    }
}
