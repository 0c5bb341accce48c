//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the router with or without a database
//! - Helpers for seeding flashcards and quizzes
//! - The identity header expected by protected routes
//!
//! # Requirements
//! Tests marked `requires database` need a PostgreSQL database (set the
//! DATABASE_URL env var). The rest run against a pool that never connects.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use studyhub_backend::config::Config;
use studyhub_backend::db::Database;
use studyhub_backend::models::Quiz;
use studyhub_backend::{router, AppState};

/// Never dialled by tests that run without a database.
const UNREACHABLE_DATABASE_URL: &str = "postgres://studyhub@127.0.0.1:1/studyhub_unreachable";

pub struct TestContext {
    pub db: Arc<Database>,
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Create a test context backed by the database in DATABASE_URL.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self::with_database(db, &database_url)
    }

    /// Create a test context whose pool never connects. Routes that touch
    /// storage fail with 500; engine-only routes work normally.
    pub fn without_database() -> Self {
        let db = Database::connect_lazy(UNREACHABLE_DATABASE_URL)
            .expect("Failed to create lazy pool");
        Self::with_database(db, UNREACHABLE_DATABASE_URL)
    }

    fn with_database(db: Database, database_url: &str) -> Self {
        let state = AppState::new(db, &test_config(database_url));
        let app = router(state.clone());

        Self {
            db: state.db.clone(),
            state,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    /// Identity header for the given user.
    pub fn user_header(user_id: &str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(user_id).unwrap(),
        )
    }

    /// Insert a flashcard for a user.
    pub async fn create_flashcard(
        &self,
        user_id: &str,
        card_id: &str,
        times_reviewed: i32,
        next_review: Option<DateTime<Utc>>,
    ) {
        sqlx::query(
            r#"
            INSERT INTO flashcards (id, user_id, question, answer, times_reviewed, next_review)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(card_id)
        .bind(user_id)
        .bind(format!("Question for {card_id}?"))
        .bind(format!("Answer for {card_id}."))
        .bind(times_reviewed)
        .bind(next_review)
        .execute(self.db.pool())
        .await
        .expect("Failed to insert flashcard");
    }

    /// Insert a quiz for a user.
    pub async fn create_quiz(&self, user_id: &str, quiz: &Quiz) {
        sqlx::query(
            r#"
            INSERT INTO quizzes (id, user_id, topic, difficulty, duration_minutes, questions)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&quiz.id)
        .bind(user_id)
        .bind(&quiz.topic)
        .bind(quiz.difficulty.as_str())
        .bind(quiz.duration as i32)
        .bind(Json(&quiz.questions))
        .execute(self.db.pool())
        .await
        .expect("Failed to insert quiz");
    }

    /// Number of stored attempts for a user.
    pub async fn count_attempts(&self, user_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM quiz_attempts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count attempts")
    }

    /// Clean up test data for a user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: &str) {
        for table in ["quiz_attempts", "quizzes", "flashcards", "study_sessions", "notes"] {
            let _ = sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
                .bind(user_id)
                .execute(self.db.pool())
                .await;
        }
    }
}

/// A user id no other test uses.
pub fn unique_user() -> String {
    format!("test-user-{}", Uuid::new_v4())
}

fn test_config(database_url: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        db_max_connections: 5,
        utc_offset_minutes: 0,
        session_ttl_minutes: 60,
    }
}
