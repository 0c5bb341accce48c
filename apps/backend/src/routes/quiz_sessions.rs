//! Quiz session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use study_core::{EngineError, QuizSession};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn parse_session_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("quiz session {raw}")))
}

/// Build the client view of a session. Correct answers are only revealed
/// once the session is completed.
pub fn render(id: Uuid, session: &QuizSession, attempt_id: Option<String>) -> QuizSessionView {
    let quiz = session.quiz();

    let current_question = match session.state() {
        QuizState::Presenting { index } => {
            quiz.questions.get(*index).map(|q| PresentedQuestion {
                id: q.id.clone(),
                question: q.question.clone(),
                options: q.options.clone(),
                number: index + 1,
            })
        }
        QuizState::Completed(_) => None,
    };

    let review = session.is_completed().then(|| {
        quiz.questions
            .iter()
            .map(|q| {
                let selected = session.answers().get(&q.id).cloned();
                QuestionReview {
                    id: q.id.clone(),
                    question: q.question.clone(),
                    correct: selected.as_deref() == Some(q.correct_answer.as_str()),
                    selected,
                    correct_answer: q.correct_answer.clone(),
                    explanation: q.explanation.clone(),
                }
            })
            .collect()
    });

    QuizSessionView {
        session_id: id,
        quiz_id: quiz.id.clone(),
        topic: quiz.topic.clone(),
        total_questions: quiz.questions.len(),
        state: session.state().clone(),
        current_question,
        answers: session.answers().clone(),
        started_at: session.started_at(),
        completed_at: session.completed_at(),
        review,
        attempt_id,
    }
}

/// POST /api/quiz-sessions
pub async fn start(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<StartQuizSessionRequest>,
) -> Result<(StatusCode, Json<QuizSessionView>)> {
    let quiz = state
        .db
        .get_quiz(&user.user_id, &payload.quiz_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("quiz {}", payload.quiz_id)))?;

    let session = QuizSession::new(quiz)?;
    let id = state.sessions.insert(&user.user_id, session)?;
    let view = state.sessions.with_session(id, &user.user_id, |entry| {
        render(id, entry.session, entry.attempt_id.clone())
    })?;

    tracing::info!(session_id = %id, quiz_id = %payload.quiz_id, "quiz session started");

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/quiz-sessions/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(session_id): Path<String>,
) -> Result<Json<QuizSessionView>> {
    let id = parse_session_id(&session_id)?;
    let view = state.sessions.with_session(id, &user.user_id, |entry| {
        render(id, entry.session, entry.attempt_id.clone())
    })?;

    Ok(Json(view))
}

/// POST /api/quiz-sessions/:id/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(session_id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<QuizSessionView>> {
    let id = parse_session_id(&session_id)?;
    let view = state
        .sessions
        .with_session(id, &user.user_id, |entry| -> Result<QuizSessionView> {
            entry
                .session
                .select_answer(&payload.question_id, &payload.option)?;
            Ok(render(id, entry.session, entry.attempt_id.clone()))
        })??;

    Ok(Json(view))
}

/// POST /api/quiz-sessions/:id/advance
///
/// Completing the session stores the attempt under the session id. If that
/// write fails, advancing again retries it.
pub async fn advance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(session_id): Path<String>,
) -> Result<Json<QuizSessionView>> {
    let id = parse_session_id(&session_id)?;

    let pending = state
        .sessions
        .with_session(id, &user.user_id, |entry| -> Result<Option<QuizAttempt>> {
            match entry.session.advance() {
                Ok(_) => {}
                Err(EngineError::SessionCompleted) if entry.attempt_id.is_none() => {}
                Err(e) => return Err(e.into()),
            }
            if !entry.session.is_completed() {
                return Ok(None);
            }
            let attempt = entry
                .session
                .clone()
                .into_attempt(id.to_string(), user.user_id.as_str())?;
            Ok(Some(attempt))
        })??;

    let saved = match pending {
        Some(attempt) => {
            state.db.insert_quiz_attempt(&attempt).await?;
            tracing::info!(
                session_id = %id,
                quiz_id = %attempt.quiz_id,
                score = attempt.score,
                "quiz attempt saved"
            );
            Some(attempt.id)
        }
        None => None,
    };

    let view = state.sessions.with_session(id, &user.user_id, |entry| {
        if saved.is_some() {
            *entry.attempt_id = saved;
        }
        render(id, entry.session, entry.attempt_id.clone())
    })?;

    Ok(Json(view))
}
