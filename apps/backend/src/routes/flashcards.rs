//! Flashcard review endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use study_core::{due_cards, Difficulty};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/flashcards/due
pub async fn due(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DueCardsResponse>> {
    let now = Utc::now();
    let cards = state.db.get_flashcards(&user.user_id).await?;

    Ok(Json(DueCardsResponse {
        cards: due_cards(&cards, now),
        as_of: now,
    }))
}

/// POST /api/flashcards/:id/review
pub async fn review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(card_id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<SchedulingResult>> {
    // Reject the rating before touching storage.
    let difficulty: Difficulty = payload.difficulty.parse()?;

    let result = state
        .db
        .rate_flashcard(
            &user.user_id,
            &card_id,
            state.scheduler.as_ref(),
            difficulty,
            Utc::now(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {card_id}")))?;

    tracing::info!(
        card_id = %card_id,
        difficulty = %difficulty,
        interval_days = result.interval_days,
        "flashcard reviewed"
    );

    Ok(Json(result))
}

/// GET /api/flashcards/:id/preview
pub async fn preview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(card_id): Path<String>,
) -> Result<Json<PreviewResponse>> {
    let card = state
        .db
        .get_flashcard(&user.user_id, &card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {card_id}")))?;

    Ok(Json(PreviewResponse {
        intervals: state.scheduler.preview(&card),
        scheduler: state.scheduler.name(),
        times_reviewed: card.times_reviewed,
        card_id: card.id,
    }))
}
