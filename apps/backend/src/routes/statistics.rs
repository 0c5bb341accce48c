//! Statistics endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/statistics
pub async fn overview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<StatisticsSnapshot>> {
    let snapshot = state.db.fetch_snapshot(&user.user_id).await?;

    tracing::debug!(
        attempts = snapshot.attempts.len(),
        sessions = snapshot.sessions.len(),
        notes = snapshot.notes.len(),
        "aggregating statistics"
    );

    Ok(Json(state.aggregator.aggregate_snapshot(&snapshot)))
}

/// POST /api/statistics/compute
///
/// Aggregates a caller-supplied snapshot without reading or writing storage.
pub async fn compute(
    State(state): State<AppState>,
    Json(snapshot): Json<StudySnapshot>,
) -> Json<StatisticsSnapshot> {
    Json(state.aggregator.aggregate_snapshot(&snapshot))
}
