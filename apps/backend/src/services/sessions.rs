//! Live quiz sessions held in memory.
//!
//! A session belongs to the user that started it; other users see it as
//! missing. Sessions idle for longer than the configured TTL are pruned on the
//! next start.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use study_core::QuizSession;
use uuid::Uuid;

use crate::error::{ApiError, Result};

struct LiveSession {
    user_id: String,
    session: QuizSession,
    attempt_id: Option<String>,
    touched_at: DateTime<Utc>,
}

/// Borrowed view of a session handed to registry callbacks.
pub struct SessionEntry<'a> {
    pub session: &'a mut QuizSession,
    /// Set once the completed attempt has been persisted.
    pub attempt_id: &'a mut Option<String>,
}

pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, LiveSession>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, LiveSession>>> {
        self.sessions
            .lock()
            .map_err(|_| ApiError::Internal("quiz session registry is poisoned".to_string()))
    }

    /// Register a new session and return its id.
    pub fn insert(&self, user_id: &str, session: QuizSession) -> Result<Uuid> {
        let now = Utc::now();
        let mut sessions = self.lock()?;

        let before = sessions.len();
        sessions.retain(|_, live| now - live.touched_at < self.ttl);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "dropped idle quiz sessions");
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            LiveSession {
                user_id: user_id.to_string(),
                session,
                attempt_id: None,
                touched_at: now,
            },
        );
        Ok(id)
    }

    /// Run `f` on the caller's session while holding the registry lock.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        user_id: &str,
        f: impl FnOnce(SessionEntry<'_>) -> R,
    ) -> Result<R> {
        let mut sessions = self.lock()?;
        let live = sessions
            .get_mut(&id)
            .filter(|live| live.user_id == user_id)
            .ok_or_else(|| ApiError::NotFound(format!("quiz session {id}")))?;

        live.touched_at = Utc::now();
        Ok(f(SessionEntry {
            session: &mut live.session,
            attempt_id: &mut live.attempt_id,
        }))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
