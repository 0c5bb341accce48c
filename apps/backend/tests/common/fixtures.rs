//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

use studyhub_backend::models::{Difficulty, Quiz, QuizQuestion};

/// A quiz whose correct answer is always option "A".
pub fn sample_quiz(id: &str, num_questions: usize) -> Quiz {
    Quiz {
        id: id.to_string(),
        topic: "Biology".to_string(),
        difficulty: Difficulty::Medium,
        duration: 10,
        questions: (0..num_questions)
            .map(|i| QuizQuestion {
                id: format!("q{}", i + 1),
                question: format!("What does organelle number {} do?", i + 1),
                options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                correct_answer: "A".to_string(),
                explanation: format!("Organelle {} does A.", i + 1),
            })
            .collect(),
    }
}

/// Quiz attempt as stored.
pub fn attempt(id: &str, topic: &str, score: f64, completed_at: &str, time_spent: u64) -> Value {
    json!({
        "id": id,
        "quizId": format!("quiz-{id}"),
        "topic": topic,
        "score": score,
        "startedAt": completed_at,
        "completedAt": completed_at,
        "timeSpent": time_spent,
    })
}

pub fn study_session(id: &str, date: &str, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "date": date,
        "startTime": start,
        "endTime": end,
    })
}

pub fn note(id: &str, created_at: &str) -> Value {
    json!({ "id": id, "createdAt": created_at })
}

/// Body for `POST /api/statistics/compute`.
pub fn snapshot(attempts: Vec<Value>, sessions: Vec<Value>, notes: Vec<Value>) -> Value {
    json!({
        "attempts": attempts,
        "sessions": sessions,
        "notes": notes,
    })
}
