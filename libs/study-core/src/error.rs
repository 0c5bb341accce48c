//! Error types for study-core.

use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Contract violations rejected at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid difficulty rating: {value}")]
    InvalidDifficulty { value: String },

    #[error("quiz {quiz_id} has no questions")]
    EmptyQuiz { quiz_id: String },

    #[error("question {question_id} has no options")]
    QuestionWithoutOptions { question_id: String },

    #[error("correct answer of question {question_id} is not one of its options")]
    CorrectAnswerNotOffered { question_id: String },

    #[error("question id {question_id} is used more than once")]
    DuplicateQuestion { question_id: String },

    #[error("unknown question {question_id}")]
    UnknownQuestion { question_id: String },

    #[error("question {question_id} is not the question being presented")]
    QuestionNotActive { question_id: String },

    #[error("option {option:?} is not offered by question {question_id}")]
    UnknownOption { question_id: String, option: String },

    #[error("quiz session is already completed")]
    SessionCompleted,

    #[error("quiz session is still in progress")]
    SessionInProgress,
}

impl EngineError {
    /// Whether the error comes from the session's state rather than from the
    /// shape of the request.
    pub fn is_state_conflict(&self) -> bool {
        matches!(self, Self::SessionCompleted | Self::SessionInProgress)
    }
}
