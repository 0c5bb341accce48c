//! Quiz sessions and scoring.
//!
//! A session walks a fixed question list in order. Answers can be changed
//! while their question is presented; advancing past the last question scores
//! the quiz and the session becomes terminal.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::types::{Quiz, QuizAttempt, QuizQuestion};

/// Maximum entries in each of strengths and weaknesses.
pub const BREAKDOWN_LIMIT: usize = 3;

/// Words of the question text kept in a breakdown label.
const LABEL_WORDS: usize = 3;

/// Final result of a quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizState {
    Presenting { index: usize },
    Completed(QuizOutcome),
}

/// Score a set of answers against a question list.
///
/// A question is correct only when its recorded answer equals the correct
/// answer exactly. Answers for ids outside `questions` are ignored.
pub fn score_answers(questions: &[QuizQuestion], answers: &BTreeMap<String, String>) -> QuizOutcome {
    let mut correct_count = 0;
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for question in questions {
        let correct = answers
            .get(&question.id)
            .is_some_and(|answer| *answer == question.correct_answer);
        let bucket = if correct {
            correct_count += 1;
            &mut strengths
        } else {
            &mut weaknesses
        };
        if bucket.len() < BREAKDOWN_LIMIT {
            bucket.push(question_label(&question.question));
        }
    }

    let total_questions = questions.len();
    let score = if total_questions == 0 {
        0.0
    } else {
        100.0 * correct_count as f64 / total_questions as f64
    };

    QuizOutcome {
        score,
        correct_count,
        total_questions,
        strengths,
        weaknesses,
    }
}

/// Short label for a question: its first words followed by an ellipsis.
pub fn question_label(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(LABEL_WORDS).collect();
    format!("{}...", words.join(" "))
}

fn validate(quiz: &Quiz) -> Result<()> {
    if quiz.questions.is_empty() {
        return Err(EngineError::EmptyQuiz {
            quiz_id: quiz.id.clone(),
        });
    }
    let mut seen = HashSet::new();
    for question in &quiz.questions {
        if !seen.insert(question.id.as_str()) {
            return Err(EngineError::DuplicateQuestion {
                question_id: question.id.clone(),
            });
        }
        if question.options.is_empty() {
            return Err(EngineError::QuestionWithoutOptions {
                question_id: question.id.clone(),
            });
        }
        if !question.offers(&question.correct_answer) {
            return Err(EngineError::CorrectAnswerNotOffered {
                question_id: question.id.clone(),
            });
        }
    }
    Ok(())
}

/// One pass through a quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    answers: BTreeMap<String, String>,
    state: QuizState,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session now. Fails for quizzes that cannot be presented.
    pub fn new(quiz: Quiz) -> Result<Self> {
        Self::start_at(quiz, Utc::now())
    }

    pub fn start_at(quiz: Quiz, started_at: DateTime<Utc>) -> Result<Self> {
        validate(&quiz)?;
        Ok(Self {
            quiz,
            answers: BTreeMap::new(),
            state: QuizState::Presenting { index: 0 },
            started_at,
            completed_at: None,
        })
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, QuizState::Completed(_))
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        match &self.state {
            QuizState::Completed(outcome) => Some(outcome),
            QuizState::Presenting { .. } => None,
        }
    }

    /// The question being presented, `None` once completed.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.state {
            QuizState::Presenting { index } => self.quiz.questions.get(index),
            QuizState::Completed(_) => None,
        }
    }

    /// Record an answer for the presented question, replacing any earlier one.
    pub fn select_answer(&mut self, question_id: &str, option: &str) -> Result<()> {
        let current = self.current_question().ok_or(EngineError::SessionCompleted)?;

        if current.id != question_id {
            return Err(match self.quiz.question(question_id) {
                Some(_) => EngineError::QuestionNotActive {
                    question_id: question_id.to_string(),
                },
                None => EngineError::UnknownQuestion {
                    question_id: question_id.to_string(),
                },
            });
        }
        if !current.offers(option) {
            return Err(EngineError::UnknownOption {
                question_id: question_id.to_string(),
                option: option.to_string(),
            });
        }

        self.answers
            .insert(question_id.to_string(), option.to_string());
        Ok(())
    }

    /// Move to the next question, or finish after the last one.
    pub fn advance(&mut self) -> Result<&QuizState> {
        self.advance_at(Utc::now())
    }

    pub fn advance_at(&mut self, now: DateTime<Utc>) -> Result<&QuizState> {
        let index = match self.state {
            QuizState::Presenting { index } => index,
            QuizState::Completed(_) => return Err(EngineError::SessionCompleted),
        };

        if index + 1 < self.quiz.questions.len() {
            self.state = QuizState::Presenting { index: index + 1 };
        } else {
            let outcome = score_answers(&self.quiz.questions, &self.answers);
            tracing::debug!(
                quiz_id = %self.quiz.id,
                score = outcome.score,
                correct = outcome.correct_count,
                "quiz session completed"
            );
            self.completed_at = Some(now);
            self.state = QuizState::Completed(outcome);
        }
        Ok(&self.state)
    }

    /// Turn a completed session into the attempt record to persist.
    pub fn into_attempt(self, id: impl Into<String>, user_id: impl Into<String>) -> Result<QuizAttempt> {
        let (outcome, completed_at) = match (self.state, self.completed_at) {
            (QuizState::Completed(outcome), Some(completed_at)) => (outcome, completed_at),
            _ => return Err(EngineError::SessionInProgress),
        };
        let time_spent = (completed_at - self.started_at).num_seconds().max(0) as u64;

        Ok(QuizAttempt {
            id: id.into(),
            quiz_id: self.quiz.id,
            user_id: user_id.into(),
            topic: Some(self.quiz.topic),
            answers: self.answers,
            score: Some(outcome.score),
            started_at: Some(self.started_at),
            completed_at: Some(completed_at),
            time_spent: Some(time_spent),
        })
    }
}
