pub mod auth;
pub mod flashcards;
pub mod quiz_sessions;
pub mod statistics;
