//! Error type for quiz definitions and catalogs.
//!
//! Session transitions never produce these; a disallowed transition is
//! reported as a [`crate::Rejection`] and leaves state unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("quiz {0:?} has no questions")]
  EmptyQuiz(String),

  #[error("question {question:?} needs at least two options, has {count}")]
  TooFewOptions { question: String, count: usize },

  #[error("question {question:?} marks option {index} correct but has {count} options")]
  CorrectAnswerOutOfRange {
    question: String,
    index:    usize,
    count:    usize,
  },

  #[error("unknown quiz: {0:?}")]
  UnknownQuiz(String),

  #[error("catalog is empty")]
  EmptyCatalog,

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
