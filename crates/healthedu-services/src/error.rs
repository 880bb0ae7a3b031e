//! Workflow errors.

use thiserror::Error;

/// An error returned by a workflow.
#[derive(Debug, Error)]
pub enum Error {
  #[error("no profile with email {0}")]
  ChildNotFound(String),

  #[error("profile {0} is not a student")]
  NotAStudent(String),

  #[error("child {child_id} is already linked to parent {parent_id}")]
  AlreadyLinked { parent_id: String, child_id: String },

  #[error("invalid health log: {0}")]
  InvalidHealthLog(String),

  #[error("score {0} is outside 0..=100")]
  InvalidScore(u8),

  #[error(transparent)]
  Data(#[from] healthedu_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
