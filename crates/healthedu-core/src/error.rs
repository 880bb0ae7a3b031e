//! Error types for `healthedu-core`.

use thiserror::Error;

/// Code reported when a single-row fetch matched nothing. Kept identical to
/// the hosted database's code so callers can match on it the same way.
pub const NOT_FOUND_CODE: &str = "PGRST116";

#[derive(Debug, Error)]
pub enum Error {
  /// `single()` was called on a query that matched zero rows.
  #[error("no rows returned from {table}")]
  NotFound { table: String },

  #[error("upsert conflict target names no fields")]
  EmptyConflictTarget,

  #[error("payload for {table} does not serialise to an object")]
  NotAnObject { table: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Stable machine-readable code for this error.
  pub fn code(&self) -> &'static str {
    match self {
      Self::NotFound { .. } => NOT_FOUND_CODE,
      Self::EmptyConflictTarget => "empty_conflict_target",
      Self::NotAnObject { .. } => "not_an_object",
      Self::Serialization(_) => "serialization",
      Self::Store(_) => "store",
    }
  }

  /// `true` when the error only signals absence of a row.
  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
