//! Error type for `healthedu-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] healthedu_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The seed document is not an object of arrays of objects.
  #[error("invalid seed: {0}")]
  InvalidSeed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
