//! Quiz catalogs: the built-in set and JSON files of the same shape.

use std::path::Path;

use crate::{Error, Result, definition::Quiz};

const BUILTIN: &str = include_str!("../data/quizzes.json");

/// An ordered list of validated quizzes.
#[derive(Debug, Clone)]
pub struct Catalog {
  quizzes: Vec<Quiz>,
}

impl Catalog {
  /// Build a catalog, validating every quiz. An empty list is an error.
  pub fn new(quizzes: Vec<Quiz>) -> Result<Self> {
    if quizzes.is_empty() {
      return Err(Error::EmptyCatalog);
    }
    for quiz in &quizzes {
      quiz.validate()?;
    }
    Ok(Self { quizzes })
  }

  /// The quizzes shipped with the application.
  pub fn builtin() -> Result<Self> { Self::from_json(BUILTIN) }

  /// Parse a JSON array of quiz definitions.
  pub fn from_json(raw: &str) -> Result<Self> { Self::new(serde_json::from_str(raw)?) }

  /// Load a JSON array of quiz definitions from `path`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json(&raw)
  }

  pub fn quizzes(&self) -> &[Quiz] { &self.quizzes }

  pub fn get(&self, id: &str) -> Option<&Quiz> { self.quizzes.iter().find(|q| q.id == id) }

  /// Look up `id`, failing with [`Error::UnknownQuiz`].
  pub fn require(&self, id: &str) -> Result<&Quiz> {
    self.get(id).ok_or_else(|| Error::UnknownQuiz(id.to_owned()))
  }

  /// Look up `id`, falling back to the first quiz when it is unknown.
  pub fn get_or_first(&self, id: &str) -> &Quiz {
    match self.get(id) {
      Some(quiz) => quiz,
      None => {
        tracing::debug!(id, "unknown quiz, using the first one");
        &self.quizzes[0]
      }
    }
  }
}
