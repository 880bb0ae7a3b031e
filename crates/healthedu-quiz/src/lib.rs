//! Quiz definitions and the quiz-taking state machine.
//!
//! Pure and synchronous; no storage or UI dependencies. Scores are handed to
//! the caller through a completion callback, and persisting them is the
//! caller's business.
//!
//! # Quick start
//!
//! ```no_run
//! use healthedu_quiz::{Catalog, QuizSession};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let quiz = catalog.get_or_first("nutrition-basics").clone();
//! let mut session = QuizSession::new(quiz)
//!   .unwrap()
//!   .on_complete(|score| println!("scored {score}%"));
//! session.select_option(0, 2);
//! session.check_answer();
//! session.advance();
//! ```

mod catalog;
mod definition;
mod session;

pub mod error;

pub use catalog::Catalog;
pub use definition::{Question, Quiz};
pub use error::{Error, Result};
pub use session::{Event, QuizSession, QuizState, Rejection, Status, Transition, step};
