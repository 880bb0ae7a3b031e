//! The quiz-taking state machine.
//!
//! [`step`] is the pure transition function: it maps a state and an event to
//! the next state, or to a [`Rejection`] when the event is not allowed from
//! that state. [`QuizSession`] owns a state, applies events through `step`,
//! and fires the completion callback on the transition into the completed
//! state.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  definition::{Question, Quiz},
};

// ─── State and events ────────────────────────────────────────────────────────

/// Progress through one attempt.
///
/// `answers.len()` always equals the number of questions, and
/// `current_index` is in range while `completed` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
  pub current_index: usize,
  /// Selected option per question, `None` when unanswered.
  pub answers:       Vec<Option<usize>>,
  /// Whether the current question's correctness has been shown. Once set,
  /// the current answer is locked.
  pub revealed:      bool,
  pub completed:     bool,
  /// Fixed at completion; cleared only by a restart.
  pub score:         Option<u8>,
}

impl QuizState {
  /// A fresh attempt at a quiz with `questions` questions.
  pub fn new(questions: usize) -> Self {
    Self {
      current_index: 0,
      answers:       vec![None; questions],
      revealed:      false,
      completed:     false,
      score:         None,
    }
  }

  pub fn status(&self) -> Status {
    if self.completed { Status::Completed } else { Status::InProgress }
  }

  /// The answer stored for the current question.
  pub fn current_answer(&self) -> Option<usize> {
    self.answers.get(self.current_index).copied().flatten()
  }

  /// Whether this state can belong to an attempt at a quiz with `questions`
  /// questions.
  pub fn fits(&self, questions: usize) -> bool {
    self.answers.len() == questions && (self.completed || self.current_index < questions)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
  InProgress,
  Completed,
}

/// A user action on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  SelectOption { question: usize, option: usize },
  CheckAnswer,
  Advance,
  GoToPrevious,
  Restart,
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
  /// The attempt is over; only a restart is accepted.
  Completed,
  /// The current answer has been revealed and is locked.
  AnswerLocked,
  /// Selection targeted a question other than the current one.
  NotCurrentQuestion,
  /// The option index is outside the question's options.
  NoSuchOption,
  /// Checking requires a selected option.
  NothingSelected,
  /// Advancing requires the answer to be revealed first.
  NotRevealed,
  /// Already at the first question.
  AtFirstQuestion,
  /// The state does not fit the quiz; only a restart is accepted.
  StateMismatch,
}

/// The outcome of dispatching an event to a [`QuizSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  Applied,
  Rejected(Rejection),
}

// ─── Transition function ─────────────────────────────────────────────────────

/// Apply `event` to `state` for `quiz`. Never mutates its input and never
/// panics: a state that does not fit the quiz rejects everything but a
/// restart.
pub fn step(
  quiz: &Quiz,
  state: &QuizState,
  event: Event,
) -> Result<QuizState, Rejection> {
  if event != Event::Restart && !state.fits(quiz.questions.len()) {
    return Err(Rejection::StateMismatch);
  }
  if state.completed && event != Event::Restart {
    return Err(Rejection::Completed);
  }

  let mut next = state.clone();
  match event {
    Event::SelectOption { question, option } => {
      if question != state.current_index {
        return Err(Rejection::NotCurrentQuestion);
      }
      if state.revealed {
        return Err(Rejection::AnswerLocked);
      }
      let options = quiz.questions.get(question).map_or(0, |q| q.options.len());
      if option >= options {
        return Err(Rejection::NoSuchOption);
      }
      next.answers[question] = Some(option);
    }
    Event::CheckAnswer => {
      if state.current_answer().is_none() {
        return Err(Rejection::NothingSelected);
      }
      next.revealed = true;
    }
    Event::Advance => {
      if !state.revealed {
        return Err(Rejection::NotRevealed);
      }
      next.revealed = false;
      if state.current_index + 1 >= quiz.questions.len() {
        next.completed = true;
        next.score = Some(quiz.score(&state.answers));
      } else {
        next.current_index += 1;
      }
    }
    Event::GoToPrevious => {
      if state.current_index == 0 {
        return Err(Rejection::AtFirstQuestion);
      }
      next.current_index -= 1;
      next.revealed = false;
    }
    Event::Restart => next = QuizState::new(quiz.questions.len()),
  }
  Ok(next)
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// One attempt at a quiz, with an optional callback invoked with the final
/// score each time the attempt completes.
pub struct QuizSession<'a> {
  quiz:        Quiz,
  state:       QuizState,
  on_complete: Option<Box<dyn FnMut(u8) + 'a>>,
}

impl<'a> QuizSession<'a> {
  /// Start an attempt. Fails if `quiz` does not validate.
  pub fn new(quiz: Quiz) -> Result<Self> {
    quiz.validate()?;
    let state = QuizState::new(quiz.questions.len());
    Ok(Self { quiz, state, on_complete: None })
  }

  /// Register the completion callback.
  pub fn on_complete(mut self, callback: impl FnMut(u8) + 'a) -> Self {
    self.on_complete = Some(Box::new(callback));
    self
  }

  pub fn quiz(&self) -> &Quiz { &self.quiz }

  pub fn state(&self) -> &QuizState { &self.state }

  /// The question at the current index.
  pub fn current_question(&self) -> &Question {
    &self.quiz.questions[self.state.current_index]
  }

  pub fn score(&self) -> Option<u8> { self.state.score }

  pub fn correct_count(&self) -> usize { self.quiz.correct_count(&self.state.answers) }

  /// Whether the stored answer for question `index` is correct; `None` when
  /// unanswered or out of range.
  pub fn is_answer_correct(&self, index: usize) -> Option<bool> {
    let answer = self.state.answers.get(index).copied().flatten()?;
    Some(answer == self.quiz.questions[index].correct_answer)
  }

  /// Apply `event`, firing the completion callback if this event finished
  /// the attempt.
  pub fn dispatch(&mut self, event: Event) -> Transition {
    match step(&self.quiz, &self.state, event) {
      Ok(next) => {
        let finished = !self.state.completed && next.completed;
        self.state = next;
        if finished && let Some(score) = self.state.score {
          tracing::info!(quiz = %self.quiz.id, score, "quiz completed");
          if let Some(callback) = self.on_complete.as_mut() {
            callback(score);
          }
        }
        Transition::Applied
      }
      Err(rejection) => {
        tracing::debug!(quiz = %self.quiz.id, ?event, ?rejection, "transition rejected");
        Transition::Rejected(rejection)
      }
    }
  }

  pub fn select_option(&mut self, question: usize, option: usize) -> Transition {
    self.dispatch(Event::SelectOption { question, option })
  }

  pub fn check_answer(&mut self) -> Transition { self.dispatch(Event::CheckAnswer) }

  pub fn advance(&mut self) -> Transition { self.dispatch(Event::Advance) }

  pub fn go_to_previous(&mut self) -> Transition { self.dispatch(Event::GoToPrevious) }

  pub fn restart(&mut self) -> Transition { self.dispatch(Event::Restart) }
}
