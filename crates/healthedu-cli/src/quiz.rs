//! `healthedu quiz`: take a quiz on the terminal.
//!
//! Reads one command per line: an option number selects it, `c` reveals the
//! answer, `n` moves on, `p` goes back, `r` restarts and `q` quits.

use std::{
  cell::RefCell,
  io::{BufRead, Write},
};

use chrono::Utc;
use clap::Args;
use healthedu_core::store::TableStore;
use healthedu_quiz::{Catalog, QuizSession, Rejection, Transition};
use healthedu_services::assignments;

#[derive(Args, Debug)]
pub struct QuizArgs {
  /// Quiz to take. Unknown ids fall back to the first quiz.
  #[arg(default_value = "nutrition-basics")]
  pub quiz_id: String,

  /// Record the final score as the acting user's result for this assignment.
  #[arg(long)]
  pub assignment: Option<String>,

  /// List the available quizzes and exit.
  #[arg(long)]
  pub list: bool,
}

enum Input {
  Select(usize),
  Check,
  Next,
  Previous,
  Restart,
  Quit,
}

fn parse_input(line: &str) -> Option<Input> {
  match line.trim().to_ascii_lowercase().as_str() {
    "c" | "check" => Some(Input::Check),
    "n" | "next" => Some(Input::Next),
    "p" | "prev" | "previous" => Some(Input::Previous),
    "r" | "restart" => Some(Input::Restart),
    "q" | "quit" => Some(Input::Quit),
    other => other.parse::<usize>().ok().map(Input::Select),
  }
}

fn describe(rejection: Rejection) -> &'static str {
  match rejection {
    Rejection::Completed => "The quiz is finished; restart to try again.",
    Rejection::AnswerLocked => "The answer has been checked and cannot change.",
    Rejection::NotCurrentQuestion => "That is not the current question.",
    Rejection::NoSuchOption => "No such option.",
    Rejection::NothingSelected => "Select an option first.",
    Rejection::NotRevealed => "Check your answer before moving on.",
    Rejection::AtFirstQuestion => "Already at the first question.",
    Rejection::StateMismatch => "The quiz state is out of step; restart to continue.",
  }
}

fn render<W: Write>(session: &QuizSession<'_>, out: &mut W) -> std::io::Result<()> {
  let state = session.state();
  let total = session.quiz().questions.len();

  if state.completed {
    writeln!(
      out,
      "\nQuiz complete: {}% ({}/{total} correct)",
      state.score.unwrap_or(0),
      session.correct_count()
    )?;
    return writeln!(out, "[r]estart or [q]uit");
  }

  let index = state.current_index;
  let question = session.current_question();
  writeln!(out, "\nQuestion {}/{total}: {}", index + 1, question.text)?;
  for (i, option) in question.options.iter().enumerate() {
    let marker = if state.answers[index] == Some(i) { '>' } else { ' ' };
    writeln!(out, "{marker} {}. {option}", i + 1)?;
  }
  if state.revealed {
    if session.is_answer_correct(index) == Some(true) {
      writeln!(out, "Correct!")?;
    } else {
      writeln!(
        out,
        "Incorrect. The answer is {}.",
        question.correct_answer + 1
      )?;
    }
    writeln!(out, "{}", question.explanation)?;
  }
  writeln!(
    out,
    "[1-{}] select, [c]heck, [n]ext, [p]revious, [r]estart, [q]uit",
    question.options.len()
  )
}

/// Run the quiz loop until `q` or end of input. Returns the score of the
/// last completed attempt.
pub fn run<S, R, W>(
  store: &S,
  catalog: &Catalog,
  user_id: &str,
  args: &QuizArgs,
  input: R,
  out: &mut W,
) -> anyhow::Result<Option<u8>>
where
  S: TableStore + ?Sized,
  R: BufRead,
  W: Write,
{
  if args.list {
    for quiz in catalog.quizzes() {
      writeln!(out, "{:<20} {} ({} questions)", quiz.id, quiz.title, quiz.questions.len())?;
    }
    return Ok(None);
  }

  let quiz = catalog.get_or_first(&args.quiz_id).clone();
  writeln!(out, "{}\n{}", quiz.title, quiz.description)?;

  let scores = RefCell::new(Vec::new());
  let mut session = QuizSession::new(quiz)?.on_complete(|score| scores.borrow_mut().push(score));
  render(&session, out)?;

  for line in input.lines() {
    let line = line?;
    let transition = match parse_input(&line) {
      Some(Input::Quit) => break,
      Some(Input::Select(n)) if n >= 1 => {
        let question = session.state().current_index;
        session.select_option(question, n - 1)
      }
      Some(Input::Select(_)) => Transition::Rejected(Rejection::NoSuchOption),
      Some(Input::Check) => session.check_answer(),
      Some(Input::Next) => session.advance(),
      Some(Input::Previous) => session.go_to_previous(),
      Some(Input::Restart) => session.restart(),
      None => {
        writeln!(out, "Unrecognised input {:?}.", line.trim())?;
        continue;
      }
    };
    match transition {
      Transition::Applied => render(&session, out)?,
      Transition::Rejected(rejection) => writeln!(out, "{}", describe(rejection))?,
    }
  }
  drop(session);

  let last = scores.into_inner().pop();
  if let (Some(score), Some(assignment_id)) = (last, &args.assignment) {
    assignments::record_score(store, assignment_id, user_id, score, Utc::now())?;
    writeln!(out, "Recorded {score}% for assignment {assignment_id}.")?;
  }
  Ok(last)
}
