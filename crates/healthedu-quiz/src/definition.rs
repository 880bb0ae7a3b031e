//! Static quiz definitions and scoring.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id:             String,
  pub text:           String,
  pub options:        Vec<String>,
  /// Index into `options`.
  pub correct_answer: usize,
  /// Shown once the answer is revealed.
  pub explanation:    String,
}

/// A fixed, ordered set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
  pub id:          String,
  pub title:       String,
  pub description: String,
  /// Suggested duration in minutes. Informational only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub time_limit:  Option<u32>,
  pub questions:   Vec<Question>,
}

impl Quiz {
  /// Check the invariants a session relies on.
  pub fn validate(&self) -> Result<()> {
    if self.questions.is_empty() {
      return Err(Error::EmptyQuiz(self.id.clone()));
    }
    for q in &self.questions {
      let count = q.options.len();
      if count < 2 {
        return Err(Error::TooFewOptions { question: q.id.clone(), count });
      }
      if q.correct_answer >= count {
        return Err(Error::CorrectAnswerOutOfRange {
          question: q.id.clone(),
          index: q.correct_answer,
          count,
        });
      }
    }
    Ok(())
  }

  /// Number of slots in `answers` that hold the correct option. Unanswered
  /// slots never count.
  pub fn correct_count(&self, answers: &[Option<usize>]) -> usize {
    self
      .questions
      .iter()
      .zip(answers)
      .filter(|(q, a)| **a == Some(q.correct_answer))
      .count()
  }

  /// Percentage score in `0..=100`, rounded half up.
  pub fn score(&self, answers: &[Option<usize>]) -> u8 {
    let total = self.questions.len();
    if total == 0 {
      return 0;
    }
    let correct = self.correct_count(answers);
    // round(100 * correct / total) in integers
    ((200 * correct + total) / (2 * total)) as u8
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn quiz(correct: &[usize]) -> Quiz {
    Quiz {
      id:          "sample".into(),
      title:       "Sample".into(),
      description: "A sample quiz".into(),
      time_limit:  Some(10),
      questions:   correct
        .iter()
        .enumerate()
        .map(|(i, &c)| Question {
          id:             format!("q{i}"),
          text:           format!("Question {i}"),
          options:        vec!["A".into(), "B".into(), "C".into(), "D".into()],
          correct_answer: c,
          explanation:    String::new(),
        })
        .collect(),
    }
  }

  #[test]
  fn score_counts_only_correct_answers() {
    let q = quiz(&[0, 1, 2, 3, 0]);
    let answers = [Some(0), Some(0), None, Some(3), Some(0)];
    assert_eq!(q.correct_count(&answers), 3);
    assert_eq!(q.score(&answers), 60);
  }

  #[test]
  fn score_rounds_half_up() {
    let q = quiz(&[0, 0, 0]);
    assert_eq!(q.score(&[Some(0), None, None]), 33);
    assert_eq!(q.score(&[Some(0), Some(0), None]), 67);

    let q = quiz(&[0; 8]);
    // 1/8 = 12.5%
    assert_eq!(q.score(&[Some(0), None, None, None, None, None, None, None]), 13);
  }

  #[test]
  fn score_bounds() {
    let q = quiz(&[1, 1]);
    assert_eq!(q.score(&[None, None]), 0);
    assert_eq!(q.score(&[Some(1), Some(1)]), 100);
  }

  #[test]
  fn validate_rejects_empty_quiz() {
    let q = quiz(&[]);
    assert!(matches!(q.validate(), Err(Error::EmptyQuiz(_))));
  }

  #[test]
  fn validate_rejects_out_of_range_answer() {
    let q = quiz(&[0, 4]);
    assert!(matches!(
      q.validate(),
      Err(Error::CorrectAnswerOutOfRange { index: 4, count: 4, .. })
    ));
  }

  #[test]
  fn validate_rejects_single_option_question() {
    let mut q = quiz(&[0]);
    q.questions[0].options.truncate(1);
    assert!(matches!(q.validate(), Err(Error::TooFewOptions { count: 1, .. })));
  }

  #[test]
  fn deserialises_camel_case_definition() {
    let q: Quiz = serde_json::from_str(
      r#"{
        "id": "x", "title": "X", "description": "d", "timeLimit": 5,
        "questions": [
          { "id": "x1", "text": "?", "options": ["a", "b"],
            "correctAnswer": 1, "explanation": "because" }
        ]
      }"#,
    )
    .unwrap();
    assert_eq!(q.time_limit, Some(5));
    assert_eq!(q.questions[0].correct_answer, 1);
    assert!(q.validate().is_ok());
  }
}
