//! A student's lesson and assignment summary.

use healthedu_core::{
  StoreExt,
  record::{StudentAssignment, StudentProgress},
  store::TableStore,
};
use serde::Serialize;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
  pub completed_lessons:  usize,
  pub total_lessons:      usize,
  /// Assignments that carry a score.
  pub scored_assignments: usize,
  /// Mean of those scores, rounded half up; zero when there are none.
  pub average_score:      u8,
}

impl ProgressSummary {
  /// Completed lessons as a whole percentage of all tracked lessons.
  pub fn lesson_percent(&self) -> u8 { rounded_mean(self.completed_lessons * 100, self.total_lessons) }
}

fn rounded_mean(sum: usize, count: usize) -> u8 {
  if count == 0 {
    return 0;
  }
  ((2 * sum + count) / (2 * count)) as u8
}

/// Summarise `student_id`'s progress, optionally within one topic.
///
/// Only progress rows that reference a lesson count; rows that just hold a
/// topic preference are skipped.
pub fn summary<S>(store: &S, student_id: &str, topic_id: Option<&str>) -> Result<ProgressSummary>
where
  S: TableStore + ?Sized,
{
  let mut lessons = store
    .from::<StudentProgress>()
    .select("content_id, completed")
    .eq("student_id", student_id)
    .not_null("content_id");
  if let Some(topic) = topic_id {
    lessons = lessons.eq("topic_id", topic);
  }
  let lessons = lessons.execute()?;

  let scores: Vec<usize> = store
    .from::<StudentAssignment>()
    .select("score")
    .eq("student_id", student_id)
    .not_null("score")
    .execute()?
    .into_iter()
    .filter_map(|a| a.score.map(usize::from))
    .collect();

  Ok(ProgressSummary {
    completed_lessons:  lessons.iter().filter(|l| l.completed).count(),
    total_lessons:      lessons.len(),
    scored_assignments: scores.len(),
    average_score:      rounded_mean(scores.iter().sum(), scores.len()),
  })
}
