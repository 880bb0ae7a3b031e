//! Assignment listings and quiz results.

use chrono::{DateTime, Utc};
use healthedu_core::{
  StoreExt,
  record::{Assignment, AssignmentStatus, StudentAssignment, StudentAssignmentPatch},
  store::TableStore,
};

use crate::{Error, Result};

/// Conflict target for results: one per assignment and student.
pub const RESULT_KEY: &str = "assignment_id, student_id";

/// `student_id`'s `n` most recently submitted assignments, newest first.
/// Unsubmitted ones sort after every submitted one.
pub fn recent<S>(store: &S, student_id: &str, n: usize) -> Result<Vec<StudentAssignment>>
where
  S: TableStore + ?Sized,
{
  Ok(
    store
      .from::<StudentAssignment>()
      .select("*")
      .eq("student_id", student_id)
      .order("submitted_at", false)
      .limit(n)
      .execute()?,
  )
}

/// Record `score` as `student_id`'s result for `assignment_id`, marking it
/// completed. Creates the student's copy if it does not exist yet.
pub fn record_score<S>(
  store: &S,
  assignment_id: &str,
  student_id: &str,
  score: u8,
  submitted_at: DateTime<Utc>,
) -> Result<StudentAssignment>
where
  S: TableStore + ?Sized,
{
  if score > 100 {
    return Err(Error::InvalidScore(score));
  }
  let stored = store.from::<StudentAssignment>().upsert(
    &StudentAssignmentPatch {
      assignment_id: Some(assignment_id.to_owned()),
      student_id:    Some(student_id.to_owned()),
      status:        Some(AssignmentStatus::Completed),
      score:         Some(score),
      submitted_at:  Some(submitted_at),
    },
    RESULT_KEY,
  )?;
  tracing::info!(assignment_id, student_id, score, "assignment score recorded");
  Ok(stored)
}

/// Assignments created by `teacher_id`, soonest due first.
pub fn for_teacher<S>(store: &S, teacher_id: &str) -> Result<Vec<Assignment>>
where
  S: TableStore + ?Sized,
{
  Ok(
    store
      .from::<Assignment>()
      .select("*")
      .eq("teacher_id", teacher_id)
      .order("due_date", true)
      .execute()?,
  )
}
