//! Topic lessons and per-topic content preferences.

use healthedu_core::{
  StoreExt,
  record::{ContentType, CourseContent, StudentProgress, StudentProgressPatch},
  store::TableStore,
};

use crate::Result;

/// Conflict target for preference rows: one per student and topic.
pub const PREFERENCE_KEY: &str = "student_id, topic_id";

/// How many of the newest lessons are considered for recommendations.
const RECOMMENDATION_POOL: usize = 10;

/// Store `content_type` as `student_id`'s preferred format for `topic_id`.
pub fn set_preference<S>(
  store: &S,
  student_id: &str,
  topic_id: &str,
  content_type: ContentType,
) -> Result<StudentProgress>
where
  S: TableStore + ?Sized,
{
  let row = store.from::<StudentProgress>().upsert(
    &StudentProgressPatch {
      student_id: Some(student_id.to_owned()),
      topic_id: Some(topic_id.to_owned()),
      preferred_content_type: Some(content_type),
      ..Default::default()
    },
    PREFERENCE_KEY,
  )?;
  tracing::info!(student_id, topic_id, content_type = content_type.as_str(), "preference saved");
  Ok(row)
}

/// The preferred format for `topic_id`, if one was stored.
pub fn preference<S>(store: &S, student_id: &str, topic_id: &str) -> Result<Option<ContentType>>
where
  S: TableStore + ?Sized,
{
  let row = store
    .from::<StudentProgress>()
    .select("preferred_content_type")
    .eq("student_id", student_id)
    .eq("topic_id", topic_id)
    .maybe_single()?;
  Ok(row.and_then(|r| r.preferred_content_type))
}

/// Lessons in `topic_id`, optionally restricted to one format.
pub fn topic_content<S>(
  store: &S,
  topic_id: &str,
  content_type: Option<ContentType>,
) -> Result<Vec<CourseContent>>
where
  S: TableStore + ?Sized,
{
  let mut query = store.from::<CourseContent>().select("*").eq("topic_id", topic_id);
  if let Some(kind) = content_type {
    query = query.eq("content_type", kind.as_str());
  }
  Ok(query.execute()?)
}

/// Up to `n` of the newest lessons that `student_id` has not completed.
pub fn recommended<S>(store: &S, student_id: &str, n: usize) -> Result<Vec<CourseContent>>
where
  S: TableStore + ?Sized,
{
  let completed: Vec<String> = store
    .from::<StudentProgress>()
    .select("content_id, completed")
    .eq("student_id", student_id)
    .eq("completed", true)
    .execute()?
    .into_iter()
    .filter_map(|p| p.content_id)
    .collect();

  let newest = store
    .from::<CourseContent>()
    .select("*")
    .order("created_at", false)
    .limit(RECOMMENDATION_POOL)
    .execute()?;

  Ok(
    newest
      .into_iter()
      .filter(|c| !completed.contains(&c.id))
      .take(n)
      .collect(),
  )
}
