//! Typed record shapes, one per table.
//!
//! Storage is schema-less: a table holds [`Row`]s (JSON objects). Each table
//! also has a concrete struct implementing [`Record`], and rows are
//! deserialised into it when a query is materialised. Optional fields are
//! skipped when `None` so a shallow merge never overwrites stored values with
//! nulls.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, Result, timestamp};

/// A single stored row: field name to JSON value.
pub type Row = serde_json::Map<String, Value>;

/// A record type bound to a named table.
pub trait Record: Serialize + DeserializeOwned {
  /// Name of the backing table.
  const TABLE: &'static str;
}

/// Serialise `value` into a [`Row`]. Fails if it is not a JSON object.
pub fn to_row<T: Serialize + ?Sized>(table: &str, value: &T) -> Result<Row> {
  match serde_json::to_value(value)? {
    Value::Object(row) => Ok(row),
    _ => Err(Error::NotAnObject { table: table.to_owned() }),
  }
}

/// Deserialise a stored [`Row`] into `T`.
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T> {
  Ok(serde_json::from_value(Value::Object(row))?)
}

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Teacher,
  Parent,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Student => "student",
      Self::Teacher => "teacher",
      Self::Parent => "parent",
    }
  }
}

/// How a piece of course content is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
  Text,
  Video,
}

impl ContentType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Text => "text",
      Self::Video => "video",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
  Assigned,
  Submitted,
  Completed,
}

impl AssignmentStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Assigned => "assigned",
      Self::Submitted => "submitted",
      Self::Completed => "completed",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
  Happy,
  #[default]
  Neutral,
  Sad,
}

impl Mood {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Happy => "happy",
      Self::Neutral => "neutral",
      Self::Sad => "sad",
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// `profiles`: one per account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub id:     String,
  pub name:   String,
  pub role:   Role,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub school: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email:  Option<String>,
}

impl Record for Profile {
  const TABLE: &'static str = "profiles";
}

/// `course_content`: a lesson within a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseContent {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub id:           String,
  pub topic_id:     String,
  pub title:        String,
  pub content_type: ContentType,
  /// HTML body for text lessons, a URL for video lessons.
  pub content:      String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_by:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
  pub created_at:   Option<DateTime<Utc>>,
}

impl Record for CourseContent {
  const TABLE: &'static str = "course_content";
}

/// `assignments`: created by a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub id:          String,
  pub title:       String,
  pub description: String,
  #[serde(with = "timestamp")]
  pub due_date:    DateTime<Utc>,
  pub teacher_id:  String,
}

impl Record for Assignment {
  const TABLE: &'static str = "assignments";
}

/// `student_assignments`: a student's copy of an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAssignment {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub id:            String,
  pub assignment_id: String,
  pub student_id:    String,
  pub status:        AssignmentStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub score:         Option<u8>,
  #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
  pub submitted_at:  Option<DateTime<Utc>>,
}

impl Record for StudentAssignment {
  const TABLE: &'static str = "student_assignments";
}

/// Partial `student_assignments` row for updates and upserts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentAssignmentPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignment_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub student_id:    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:        Option<AssignmentStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub score:         Option<u8>,
  #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
  pub submitted_at:  Option<DateTime<Utc>>,
}

/// `student_progress`: lesson completion and per-topic preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProgress {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub id:                     String,
  pub student_id:             String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content_id:             Option<String>,
  #[serde(default)]
  pub completed:              bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub preferred_content_type: Option<ContentType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub topic_id:               Option<String>,
}

impl Record for StudentProgress {
  const TABLE: &'static str = "student_progress";
}

/// Partial `student_progress` row for updates and upserts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentProgressPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub student_id:             Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content_id:             Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub completed:              Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub preferred_content_type: Option<ContentType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub topic_id:               Option<String>,
}

/// `parent_child`: links a parent profile to a student profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentChild {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub id:        String,
  pub parent_id: String,
  pub child_id:  String,
}

impl Record for ParentChild {
  const TABLE: &'static str = "parent_child";
}

/// `health_logs`: at most one entry per student per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthLog {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub id:               String,
  pub student_id:       String,
  pub date:             NaiveDate,
  /// Glasses of water.
  pub water_intake:     u32,
  pub sleep_hours:      f64,
  pub exercise_minutes: u32,
  pub mood:             Mood,
}

impl Record for HealthLog {
  const TABLE: &'static str = "health_logs";
}

/// The daily measurements of a [`HealthLog`], without identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthLogPatch {
  pub water_intake:     u32,
  pub sleep_hours:      f64,
  pub exercise_minutes: u32,
  pub mood:             Mood,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_id_is_omitted_from_row() {
    let link = ParentChild {
      id:        String::new(),
      parent_id: "3".into(),
      child_id:  "1".into(),
    };
    let row = to_row(ParentChild::TABLE, &link).unwrap();
    assert!(!row.contains_key("id"));
    assert_eq!(row["parent_id"], "3");
  }

  #[test]
  fn optional_fields_are_omitted_when_none() {
    let patch = StudentProgressPatch {
      student_id: Some("1".into()),
      topic_id: Some("nutrition".into()),
      preferred_content_type: Some(ContentType::Video),
      ..Default::default()
    };
    let row = to_row(StudentProgress::TABLE, &patch).unwrap();
    assert_eq!(row.len(), 3);
    assert_eq!(row["preferred_content_type"], "video");
  }

  #[test]
  fn non_object_payload_is_rejected() {
    let err = to_row("profiles", &42).unwrap_err();
    assert!(matches!(err, Error::NotAnObject { .. }));
  }

  #[test]
  fn health_log_date_round_trips_as_iso_string() {
    let row: Row = serde_json::from_value(serde_json::json!({
      "id": "1",
      "student_id": "1",
      "date": "2025-03-01",
      "water_intake": 6,
      "sleep_hours": 7.5,
      "exercise_minutes": 30,
      "mood": "happy",
    }))
    .unwrap();
    let log: HealthLog = from_row(row).unwrap();
    assert_eq!(log.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    assert_eq!(log.mood, Mood::Happy);

    let back = to_row(HealthLog::TABLE, &log).unwrap();
    assert_eq!(back["date"], "2025-03-01");
  }
}
