//! Tests for `MemoryStore` driven through the fluent client.

use chrono::{NaiveDate, TimeZone};
use healthedu_core::{
  Error as CoreError, NOT_FOUND_CODE, StoreExt,
  record::{
    ContentType, HealthLog, HealthLogPatch, Mood, ParentChild, Profile, Role, Row,
    StudentAssignment, StudentProgress, StudentProgressPatch,
  },
};
use serde_json::json;

use crate::{Error, MemoryStore};

fn store() -> MemoryStore { MemoryStore::with_demo_data().expect("demo seed") }

fn log(id: &str, student: &str, day: u32, water: u32) -> HealthLog {
  HealthLog {
    id:               id.into(),
    student_id:       student.into(),
    date:             NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
    water_intake:     water,
    sleep_hours:      8.0,
    exercise_minutes: 20,
    mood:             Mood::Neutral,
  }
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[test]
fn demo_seed_deserialises_into_typed_records() {
  let s = store();
  assert_eq!(s.from::<Profile>().select("*").execute().unwrap().len(), 4);
  assert_eq!(s.from::<HealthLog>().select("*").execute().unwrap().len(), 2);
  assert_eq!(
    s.from::<StudentAssignment>().select("*").execute().unwrap().len(),
    2
  );
  assert!(s.table_names().contains(&"parent_child".to_string()));
}

#[test]
fn seed_rejects_non_array_tables() {
  let err = MemoryStore::new()
    .seed_json(r#"{ "profiles": { "id": "1" } }"#)
    .unwrap_err();
  assert!(matches!(err, Error::InvalidSeed(_)));
}

#[test]
fn seed_rejects_non_object_rows_without_writing() {
  let s = MemoryStore::new();
  let err = s
    .seed_json(r#"{ "a": [ { "id": "1" } ], "b": [ 1 ] }"#)
    .unwrap_err();
  assert!(matches!(err, Error::InvalidSeed(_)));
  assert!(s.table_names().is_empty());
}

#[test]
fn timestamps_in_any_offset_sort_by_instant() {
  let s = MemoryStore::new();
  s.seed_json(
    r#"{ "student_assignments": [
      { "id": "a", "assignment_id": "1", "student_id": "1", "status": "completed",
        "submitted_at": "2025-04-14T12:00:00+02:00" },
      { "id": "b", "assignment_id": "2", "student_id": "1", "status": "completed",
        "submitted_at": "2025-04-14T10:00:00.5Z" },
      { "id": "c", "assignment_id": "3", "student_id": "1", "status": "completed",
        "submitted_at": "2025-04-14T10:00:00.25Z" }
    ] }"#,
  )
  .unwrap();

  let ids: Vec<String> = s
    .from::<StudentAssignment>()
    .select("*")
    .order("submitted_at", false)
    .execute()
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(ids, ["b", "c", "a"]);
  assert_eq!(
    s.snapshot("student_assignments")[0]["submitted_at"],
    "2025-04-14T10:00:00.000000Z"
  );
}

#[test]
fn typed_writes_store_canonical_timestamps() {
  let s = MemoryStore::new();
  let at = chrono::Utc
    .with_ymd_and_hms(2025, 4, 14, 10, 30, 0)
    .unwrap();
  s.from::<StudentAssignment>()
    .insert(&StudentAssignment {
      id:            String::new(),
      assignment_id: "1".into(),
      student_id:    "1".into(),
      status:        healthedu_core::record::AssignmentStatus::Completed,
      score:         Some(90),
      submitted_at:  Some(at),
    })
    .unwrap();
  assert_eq!(
    s.snapshot("student_assignments")[0]["submitted_at"],
    json!("2025-04-14T10:30:00.000000Z")
  );
}

#[test]
fn reset_drops_every_table() {
  let s = store();
  s.reset();
  assert!(s.table_names().is_empty());
  assert!(s.from::<Profile>().select("*").execute().unwrap().is_empty());
}

#[test]
fn clones_share_tables() {
  let s = MemoryStore::new();
  let other = s.clone();
  other.from::<HealthLog>().insert(&log("a", "1", 1, 3)).unwrap();
  assert_eq!(s.snapshot("health_logs").len(), 1);
}

// ─── single() ────────────────────────────────────────────────────────────────

#[test]
fn single_returns_the_one_match() {
  let s = store();
  let profile = s
    .from::<Profile>()
    .select("id, name, role")
    .eq("email", "teacher@example.com")
    .single()
    .unwrap();
  assert_eq!(profile.id, "2");
  assert_eq!(profile.role, Role::Teacher);
}

#[test]
fn single_with_no_match_is_not_found() {
  let s = store();
  let err = s
    .from::<Profile>()
    .select("*")
    .eq("email", "nobody@example.com")
    .single()
    .unwrap_err();
  assert!(err.is_not_found());
  assert_eq!(err.code(), NOT_FOUND_CODE);
}

#[test]
fn single_with_many_matches_returns_first_in_table_order() {
  let s = store();
  let first = s
    .from::<Profile>()
    .select("*")
    .eq("role", Role::Student.as_str())
    .single()
    .unwrap();
  assert_eq!(first.id, "1");
}

#[test]
fn maybe_single_reports_absence_as_none() {
  let s = store();
  let none = s
    .from::<ParentChild>()
    .select("*")
    .eq("parent_id", "3")
    .eq("child_id", "4")
    .maybe_single()
    .unwrap();
  assert!(none.is_none());
}

#[test]
fn unknown_table_reads_as_empty() {
  let s = store();
  let rows = s.table::<Row>("no_such_table").select("*").execute().unwrap();
  assert!(rows.is_empty());
  let err = s.table::<Row>("no_such_table").select("*").single().unwrap_err();
  assert!(matches!(err, CoreError::NotFound { .. }));
}

// ─── order / limit ───────────────────────────────────────────────────────────

#[test]
fn descending_order_and_limit_returns_top_n_with_stable_ties() {
  let s = MemoryStore::new();
  s.from::<HealthLog>()
    .insert_many(&[
      log("a", "1", 1, 6),
      log("b", "1", 2, 8),
      log("c", "1", 3, 6),
      log("d", "1", 4, 2),
    ])
    .unwrap();

  let top: Vec<String> = s
    .from::<HealthLog>()
    .select("*")
    .order("water_intake", false)
    .limit(3)
    .execute()
    .unwrap()
    .into_iter()
    .map(|l| l.id)
    .collect();
  assert_eq!(top, ["b", "a", "c"]);
}

#[test]
fn select_columns_do_not_project() {
  let s = store();
  let log = s
    .from::<HealthLog>()
    .select("id")
    .eq("id", "1")
    .single()
    .unwrap();
  assert_eq!(log.water_intake, 6);
  assert_eq!(log.mood, Mood::Happy);
}

// ─── insert ──────────────────────────────────────────────────────────────────

#[test]
fn insert_assigns_missing_ids_and_keeps_given_ones() {
  let s = MemoryStore::new();
  let stored = s
    .from::<HealthLog>()
    .insert_many(&[log("", "1", 1, 3), log("fixed", "1", 2, 4)])
    .unwrap();
  assert_eq!(stored.len(), 2);
  assert!(!stored[0].id.is_empty());
  assert_eq!(stored[1].id, "fixed");

  let rows = s.snapshot("health_logs");
  assert_eq!(rows[0]["id"], stored[0].id.as_str());
}

#[test]
fn insert_does_not_enforce_unique_ids() {
  let s = MemoryStore::new();
  s.from::<HealthLog>().insert(&log("dup", "1", 1, 3)).unwrap();
  s.from::<HealthLog>().insert(&log("dup", "1", 2, 4)).unwrap();
  assert_eq!(s.snapshot("health_logs").len(), 2);
}

#[test]
fn insert_of_incompatible_rows_is_all_or_nothing() {
  let s = MemoryStore::new();
  let rows = vec![json!({ "id": "ok" }), json!("not a row")];
  let err = s.table::<serde_json::Value>("misc").insert_many(&rows).unwrap_err();
  assert!(matches!(err, CoreError::NotAnObject { .. }));
  assert!(s.snapshot("misc").is_empty());
}

// ─── update ──────────────────────────────────────────────────────────────────

#[test]
fn update_merges_patch_into_matching_rows() {
  let s = store();
  let updated = s
    .from::<HealthLog>()
    .update(&HealthLogPatch {
      water_intake:     9,
      sleep_hours:      8.5,
      exercise_minutes: 45,
      mood:             Mood::Happy,
    })
    .eq("id", "2")
    .unwrap();
  assert_eq!(updated.len(), 1);
  assert_eq!(updated[0].water_intake, 9);
  assert_eq!(updated[0].student_id, "1");

  let other = s.from::<HealthLog>().select("*").eq("id", "1").single().unwrap();
  assert_eq!(other.water_intake, 6);
}

#[test]
fn update_applies_to_every_match() {
  let s = store();
  let updated = s
    .from::<HealthLog>()
    .update(&json!({ "mood": "sad" }))
    .eq("student_id", "1")
    .unwrap();
  assert_eq!(updated.len(), 2);
  assert!(updated.iter().all(|l| l.mood == Mood::Sad));
}

#[test]
fn update_with_no_match_changes_nothing() {
  let s = store();
  let before = s.snapshot("health_logs");
  let updated = s
    .from::<HealthLog>()
    .update(&json!({ "mood": "sad" }))
    .eq("student_id", "99")
    .unwrap();
  assert!(updated.is_empty());
  assert_eq!(s.snapshot("health_logs"), before);
}

// ─── upsert ──────────────────────────────────────────────────────────────────

fn preference(topic: &str, kind: ContentType) -> StudentProgressPatch {
  StudentProgressPatch {
    student_id: Some("1".into()),
    topic_id: Some(topic.into()),
    preferred_content_type: Some(kind),
    ..Default::default()
  }
}

#[test]
fn upsert_twice_leaves_one_row_with_latest_value() {
  let s = MemoryStore::new();
  let progress = s.from::<StudentProgress>();
  let first = progress
    .upsert(&preference("nutrition", ContentType::Text), "student_id, topic_id")
    .unwrap();
  let second = s
    .from::<StudentProgress>()
    .upsert(&preference("nutrition", ContentType::Video), "student_id, topic_id")
    .unwrap();

  assert_eq!(first.id, second.id);
  let rows = s
    .from::<StudentProgress>()
    .select("*")
    .eq("student_id", "1")
    .eq("topic_id", "nutrition")
    .execute()
    .unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].preferred_content_type, Some(ContentType::Video));
}

#[test]
fn upsert_with_different_key_appends() {
  let s = MemoryStore::new();
  s.from::<StudentProgress>()
    .upsert(&preference("nutrition", ContentType::Text), "student_id,topic_id")
    .unwrap();
  s.from::<StudentProgress>()
    .upsert(&preference("first-aid", ContentType::Text), "student_id,topic_id")
    .unwrap();
  assert_eq!(s.snapshot("student_progress").len(), 2);
}

#[test]
fn upsert_merge_keeps_unpatched_fields() {
  let s = store();
  let merged = s
    .from::<StudentProgress>()
    .upsert(&preference("nutrition", ContentType::Video), "student_id, topic_id")
    .unwrap();
  assert_eq!(merged.id, "1");
  assert!(merged.completed);
  assert_eq!(merged.content_id.as_deref(), Some("1"));
}

#[test]
fn upsert_without_every_key_appends() {
  let s = MemoryStore::new();
  s.seed_json(r#"{ "student_progress": [ { "id": "a", "student_id": "1" } ] }"#)
    .unwrap();
  let payload = match json!({ "student_id": "1", "note": "y" }) {
    serde_json::Value::Object(row) => row,
    _ => unreachable!(),
  };
  let stored = s
    .table::<Row>("student_progress")
    .upsert(&payload, "student_id, topic_id")
    .unwrap();

  assert_ne!(stored["id"], "a");
  let rows = s.snapshot("student_progress");
  assert_eq!(rows.len(), 2);
  assert!(rows[0].get("note").is_none());
}

#[test]
fn upsert_requires_a_conflict_target() {
  let s = MemoryStore::new();
  let err = s
    .from::<StudentProgress>()
    .upsert(&preference("nutrition", ContentType::Text), " ")
    .unwrap_err();
  assert!(matches!(err, CoreError::EmptyConflictTarget));
  assert!(s.snapshot("student_progress").is_empty());
}
