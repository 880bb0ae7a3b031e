//! Stored timestamp format.
//!
//! Timestamps are stored as strings and ordered as strings, so every write
//! uses one fixed RFC 3339 form: UTC, microsecond precision, `Z` suffix.
//! Reads accept any RFC 3339 offset.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::record::Row;

/// Fields holding timestamps, in any table.
pub const TIMESTAMP_FIELDS: &[&str] = &["created_at", "due_date", "submitted_at"];

/// The stored form of `at`, e.g. `2025-04-14T10:30:00.000000Z`.
pub fn format(at: &DateTime<Utc>) -> String { at.to_rfc3339_opts(SecondsFormat::Micros, true) }

/// Rewrite every parseable timestamp field of `row` into the stored form.
/// Values that do not parse are left alone.
pub fn normalize(row: &mut Row) {
  for field in TIMESTAMP_FIELDS {
    let Some(Value::String(raw)) = row.get_mut(*field) else {
      continue;
    };
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
      *raw = format(&at.with_timezone(&Utc));
    }
  }
}

pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
  s.serialize_str(&format(at))
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
  DateTime::<Utc>::deserialize(d)
}

/// The same format for `Option<DateTime<Utc>>` fields.
pub mod option {
  use chrono::{DateTime, Utc};
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(at: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
    match at {
      Some(at) => super::serialize(at, s),
      None => s.serialize_none(),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Option::<DateTime<Utc>>::deserialize(d)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  #[test]
  fn offsets_and_fractions_normalise_to_one_sortable_form() {
    let mut rows: Vec<Row> = [
      json!({ "submitted_at": "2025-04-14T12:00:00+02:00" }),
      json!({ "submitted_at": "2025-04-14T10:00:00.5Z" }),
      json!({ "submitted_at": "2025-04-14T10:00:00Z" }),
    ]
    .into_iter()
    .filter_map(|v| match v {
      Value::Object(row) => Some(row),
      _ => None,
    })
    .collect();
    rows.iter_mut().for_each(normalize);

    let stored: Vec<&str> = rows.iter().map(|r| r["submitted_at"].as_str().unwrap()).collect();
    assert_eq!(stored, [
      "2025-04-14T10:00:00.000000Z",
      "2025-04-14T10:00:00.500000Z",
      "2025-04-14T10:00:00.000000Z",
    ]);
    assert!(stored[2] < stored[1]);
  }

  #[test]
  fn unparseable_values_are_left_alone() {
    let mut row = match json!({ "due_date": "soon", "created_at": 5, "date": "2025-03-01" }) {
      Value::Object(row) => row,
      _ => unreachable!(),
    };
    normalize(&mut row);
    assert_eq!(row["due_date"], "soon");
    assert_eq!(row["created_at"], 5);
    assert_eq!(row["date"], "2025-03-01");
  }

  #[test]
  fn format_is_fixed_width() {
    let whole = Utc.with_ymd_and_hms(2025, 4, 14, 10, 30, 0).unwrap();
    assert_eq!(format(&whole), "2025-04-14T10:30:00.000000Z");
  }
}
