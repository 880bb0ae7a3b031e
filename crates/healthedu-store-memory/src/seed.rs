//! Seed documents: `{ "<table>": [ {record}, ... ], ... }`.

use healthedu_core::record::Row;
use serde_json::Value;

use crate::{Error, Result};

/// The built-in demo data set: four accounts (student `1`, teacher `2`,
/// parent `3` linked to student `1`, unlinked student `4`), lessons,
/// assignments, progress and two days of health logs.
pub const DEMO_SEED: &str = include_str!("../data/demo.json");

/// Parse and validate a seed document, preserving row order per table.
pub fn parse(raw: &str) -> Result<Vec<(String, Vec<Row>)>> {
  let Value::Object(doc) = serde_json::from_str::<Value>(raw)? else {
    return Err(Error::InvalidSeed("top level must be an object".into()));
  };

  doc
    .into_iter()
    .map(|(table, rows)| {
      let Value::Array(rows) = rows else {
        return Err(Error::InvalidSeed(format!("table {table:?} is not an array")));
      };
      let rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| match row {
          Value::Object(row) => Ok(row),
          _ => Err(Error::InvalidSeed(format!("{table}[{i}] is not an object"))),
        })
        .collect::<Result<Vec<_>>>()?;
      Ok((table, rows))
    })
    .collect()
}
