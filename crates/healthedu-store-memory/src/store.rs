//! [`MemoryStore`]: the in-memory implementation of [`TableStore`].

use std::{
  collections::HashMap,
  path::Path,
  sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use healthedu_core::{
  query::{Filter, QueryDescriptor, merge_row, same_key},
  record::Row,
  store::TableStore,
  timestamp,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{Result, seed};

type Tables = HashMap<String, Vec<Row>>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A set of named tables held in memory.
///
/// Cloning is cheap and clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  /// An empty store.
  pub fn new() -> Self { Self::default() }

  /// A store holding the built-in demo accounts and records.
  pub fn with_demo_data() -> Result<Self> {
    let store = Self::new();
    store.seed_json(seed::DEMO_SEED)?;
    Ok(store)
  }

  /// A store seeded from a JSON file shaped `{ "<table>": [ {..}, .. ] }`.
  pub fn open_seed(path: impl AsRef<Path>) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    let store = Self::new();
    store.seed_json(&raw)?;
    Ok(store)
  }

  /// Append every table in `raw` to this store. Validation happens before any
  /// table is touched.
  pub fn seed_json(&self, raw: &str) -> Result<()> {
    let parsed = seed::parse(raw)?;
    let mut tables = self.write();
    for (name, mut rows) in parsed {
      rows.iter_mut().for_each(stage);
      tracing::info!(table = %name, rows = rows.len(), "seeded table");
      tables.entry(name).or_default().extend(rows);
    }
    Ok(())
  }

  /// Drop every table.
  pub fn reset(&self) {
    self.write().clear();
    tracing::info!("store reset");
  }

  /// A copy of the raw rows in `table`, in insertion order.
  pub fn snapshot(&self, table: &str) -> Vec<Row> {
    self.read().get(table).cloned().unwrap_or_default()
  }

  /// Names of every table that has been written to, sorted.
  pub fn table_names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.read().keys().cloned().collect();
    names.sort();
    names
  }

  // Rows are staged before the lock is taken, so a poisoned lock never holds
  // a half-applied write and can be recovered.
  fn read(&self) -> RwLockReadGuard<'_, Tables> {
    self.tables.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Tables> {
    self.tables.write().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Prepare `row` for storage: canonical timestamps and an id.
fn stage(row: &mut Row) {
  timestamp::normalize(row);
  assign_id(row);
}

/// Give `row` a fresh UUID unless it already carries a non-empty `id`.
fn assign_id(row: &mut Row) {
  let missing = match row.get("id") {
    None | Some(Value::Null) => true,
    Some(Value::String(s)) => s.is_empty(),
    Some(_) => false,
  };
  if missing {
    row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
  }
}

// ─── TableStore impl ─────────────────────────────────────────────────────────

impl TableStore for MemoryStore {
  type Error = crate::Error;

  fn select_rows(&self, table: &str, query: &QueryDescriptor) -> Result<Vec<Row>> {
    let tables = self.read();
    Ok(match tables.get(table) {
      Some(rows) => query.apply(rows),
      None => Vec::new(),
    })
  }

  fn insert_rows(&self, table: &str, mut rows: Vec<Row>) -> Result<Vec<Row>> {
    rows.iter_mut().for_each(stage);
    self
      .write()
      .entry(table.to_owned())
      .or_default()
      .extend(rows.iter().cloned());
    Ok(rows)
  }

  fn update_rows(&self, table: &str, filter: &Filter, patch: &Row) -> Result<Vec<Row>> {
    let mut patch = patch.clone();
    timestamp::normalize(&mut patch);
    let mut tables = self.write();
    let Some(rows) = tables.get_mut(table) else {
      return Ok(Vec::new());
    };

    let mut updated = Vec::new();
    for row in rows.iter_mut().filter(|r| filter.matches(r)) {
      merge_row(row, &patch);
      updated.push(row.clone());
    }
    Ok(updated)
  }

  fn upsert_row(&self, table: &str, conflict_keys: &[String], mut row: Row) -> Result<Row> {
    timestamp::normalize(&mut row);
    let mut tables = self.write();
    let rows = tables.entry(table.to_owned()).or_default();

    if let Some(existing) = rows.iter_mut().find(|r| same_key(r, &row, conflict_keys)) {
      merge_row(existing, &row);
      return Ok(existing.clone());
    }

    assign_id(&mut row);
    rows.push(row.clone());
    Ok(row)
  }
}
