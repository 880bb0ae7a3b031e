//! The fluent query client over any [`TableStore`].
//!
//! ```rust,ignore
//! let logs: Vec<HealthLog> = store
//!   .from::<HealthLog>()
//!   .select("*")
//!   .eq("student_id", "1")
//!   .order("date", false)
//!   .limit(7)
//!   .execute()?;
//! ```
//!
//! Every chain step consumes the builder and returns a new one holding a new
//! [`QueryDescriptor`]; nothing runs until a terminal call (`execute`,
//! `single`, `maybe_single`, `insert`, `upsert`, or `update(..).eq(..)`).

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
  Error, Result,
  query::{Filter, QueryDescriptor, parse_conflict_target},
  record::{Record, Row, from_row, to_row},
  store::TableStore,
};

fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Fluent entry points, available on every [`TableStore`].
pub trait StoreExt: TableStore {
  /// The table backing record type `T`.
  fn from<T: Record>(&self) -> TableHandle<'_, Self, T> {
    TableHandle::new(self, T::TABLE)
  }

  /// Any table by name, materialised as `T` (use [`Row`] for raw access).
  fn table<T>(&self, name: &str) -> TableHandle<'_, Self, T>
  where
    T: Serialize + DeserializeOwned,
  {
    TableHandle::new(self, name)
  }
}

impl<S: TableStore + ?Sized> StoreExt for S {}

// ─── Table handle ────────────────────────────────────────────────────────────

/// A resolved table name. Never fails to resolve; unknown tables are empty.
pub struct TableHandle<'s, S: ?Sized, T> {
  store:   &'s S,
  table:   String,
  _record: PhantomData<fn() -> T>,
}

impl<'s, S, T> TableHandle<'s, S, T>
where
  S: TableStore + ?Sized,
  T: Serialize + DeserializeOwned,
{
  fn new(store: &'s S, table: &str) -> Self {
    Self { store, table: table.to_owned(), _record: PhantomData }
  }

  pub fn name(&self) -> &str { &self.table }

  /// Begin a read. `columns` is recorded but whole records are returned.
  pub fn select(self, columns: &str) -> Select<'s, S, T> {
    Select {
      store:   self.store,
      table:   self.table,
      query:   QueryDescriptor::new().columns(columns),
      _record: PhantomData,
    }
  }

  /// Append one record; returns it as stored.
  pub fn insert(self, record: &T) -> Result<T> {
    let mut stored = self.insert_many(std::slice::from_ref(record))?;
    stored.pop().ok_or_else(|| Error::NotFound { table: self.table })
  }

  /// Append `records` in order, all or nothing. Ids are not checked for
  /// uniqueness.
  pub fn insert_many(&self, records: &[T]) -> Result<Vec<T>> {
    let rows = records
      .iter()
      .map(|r| to_row(&self.table, r))
      .collect::<Result<Vec<_>>>()?;
    let count = rows.len();
    let stored = self
      .store
      .insert_rows(&self.table, rows)
      .map_err(store_err)?;
    tracing::debug!(table = %self.table, count, "insert");
    stored.into_iter().map(from_row).collect()
  }

  /// Begin an update with a partial record. The returned builder accepts
  /// exactly one `eq` filter, which executes it.
  pub fn update<P: Serialize + ?Sized>(self, patch: &P) -> Update<'s, S, T> {
    Update {
      patch:   to_row(&self.table, patch),
      store:   self.store,
      table:   self.table,
      _record: PhantomData,
    }
  }

  /// Merge `payload` into the row matching it on every `on_conflict` field
  /// (comma-separated, e.g. `"student_id, topic_id"`), or append it.
  pub fn upsert<P: Serialize + ?Sized>(self, payload: &P, on_conflict: &str) -> Result<T> {
    let keys = parse_conflict_target(on_conflict);
    if keys.is_empty() {
      return Err(Error::EmptyConflictTarget);
    }
    let row = to_row(&self.table, payload)?;
    let stored = self
      .store
      .upsert_row(&self.table, &keys, row)
      .map_err(store_err)?;
    tracing::debug!(table = %self.table, on_conflict, "upsert");
    from_row(stored)
  }
}

// ─── Select ──────────────────────────────────────────────────────────────────

/// A pending read against one table.
pub struct Select<'s, S: ?Sized, T> {
  store:   &'s S,
  table:   String,
  query:   QueryDescriptor,
  _record: PhantomData<fn() -> T>,
}

impl<S: ?Sized, T> Clone for Select<'_, S, T> {
  fn clone(&self) -> Self {
    Self {
      store:   self.store,
      table:   self.table.clone(),
      query:   self.query.clone(),
      _record: PhantomData,
    }
  }
}

impl<'s, S, T> Select<'s, S, T>
where
  S: TableStore + ?Sized,
  T: DeserializeOwned,
{
  fn with(self, query: QueryDescriptor) -> Self { Self { query, ..self } }

  /// The descriptor built so far.
  pub fn descriptor(&self) -> &QueryDescriptor { &self.query }

  pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
    let query = self.query.eq(field, value);
    self.with(query)
  }

  pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
    let query = self.query.gte(field, value);
    self.with(query)
  }

  pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
    let query = self.query.lte(field, value);
    self.with(query)
  }

  pub fn not_null(self, field: &str) -> Self {
    let query = self.query.not_null(field);
    self.with(query)
  }

  /// Sort by a single field; replaces any earlier `order`.
  pub fn order(self, field: &str, ascending: bool) -> Self {
    let query = self.query.order(field, ascending);
    self.with(query)
  }

  pub fn offset(self, n: usize) -> Self {
    let query = self.query.offset(n);
    self.with(query)
  }

  pub fn limit(self, n: usize) -> Self {
    let query = self.query.limit(n);
    self.with(query)
  }

  /// Materialise every matching record.
  pub fn execute(self) -> Result<Vec<T>> {
    let rows = self
      .store
      .select_rows(&self.table, &self.query)
      .map_err(store_err)?;
    tracing::debug!(table = %self.table, matched = rows.len(), "select");
    rows.into_iter().map(from_row).collect()
  }

  /// The first matching record, or `None`.
  pub fn maybe_single(self) -> Result<Option<T>> {
    let rows = self
      .store
      .select_rows(&self.table, &self.query)
      .map_err(store_err)?;
    tracing::debug!(table = %self.table, matched = rows.len(), "select single");
    rows.into_iter().next().map(from_row).transpose()
  }

  /// Exactly the first matching record. Further matches are dropped; no match
  /// is [`Error::NotFound`].
  pub fn single(self) -> Result<T> {
    let table = self.table.clone();
    self.maybe_single()?.ok_or(Error::NotFound { table })
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// A pending update waiting for its single filter.
pub struct Update<'s, S: ?Sized, T> {
  store:   &'s S,
  table:   String,
  patch:   Result<Row>,
  _record: PhantomData<fn() -> T>,
}

impl<S, T> Update<'_, S, T>
where
  S: TableStore + ?Sized,
  T: DeserializeOwned,
{
  /// Apply the patch to every row where `field == value`; returns the
  /// updated records.
  pub fn eq(self, field: &str, value: impl Into<Value>) -> Result<Vec<T>> {
    let patch = self.patch?;
    let rows = self
      .store
      .update_rows(&self.table, &Filter::eq(field, value), &patch)
      .map_err(store_err)?;
    tracing::debug!(table = %self.table, field, updated = rows.len(), "update");
    rows.into_iter().map(from_row).collect()
  }
}
