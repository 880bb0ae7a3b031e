//! The `TableStore` trait: the row-level contract a backend implements.
//!
//! The trait is implemented by storage backends (e.g.
//! `healthedu-store-memory`). Callers normally go through the fluent client
//! in [`crate::client`] rather than calling these methods directly.

use crate::{
  query::{Filter, QueryDescriptor},
  record::Row,
};

/// Abstraction over a named-table backend.
///
/// Tables are created on first write; reading an unknown table yields no
/// rows. Each method is one logical operation and must be atomic with respect
/// to the table it touches.
pub trait TableStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Materialise `query` against `table`.
  fn select_rows(
    &self,
    table: &str,
    query: &QueryDescriptor,
  ) -> Result<Vec<Row>, Self::Error>;

  /// Append `rows` in order, all or nothing. Returns the stored rows,
  /// including any identity assigned by the store.
  fn insert_rows(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, Self::Error>;

  /// Shallow-merge `patch` into every row matching `filter`. Returns the rows
  /// after the merge.
  fn update_rows(
    &self,
    table: &str,
    filter: &Filter,
    patch: &Row,
  ) -> Result<Vec<Row>, Self::Error>;

  /// Merge `row` into the first row agreeing with it on every field in
  /// `conflict_keys`, or append it if there is none. `conflict_keys` is never
  /// empty.
  fn upsert_row(
    &self,
    table: &str,
    conflict_keys: &[String],
    row: Row,
  ) -> Result<Row, Self::Error>;
}
