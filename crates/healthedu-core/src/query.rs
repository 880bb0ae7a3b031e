//! The immutable query descriptor and its evaluation over in-memory rows.
//!
//! Every builder method takes `&self` and returns a new descriptor, so a
//! partially built query can be shared and branched without one branch
//! observing the other's filters.

use std::cmp::Ordering;

use serde_json::Value;

use crate::record::Row;

// ─── Filters ─────────────────────────────────────────────────────────────────

/// How a [`Filter`] compares a row's field against its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
  Eq,
  Gte,
  Lte,
  /// Field is present and not null; the operand is ignored.
  NotNull,
}

/// A single predicate over one field. Filters in a query are conjunctive.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
  pub field:      String,
  pub comparison: Comparison,
  pub value:      Value,
}

impl Filter {
  pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Self { field: field.into(), comparison: Comparison::Eq, value: value.into() }
  }

  pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Self { field: field.into(), comparison: Comparison::Gte, value: value.into() }
  }

  pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Self { field: field.into(), comparison: Comparison::Lte, value: value.into() }
  }

  pub fn not_null(field: impl Into<String>) -> Self {
    Self { field: field.into(), comparison: Comparison::NotNull, value: Value::Null }
  }

  /// Whether `row` satisfies this predicate. A missing field reads as null;
  /// null never satisfies a range comparison.
  pub fn matches(&self, row: &Row) -> bool {
    let actual = field_value(row, &self.field);
    match self.comparison {
      Comparison::Eq => values_equal(actual, &self.value),
      Comparison::Gte => {
        !actual.is_null() && compare_values(actual, &self.value) != Ordering::Less
      }
      Comparison::Lte => {
        !actual.is_null()
          && compare_values(actual, &self.value) != Ordering::Greater
      }
      Comparison::NotNull => !actual.is_null(),
    }
  }
}

// ─── Ordering ────────────────────────────────────────────────────────────────

/// A single sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
  pub field:     String,
  pub ascending: bool,
}

// ─── Descriptor ──────────────────────────────────────────────────────────────

/// Everything needed to evaluate a read against one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescriptor {
  /// Requested projection. Accepted for interface fidelity; whole rows are
  /// always returned.
  pub columns: Option<String>,
  pub filters: Vec<Filter>,
  /// Only one sort key; a later `order` replaces an earlier one.
  pub order:   Option<Order>,
  pub offset:  Option<usize>,
  pub limit:   Option<usize>,
}

impl QueryDescriptor {
  pub fn new() -> Self { Self::default() }

  pub fn columns(&self, columns: impl Into<String>) -> Self {
    Self { columns: Some(columns.into()), ..self.clone() }
  }

  pub fn filter(&self, filter: Filter) -> Self {
    let mut next = self.clone();
    next.filters.push(filter);
    next
  }

  pub fn eq(&self, field: impl Into<String>, value: impl Into<Value>) -> Self {
    self.filter(Filter::eq(field, value))
  }

  pub fn gte(&self, field: impl Into<String>, value: impl Into<Value>) -> Self {
    self.filter(Filter::gte(field, value))
  }

  pub fn lte(&self, field: impl Into<String>, value: impl Into<Value>) -> Self {
    self.filter(Filter::lte(field, value))
  }

  pub fn not_null(&self, field: impl Into<String>) -> Self {
    self.filter(Filter::not_null(field))
  }

  pub fn order(&self, field: impl Into<String>, ascending: bool) -> Self {
    Self {
      order: Some(Order { field: field.into(), ascending }),
      ..self.clone()
    }
  }

  pub fn offset(&self, offset: usize) -> Self {
    Self { offset: Some(offset), ..self.clone() }
  }

  pub fn limit(&self, limit: usize) -> Self {
    Self { limit: Some(limit), ..self.clone() }
  }

  /// Whether `row` passes every filter.
  pub fn matches(&self, row: &Row) -> bool {
    self.filters.iter().all(|f| f.matches(row))
  }

  /// Filter, sort (stable), skip and cap `rows`, returning owned copies.
  pub fn apply<'r, I>(&self, rows: I) -> Vec<Row>
  where
    I: IntoIterator<Item = &'r Row>,
  {
    let mut matched: Vec<Row> =
      rows.into_iter().filter(|r| self.matches(r)).cloned().collect();

    if let Some(order) = &self.order {
      // `sort_by` is stable, so equal keys keep table order.
      matched.sort_by(|a, b| {
        let ordering = compare_values(
          field_value(a, &order.field),
          field_value(b, &order.field),
        );
        if order.ascending { ordering } else { ordering.reverse() }
      });
    }

    let offset = self.offset.unwrap_or(0);
    let limit = self.limit.unwrap_or(usize::MAX);
    matched.into_iter().skip(offset).take(limit).collect()
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

static NULL: Value = Value::Null;

fn field_value<'r>(row: &'r Row, field: &str) -> &'r Value { row.get(field).unwrap_or(&NULL) }

/// Shallow merge: every top-level key of `patch` overwrites the same key of
/// `target`.
pub fn merge_row(target: &mut Row, patch: &Row) {
  for (key, value) in patch {
    target.insert(key.clone(), value.clone());
  }
}

/// Split an `on_conflict` target such as `"student_id, topic_id"` into field
/// names.
pub fn parse_conflict_target(on_conflict: &str) -> Vec<String> {
  on_conflict
    .split(',')
    .map(str::trim)
    .filter(|f| !f.is_empty())
    .map(str::to_owned)
    .collect()
}

/// Whether `existing` and `incoming` agree on every key field. A key that is
/// missing or null on `incoming` never conflicts.
pub fn same_key(existing: &Row, incoming: &Row, keys: &[String]) -> bool {
  keys.iter().all(|k| {
    let key = field_value(incoming, k);
    !key.is_null() && values_equal(field_value(existing, k), key)
  })
}

// ─── Value semantics ─────────────────────────────────────────────────────────

/// Equality with numbers compared by value, so `1` equals `1.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
  match (a, b) {
    (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
    _ => a == b,
  }
}

fn rank(v: &Value) -> u8 {
  match v {
    Value::Null => 0,
    Value::Bool(_) => 1,
    Value::Number(_) => 2,
    Value::String(_) => 3,
    Value::Array(_) => 4,
    Value::Object(_) => 5,
  }
}

/// Total order over JSON values: null < bool < number < string < array <
/// object. Arrays and objects are not compared element-wise.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
  match (a, b) {
    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
    (Value::Number(x), Value::Number(y)) => {
      let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
      x.partial_cmp(&y).unwrap_or(Ordering::Equal)
    }
    (Value::String(x), Value::String(y)) => x.cmp(y),
    _ => rank(a).cmp(&rank(b)),
  }
}
