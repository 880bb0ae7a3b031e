//! `healthedu query`: run an ad-hoc read against any table.

use std::io::Write;

use anyhow::{Context as _, bail};
use clap::Args;
use healthedu_core::{StoreExt, record::Row, store::TableStore};
use serde_json::Value;

#[derive(Args, Debug)]
pub struct QueryArgs {
  /// Table to read.
  pub table: String,

  /// Equality filters. `field=value` compares as a string, `field:=json`
  /// as a typed JSON value (`score:=85`, `completed:=true`).
  #[arg(value_name = "FILTER")]
  pub filters: Vec<String>,

  /// Column list, recorded but not projected.
  #[arg(long, default_value = "*")]
  pub select: String,

  /// `field>=value` filter, same syntax as FILTER.
  #[arg(long, value_name = "FILTER")]
  pub gte: Vec<String>,

  /// `field<=value` filter, same syntax as FILTER.
  #[arg(long, value_name = "FILTER")]
  pub lte: Vec<String>,

  /// Keep rows where this field is present and not null.
  #[arg(long, value_name = "FIELD")]
  pub not_null: Vec<String>,

  /// Sort by this field.
  #[arg(long)]
  pub order: Option<String>,

  /// Sort descending.
  #[arg(long, requires = "order")]
  pub desc: bool,

  #[arg(long)]
  pub offset: Option<usize>,

  #[arg(long)]
  pub limit: Option<usize>,

  /// Print only the first match; no match is an error.
  #[arg(long)]
  pub single: bool,
}

/// Split a `field=value` or `field:=json` filter.
pub fn parse_filter(raw: &str) -> anyhow::Result<(String, Value)> {
  let Some(eq) = raw.find('=') else {
    bail!("filter {raw:?} must be field=value or field:=json");
  };
  let (lhs, value) = (&raw[..eq], &raw[eq + 1..]);
  let (field, value) = match lhs.strip_suffix(':') {
    Some(field) => (
      field,
      serde_json::from_str(value).with_context(|| format!("invalid JSON in filter {raw:?}"))?,
    ),
    None => (lhs, Value::String(value.to_owned())),
  };
  let field = field.trim();
  if field.is_empty() {
    bail!("filter {raw:?} has no field name");
  }
  Ok((field.to_owned(), value))
}

pub fn run<S, W>(store: &S, args: &QueryArgs, out: &mut W) -> anyhow::Result<()>
where
  S: TableStore + ?Sized,
  W: Write,
{
  let mut select = store.table::<Row>(&args.table).select(&args.select);
  for raw in &args.filters {
    let (field, value) = parse_filter(raw)?;
    select = select.eq(&field, value);
  }
  for raw in &args.gte {
    let (field, value) = parse_filter(raw)?;
    select = select.gte(&field, value);
  }
  for raw in &args.lte {
    let (field, value) = parse_filter(raw)?;
    select = select.lte(&field, value);
  }
  for field in &args.not_null {
    select = select.not_null(field);
  }
  if let Some(field) = &args.order {
    select = select.order(field, !args.desc);
  }
  if let Some(n) = args.offset {
    select = select.offset(n);
  }
  if let Some(n) = args.limit {
    select = select.limit(n);
  }

  let value = if args.single {
    Value::Object(select.single()?)
  } else {
    Value::Array(select.execute()?.into_iter().map(Value::Object).collect())
  };
  serde_json::to_writer_pretty(&mut *out, &value)?;
  writeln!(out)?;
  Ok(())
}
