//! `healthedu progress`: a student's progress summary and recent results.

use std::io::Write;

use clap::Args;
use healthedu_core::store::TableStore;
use healthedu_services::{assignments, progress};
use serde_json::json;

#[derive(Args, Debug)]
pub struct ProgressArgs {
  /// Only count lessons in this topic.
  #[arg(long)]
  pub topic: Option<String>,

  /// How many recent assignments to list.
  #[arg(long, default_value_t = 3)]
  pub recent: usize,
}

pub fn run<S, W>(store: &S, student_id: &str, args: &ProgressArgs, out: &mut W) -> anyhow::Result<()>
where
  S: TableStore + ?Sized,
  W: Write,
{
  let summary = progress::summary(store, student_id, args.topic.as_deref())?;
  let recent = assignments::recent(store, student_id, args.recent)?;

  serde_json::to_writer_pretty(
    &mut *out,
    &json!({
      "summary": summary,
      "lesson_percent": summary.lesson_percent(),
      "recent": recent,
    }),
  )?;
  writeln!(out)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use healthedu_store_memory::MemoryStore;
  use serde_json::Value;

  use super::*;

  #[test]
  fn demo_student_summary() {
    let store = MemoryStore::with_demo_data().unwrap();
    let mut out = Vec::new();
    run(&store, "1", &ProgressArgs { topic: None, recent: 1 }, &mut out).unwrap();

    let value: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["summary"]["average_score"], 85);
    assert_eq!(value["summary"]["completed_lessons"], 1);
    assert_eq!(value["lesson_percent"], 50);
    assert_eq!(value["recent"].as_array().unwrap().len(), 1);
    assert_eq!(value["recent"][0]["assignment_id"], "1");
  }
}
