//! `healthedu log-health`: save a day's health log and show the week.

use std::io::Write;

use chrono::{Local, NaiveDate};
use clap::Args;
use healthedu_core::{
  record::{HealthLogPatch, Mood},
  store::TableStore,
};
use healthedu_services::health;
use serde_json::{Value, json};

#[derive(Args, Debug)]
pub struct LogHealthArgs {
  /// Glasses of water.
  #[arg(long)]
  pub water: u32,

  /// Hours of sleep.
  #[arg(long)]
  pub sleep: f64,

  /// Minutes of exercise.
  #[arg(long, default_value_t = 0)]
  pub exercise: u32,

  /// happy, neutral or sad.
  #[arg(long, default_value = "neutral", value_parser = parse_mood)]
  pub mood: Mood,

  /// Day to log (YYYY-MM-DD). Defaults to today.
  #[arg(long)]
  pub date: Option<NaiveDate>,
}

fn parse_mood(raw: &str) -> Result<Mood, String> {
  serde_json::from_value(Value::String(raw.trim().to_ascii_lowercase()))
    .map_err(|_| format!("unknown mood {raw:?}, expected happy, neutral or sad"))
}

pub fn run<S, W>(store: &S, student_id: &str, args: &LogHealthArgs, out: &mut W) -> anyhow::Result<()>
where
  S: TableStore + ?Sized,
  W: Write,
{
  let today = args.date.unwrap_or_else(|| Local::now().date_naive());
  let entry = HealthLogPatch {
    water_intake:     args.water,
    sleep_hours:      args.sleep,
    exercise_minutes: args.exercise,
    mood:             args.mood,
  };

  let saved = health::save_today(store, student_id, today, &entry)?;
  let week = health::weekly(store, student_id, today)?;

  serde_json::to_writer_pretty(&mut *out, &json!({ "saved": saved, "week": week }))?;
  writeln!(out)?;
  Ok(())
}
