//! `healthedu`: query the in-memory store, take quizzes and log health data
//! from the terminal.
//!
//! Every invocation starts from a freshly seeded store (see `seed` in the
//! settings), so writes last for the duration of one command.
//!
//! # Usage
//!
//! ```text
//! healthedu query health_logs student_id=1 --order date --desc --limit 7
//! healthedu quiz nutrition-basics --assignment 1
//! healthedu log-health --water 6 --sleep 7.5 --exercise 30 --mood happy
//! healthedu --user 3 link-child student2@example.com
//! healthedu progress --topic nutrition
//! ```

mod health;
mod progress;
mod query;
mod quiz;
mod settings;

use std::{
  io::{self, Write},
  path::PathBuf,
};

use clap::{Parser, Subcommand};
use healthedu_services::family;
use serde_json::json;
use settings::{AppConfig, SeedSource};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "healthedu", version, about = "Health-education data and quiz tools")]
struct Cli {
  /// Path to the TOML settings file.
  #[arg(short, long, default_value = "healthedu.toml")]
  config: PathBuf,

  /// Seed for the store: `demo`, `empty`, or a JSON file.
  #[arg(long)]
  seed: Option<SeedSource>,

  /// Acting user id.
  #[arg(long)]
  user: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Read rows from a table and print them as JSON.
  Query(query::QueryArgs),
  /// Take a quiz interactively.
  Quiz(quiz::QuizArgs),
  /// Save a day's health log and print the weekly report.
  LogHealth(health::LogHealthArgs),
  /// Print the acting student's progress summary.
  Progress(progress::ProgressArgs),
  /// Link a student, by email, to the acting parent.
  LinkChild {
    email: String,
  },
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  let mut settings = AppConfig::load(&cli.config)?;
  if let Some(seed) = cli.seed {
    settings.seed = seed;
  }
  if let Some(user) = cli.user {
    settings.user_id = user;
  }

  let store = settings.open_store()?;
  let mut out = io::stdout().lock();

  match cli.command {
    Command::Query(args) => query::run(&store, &args, &mut out),
    Command::Quiz(args) => {
      let catalog = settings.catalog()?;
      quiz::run(
        &store,
        &catalog,
        &settings.user_id,
        &args,
        io::stdin().lock(),
        &mut out,
      )
      .map(|_| ())
    }
    Command::LogHealth(args) => health::run(&store, &settings.user_id, &args, &mut out),
    Command::Progress(args) => progress::run(&store, &settings.user_id, &args, &mut out),
    Command::LinkChild { email } => {
      let link = family::link_child(&store, &settings.user_id, &email)?;
      let children = family::children(&store, &settings.user_id)?;
      serde_json::to_writer_pretty(&mut out, &json!({ "link": link, "children": children }))?;
      writeln!(out)?;
      Ok(())
    }
  }
}
