//! Layered settings: an optional TOML file under `HEALTHEDU_*` environment
//! variables.

use std::{
  fmt,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use healthedu_quiz::Catalog;
use healthedu_store_memory::MemoryStore;
use serde::Deserialize;

/// Where the store's initial tables come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SeedSource {
  /// The built-in demo accounts and records.
  #[default]
  Demo,
  /// No tables at all.
  Empty,
  /// A JSON file shaped `{ "<table>": [ {..}, .. ] }`.
  File(PathBuf),
}

impl From<String> for SeedSource {
  fn from(raw: String) -> Self {
    match raw.trim() {
      "demo" => SeedSource::Demo,
      "empty" => SeedSource::Empty,
      path => SeedSource::File(PathBuf::from(path)),
    }
  }
}

impl fmt::Display for SeedSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SeedSource::Demo => f.write_str("demo"),
      SeedSource::Empty => f.write_str("empty"),
      SeedSource::File(path) => write!(f, "{}", path.display()),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub seed:         SeedSource,
  /// JSON quiz catalog replacing the built-in quizzes.
  pub quiz_catalog: Option<PathBuf>,
  /// Acting user for user-scoped commands.
  pub user_id:      String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      seed:         SeedSource::Demo,
      quiz_catalog: None,
      user_id:      "1".to_string(),
    }
  }
}

impl AppConfig {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("HEALTHEDU"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")
  }

  pub fn open_store(&self) -> anyhow::Result<MemoryStore> {
    tracing::debug!(seed = %self.seed, "opening store");
    let store = match &self.seed {
      SeedSource::Demo => MemoryStore::with_demo_data()?,
      SeedSource::Empty => MemoryStore::new(),
      SeedSource::File(path) => MemoryStore::open_seed(path)
        .with_context(|| format!("failed to seed store from {}", path.display()))?,
    };
    Ok(store)
  }

  pub fn catalog(&self) -> anyhow::Result<Catalog> {
    match &self.quiz_catalog {
      Some(path) => Catalog::load(path)
        .with_context(|| format!("failed to load quiz catalog {}", path.display())),
      None => Ok(Catalog::builtin()?),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("healthedu-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn seed_source_parses_keywords_and_paths() {
    assert_eq!(SeedSource::from("demo".to_string()), SeedSource::Demo);
    assert_eq!(SeedSource::from(" empty ".to_string()), SeedSource::Empty);
    assert_eq!(
      SeedSource::from("fixtures/seed.json".to_string()),
      SeedSource::File(PathBuf::from("fixtures/seed.json"))
    );
  }

  #[test]
  fn missing_file_gives_defaults() {
    let cfg = AppConfig::load(Path::new("/nonexistent/healthedu.toml")).unwrap();
    assert_eq!(cfg.seed, SeedSource::Demo);
    assert_eq!(cfg.user_id, "1");
    assert!(cfg.quiz_catalog.is_none());
  }

  #[test]
  fn file_values_are_read() {
    let path = temp_file("config.toml", "seed = \"empty\"\nuser_id = \"4\"\n");
    let cfg = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.seed, SeedSource::Empty);
    assert_eq!(cfg.user_id, "4");
    assert!(cfg.open_store().unwrap().table_names().is_empty());
  }

  #[test]
  fn seed_file_is_loaded() {
    let path = temp_file("seed.json", r#"{ "profiles": [ { "id": "9", "name": "X", "role": "student" } ] }"#);
    let cfg = AppConfig { seed: SeedSource::File(path.clone()), ..AppConfig::default() };
    let store = cfg.open_store().unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(store.snapshot("profiles").len(), 1);
  }

  #[test]
  fn builtin_catalog_is_the_default() {
    let catalog = AppConfig::default().catalog().unwrap();
    assert_eq!(catalog.quizzes().len(), 3);
  }
}
