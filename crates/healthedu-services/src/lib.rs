//! Application workflows for the health-education platform.
//!
//! Every function takes any [`TableStore`](healthedu_core::store::TableStore)
//! and drives it through the fluent client, so the same workflow runs
//! against the in-memory store in tests and in the CLI.
//!
//! | Module | Workflows |
//! |--------|-----------|
//! | [`health`] | save today's log, weekly report and trend |
//! | [`family`] | link a child by email, list linked children |
//! | [`learning`] | per-topic content preference, topic lessons, recommendations |
//! | [`progress`] | lesson and assignment summary |
//! | [`assignments`] | recent results, recording a quiz score, teacher listing |

pub mod assignments;
pub mod error;
pub mod family;
pub mod health;
pub mod learning;
pub mod progress;

pub use error::{Error, Result};
