//! In-memory backend for the health-education data layer.
//!
//! Tables live in a process-local map guarded by a lock. The store is an
//! explicit value: construct one, hand it to whatever needs data, and
//! [`MemoryStore::reset`] it between tests.

mod seed;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use seed::DEMO_SEED;
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
