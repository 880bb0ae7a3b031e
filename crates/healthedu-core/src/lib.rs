//! Core types and trait definitions for the health-education data layer.
//!
//! This crate holds the typed table records, the immutable query descriptor
//! and its evaluation, the [`store::TableStore`] backend trait, and the fluent
//! client built on top of it. It has no storage of its own.

pub mod client;
pub mod error;
pub mod query;
pub mod record;
pub mod store;
pub mod timestamp;

pub use client::StoreExt;
pub use error::{Error, NOT_FOUND_CODE, Result};
