#![forbid(unsafe_code)]

//! Core domain model and entry store for the get-fit exercise log.
//!
//! This crate provides:
//! - Domain types (log entries, exercise categories and subcategories)
//! - The category table
//! - The in-memory entry store and its thread-safe handle
//! - The query engine (filter, sort, reverse)
//! - Text records for front ends
//! - Persistence (JSON document, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod manager;
pub mod query;
pub mod record;
pub mod codec;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use manager::{EntryManager, SharedEntryManager};
pub use query::{run_query, DateRange, QuerySpec, SortKey};
pub use record::{EntryRecord, QueryParams};
pub use export::export_csv;
