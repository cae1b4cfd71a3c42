#![forbid(unsafe_code)]

//! Core domain model and business logic for the Kept tracker.
//!
//! This crate provides:
//! - Domain types (habits, periods, symptoms, cycle settings)
//! - Habit completion engine (streaks, completion rates)
//! - Cycle prediction engine
//! - Persistence (key-value store, CSV export)
//! - The tracker that ties them together behind an injectable clock

pub mod types;
pub mod error;
pub mod clock;
pub mod config;
pub mod logging;
pub mod habit;
pub mod cycle;
pub mod store;
pub mod events;
pub mod tracker;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use events::{LoggingObserver, Observer, TrackerEvent};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::Tracker;
pub use export::{export_csv, ExportSummary};
