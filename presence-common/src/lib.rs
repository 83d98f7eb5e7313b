//! # Presence Analyzer Common Library
//!
//! Core of the presence analyzer:
//! - Time-of-day arithmetic and clocks
//! - Descriptive statistics (mean)
//! - Attendance CSV parsing
//! - User directory XML parsing
//! - Weekday aggregation
//! - TTL memoization cache
//! - Configuration loading

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod records;
pub mod stats;
pub mod time;
pub mod weekday;

pub use analyzer::PresenceAnalyzer;
pub use error::{Error, Result};
pub use stats::Mean;
