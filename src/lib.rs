//! # TCG Meta
//!
//! Metagame statistics for a trading card game tournament, computed from
//! the event's JSON exports and served as a JSON API.
//!
//! ## Architecture
//!
//! - **models**: Export records and derived statistic rows
//! - **calculate**: Records, matchups, card stats and day-2 conversion
//! - **config**: Configuration loading and validation
//! - **storage**: Reading and fingerprinting the export files
//! - **api**: REST API endpoints

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
