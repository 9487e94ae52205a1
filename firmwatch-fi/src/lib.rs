//! firmwatch-fi library interface
//!
//! Exposes the pipeline components for integration testing.

pub mod config;
pub mod db;
pub mod error_log;
pub mod models;
pub mod services;

pub use config::Config;
pub use models::{LotSummary, RunReport};
