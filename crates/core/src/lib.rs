//! Core types and configuration for the runclean system.
//!
//! This crate provides shared types used across all other crates:
//! - Table types (raw rows, cells, the fixed metric columns)
//! - Discard ratios
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
