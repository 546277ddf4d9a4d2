//! Common types and utilities for Review Metrics

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
