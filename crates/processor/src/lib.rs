//! Review metrics computation

pub mod attribution;
pub mod calculator;
pub mod grouping;
pub mod metrics;
pub mod sessions;

pub use calculator::{MetricsCalculator, MetricsError};

#[cfg(test)]
mod sessions_test;
#[cfg(test)]
mod tests;
