//! Command implementations.

pub mod browse;
pub mod config;
pub mod dashboard;
pub mod records;
