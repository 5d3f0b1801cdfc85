//! Look up, rank and compare ship stats from per-class, per-level tables.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod stats;

pub use error::{Result, StatsError};
