//! Error types shared by the loader, the vocabulary parsers and the CLI.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::vocabulary::Level;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("data directory not found: {}", .0.display())]
    DataDirMissing(PathBuf),

    #[error("no ship tables could be loaded from {}", .0.display())]
    DataDirEmpty(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid level '{0}' (expected one of 1, 100, 120, 125)")]
    InvalidLevel(String),

    #[error("invalid hull class '{0}' (expected one of DD, CL, CA, BB, CV, SS, AUX, IX)")]
    InvalidClass(String),

    #[error("invalid policy '{0}' (expected class, rarity or above-median)")]
    InvalidPolicy(String),

    #[error("'{0}' is not a table key of the form <Class>_Level_<N>")]
    InvalidTableKey(String),

    #[error("no attributes requested")]
    EmptyAttributeList,

    #[error("unknown attribute(s): {}", tokens.join(", "))]
    UnknownAttributes { tokens: Vec<String> },

    #[error("no ship named '{name}' at level {level}")]
    ShipNotFound { name: String, level: Level },
}

pub type Result<T> = std::result::Result<T, StatsError>;
