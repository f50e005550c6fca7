//! Error types for the planner.
//!
//! Lookups and searches never fail: unknown ids and unreachable targets
//! degrade to sentinel values. Errors are reserved for constructing invalid
//! data and for the persistence/config collaborators.

use std::io;
use std::path::PathBuf;

/// A location could not be constructed from the given attributes.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LocationError {
    #[error("importance must be between 1 and 10, got {0}")]
    ImportanceOutOfRange(u8),

    #[error("visit priority must be between 1 and 10, got {0}")]
    VisitPriorityOutOfRange(u8),

    #[error("location id {0} is out of range")]
    IdOutOfRange(usize),

    #[error("cleaning frequency must be greater than zero")]
    ZeroCleaningFrequency,

    #[error("location name must not be empty")]
    EmptyName,
}

/// An edge could not be accepted into the graph.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EdgeError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("node id {0} is out of range")]
    NodeOutOfRange(usize),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RegistryError {
    #[error("a location with id {0} is already registered")]
    DuplicateId(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("location {id} has a name that cannot be stored: {name:?}")]
    UnencodableName { id: usize, name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("search weight {field} must be a finite non-negative number, got {value}")]
    InvalidWeight { field: &'static str, value: f64 },
}
