//! Error types
//!
//! Profile errors are fatal at construction time. Climate errors reject a
//! scenario before any day is simulated. Transport errors never leave the
//! scenario provider: they only select the synthetic fallback.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a crop parameter sheet.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The sheet could not be read from disk.
    #[error("failed to read crop profile {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sheet is not valid JSON or has a field of the wrong type.
    #[error("failed to parse crop profile {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required key is absent.
    #[error("crop profile is missing required key '{0}'")]
    MissingKey(&'static str),

    /// The stage list has no entries.
    #[error("crop profile declares no growth stages")]
    EmptyStages,

    /// A stage threshold is lower than the one before it.
    #[error("stage '{stage}' threshold {threshold} is below the previous threshold {previous}")]
    NonMonotonicStages {
        stage: String,
        threshold: f64,
        previous: f64,
    },

    /// A value is present but unusable.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors raised by climate validation and scenario parsing.
#[derive(Debug, Error, PartialEq)]
pub enum ClimateError {
    #[error("day {day}: {field} is not finite")]
    NonFinite { day: u32, field: &'static str },

    #[error("day {day}: {field} = {value} is outside the physical range")]
    OutOfRange {
        day: u32,
        field: &'static str,
        value: f64,
    },

    #[error("day {day}: temperature max is below temperature min")]
    InvertedRange { day: u32 },

    #[error("expected day index {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },

    #[error("line {line}: expected 4 columns, found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("line {line}: '{value}' is not numeric")]
    NotNumeric { line: usize, value: String },

    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
}

/// Failures of the injected scenario transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("unexpected response payload: {0}")]
    Payload(String),
}

/// Errors returned by the simulation orchestrator.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("invalid climate scenario: {0}")]
    Climate(#[from] ClimateError),
}

/// Why a scenario strategy produced no usable series.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed scenario payload: {0}")]
    Malformed(#[from] ClimateError),
}
