//! Error types for data loading and health operations.

use thiserror::Error;

/// Errors that can occur when loading enemy definitions or config data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// File name does not name a known enemy variant.
    #[error("Unknown enemy variant '{name}' in '{path}'")]
    UnknownVariant { name: String, path: String },

    /// A definition carries a value that cannot drive the simulation.
    #[error("Invalid value for '{field}' in '{variant}': {reason}")]
    InvalidValue {
        variant: String,
        field: &'static str,
        reason: String,
    },
}

/// Errors from health operations that are illegal in the current state.
#[derive(Debug, Error, PartialEq)]
pub enum CombatError {
    /// Heal requested on an entity that already died.
    #[error("cannot heal an entity that is dead")]
    HealWhileDead,
}
