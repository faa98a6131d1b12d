//! Error types shared by every engine of the crate.

use thiserror::Error;

/// Errors reported by validating operations.
///
/// Every validating function checks all of its preconditions before it
/// constructs anything, so an `Err` never leaves a partially built value behind.
/// Two temporal values that simply do not overlap in time are not an error:
/// those operations return `Ok(None)` instead.
#[derive(Error, Debug)]
pub enum TemporaError {
    /// Null, empty, negative or out-of-range parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation applied to incompatible base or temporal types,
    /// including SRID or dimensionality mismatches of spatial values.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Interpolation not allowed for the base type or the subtype.
    #[error("Invalid interpolation: {0}")]
    InvalidInterpolation(String),

    /// A base-type tag reached a dispatch table without being registered.
    #[error("Internal type error: {0}")]
    InternalType(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TemporaError>;
