//! Errors
//!
//! Custom error types used throughout the `canopy` crate.
use thiserror::Error;

/// Errors that can occur while building trees or cross-validating them.
#[derive(Debug, Error)]
pub enum CanopyError {
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidHyperparameter(String, String, String),
    /// The dataset cannot satisfy the requested constraints.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    /// First value is the requested number of folds, second the number of rows.
    #[error("Invalid fold count {0}, expected more than 1 fold and at most {1} (the number of rows).")]
    InvalidFoldCount(usize, usize),
    /// Two sequences that must be aligned have different lengths.
    #[error("Length mismatch, {0} true values but {1} predictions.")]
    LengthMismatch(usize, usize),
    /// Data does not have the expected shape.
    #[error("Invalid data shape: {0}")]
    InvalidShape(String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// The worker pool could not be created.
    #[error("Unable to build thread pool: {0}")]
    ThreadPool(String),
    /// Unable to serialize an object to json.
    #[error("Unable to write object to json: {0}")]
    UnableToWrite(String),
    /// Unable to deserialize an object from json.
    #[error("Unable to read object from json: {0}")]
    UnableToRead(String),
}
