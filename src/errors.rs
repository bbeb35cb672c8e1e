//! Errors
//!
//! Custom error types used throughout the `chisq` crate.
use crate::contingency::Axis;
use thiserror::Error;

/// Errors that can occur while building tables or evaluating the distribution.
#[derive(Debug, Error)]
pub enum ChiSquaredError {
    /// A row or column category has a zero marginal total.
    #[error("The {axis} category {label} has a zero marginal total, its expected counts would divide by zero.")]
    DegenerateCategory { axis: Axis, label: String },
    /// The table holds no observations.
    #[error("The contingency table is empty, the grand total is zero.")]
    EmptyTable,
    /// Degrees of freedom must be at least one.
    #[error("Invalid degrees of freedom {0}, expected an integer >= 1.")]
    InvalidDegreesOfFreedom(u64),
    /// The complete gamma function is only defined here for integers and half-integers.
    #[error("Can't compute the complete gamma function at {0}, expected a positive integer or half-integer.")]
    UnsupportedGammaArgument(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// A float that has no exact rational value.
    #[error("The value {0} can't be represented as a rational number.")]
    NotRepresentable(f64),
    /// A named column is not present in the input header.
    #[error("Column {0:?} not found in the input header.")]
    MissingColumn(String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// Delimited-text reader failure.
    #[error("Unable to read records: {0}")]
    Csv(#[from] csv::Error),
    /// File system failure.
    #[error("Unable to read input: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization failure.
    #[error("Unable to (de)serialize: {0}")]
    Json(#[from] serde_json::Error),
}
