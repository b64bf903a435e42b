//! Error types for the demand_forecast crate

use crate::coefficients::Method;
use demand_math::MathError;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Lookup of an x that is absent from the historical data
    #[error("No datapoint found at x = {x}")]
    NotFound { x: f64 },

    /// Lookup of an x that has no manually supplied prediction
    #[error("No manual prediction supplied for x = {x}")]
    ManualPointMissing { x: f64 },

    /// A forecast was requested before any regression method was selected
    #[error("No forecast method selected")]
    NoMethodSelected,

    /// The selected method's parameters were never computed
    #[error("Coefficients for method {0} were never computed")]
    MissingCoefficients(Method),

    /// A region code that cannot be placed below the node it was inserted into
    #[error("Malformed region code {code:?} below {parent:?}")]
    MalformedRegionCode { parent: String, code: String },

    /// A leaf region inserted twice
    #[error("Region {0:?} already exists")]
    DuplicateRegion(String),

    /// Value read from a branch that has no children and no supplied series
    #[error("Region {0:?} has no children to aggregate")]
    EmptyRegion(String),

    /// Insertion below a leaf region
    #[error("Region {0:?} is a leaf and cannot hold children")]
    LeafHasNoChildren(String),

    /// Growth intervals that share more than an endpoint
    #[error("Growth intervals overlap: {0}")]
    OverlappingIntervals(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from reading settings
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Error from regression or evaluation
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
