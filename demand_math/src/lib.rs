//! # Demand Math
//!
//! Numeric building blocks for demand forecasting.
//! This crate provides the (x, y) value types, the fitted function families
//! (linear, quadratic, quadratic with offset, exponential, logarithmic) and the
//! least-squares routines that produce them.
//!
//! Every evaluation function is a pure function of its inputs, so callers are
//! free to memoize around them.

use thiserror::Error;

pub mod functions;
pub mod point;
pub mod regression;

pub use functions::{
    eval_exponential, eval_linear, eval_logarithmic, eval_quadratic, eval_quadratic_with_offset,
    ExponentialCoef, LinearCoef, LogarithmicCoef, QuadraticCoef,
};
pub use point::{Datapoint, Interval};
pub use regression::{
    exponential_growth, linear_regression, logarithmic_regression, quadratic_regression,
};

/// Errors that can occur in regression and evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for regression math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::Domain("ln(-1)".to_string());
        assert_eq!(err.to_string(), "Domain error: ln(-1)");
    }
}
