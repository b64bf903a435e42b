//! Fitted function families and their evaluation
//!
//! Contains the parameter sets produced by the regression routines:
//! - Linear: `y = k0 + k1*x`
//! - Quadratic: `y = k0 + k1*x + k2*x^2` (optionally with an offset on `k0`)
//! - Exponential: `y = y0 * (1 + r)^(x - x0)`
//! - Logarithmic: `y = k0 + k1*ln(x)`

use crate::point::Datapoint;
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Parameters of `y = k0 + k1*x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCoef {
    pub k0: f64,
    pub k1: f64,
}

impl LinearCoef {
    pub fn new(k0: f64, k1: f64) -> Self {
        Self { k0, k1 }
    }

    pub fn eval(&self, x: f64) -> f64 {
        eval_linear(self, x)
    }
}

/// Parameters of `y = k0 + k1*x + k2*x^2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticCoef {
    pub k0: f64,
    pub k1: f64,
    pub k2: f64,
}

impl QuadraticCoef {
    pub fn new(k0: f64, k1: f64, k2: f64) -> Self {
        Self { k0, k1, k2 }
    }

    pub fn eval(&self, x: f64) -> f64 {
        eval_quadratic(self, x)
    }

    /// Same parabola with `offset` added to the constant term
    pub fn with_offset(&self, offset: f64) -> Self {
        Self {
            k0: self.k0 + offset,
            ..*self
        }
    }
}

/// Parameters of `y = y0 * (1 + r)^(x - x0)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialCoef {
    /// Point the growth is anchored at
    pub start: Datapoint,
    /// Growth rate as a fraction (0.1 = 10% per unit of x)
    pub rate: f64,
}

impl ExponentialCoef {
    pub fn new(start: Datapoint, rate: f64) -> Self {
        Self { start, rate }
    }

    pub fn eval(&self, x: f64) -> f64 {
        eval_exponential(self.start, self.rate, x)
    }
}

/// Parameters of `y = k0 + k1*ln(x)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogarithmicCoef {
    pub k0: f64,
    pub k1: f64,
}

impl LogarithmicCoef {
    pub fn new(k0: f64, k1: f64) -> Self {
        Self { k0, k1 }
    }

    pub fn eval(&self, x: f64) -> Result<f64> {
        eval_logarithmic(self, x)
    }
}

pub fn eval_linear(coef: &LinearCoef, x: f64) -> f64 {
    coef.k0 + coef.k1 * x
}

pub fn eval_quadratic(coef: &QuadraticCoef, x: f64) -> f64 {
    coef.k0 + coef.k1 * x + coef.k2 * x * x
}

/// Evaluate the parabola with `offset` added to its constant term
pub fn eval_quadratic_with_offset(coef: &QuadraticCoef, offset: f64, x: f64) -> f64 {
    eval_quadratic(&coef.with_offset(offset), x)
}

/// Compound growth from `start`; evaluating at `start.x` yields `start.y` for every rate
pub fn eval_exponential(start: Datapoint, rate: f64, x: f64) -> f64 {
    start.y * (1.0 + rate).powf(x - start.x)
}

/// Evaluate `k0 + k1*ln(x)`, failing for non-positive `x`
pub fn eval_logarithmic(coef: &LogarithmicCoef, x: f64) -> Result<f64> {
    if x <= 0.0 || x.is_nan() {
        return Err(MathError::Domain(format!(
            "Logarithm is undefined for x = {}",
            x
        )));
    }

    Ok(coef.k0 + coef.k1 * x.ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_and_quadratic() {
        assert_eq!(eval_linear(&LinearCoef::new(1.0, 2.0), 3.0), 7.0);
        assert_eq!(eval_quadratic(&QuadraticCoef::new(1.0, 2.0, 3.0), 2.0), 17.0);
    }

    #[test]
    fn test_quadratic_offset_shifts_constant_term() {
        let coef = QuadraticCoef::new(1.0, 2.0, 3.0);
        assert_eq!(eval_quadratic_with_offset(&coef, 10.0, 2.0), 27.0);
        assert_eq!(eval_quadratic_with_offset(&coef, 0.0, 2.0), coef.eval(2.0));
    }

    #[test]
    fn test_exponential_at_start_is_start_value() {
        let start = Datapoint::new(2017.0, 121.0);
        for rate in [-0.5, 0.0, 0.1, 3.0] {
            assert_eq!(eval_exponential(start, rate, 2017.0), 121.0);
        }
        assert_relative_eq!(eval_exponential(start, 0.1, 2020.0), 161.051, epsilon = 1e-9);
    }

    #[test]
    fn test_logarithmic_domain() {
        let coef = LogarithmicCoef::new(1.0, 2.0);
        assert_relative_eq!(coef.eval(std::f64::consts::E).unwrap(), 3.0);
        assert!(matches!(coef.eval(0.0), Err(MathError::Domain(_))));
        assert!(matches!(coef.eval(-3.0), Err(MathError::Domain(_))));
    }
}
