//! Least-squares fitting of the function families in [`crate::functions`]
//!
//! All routines take the raw datapoints and return the fitted parameters in the
//! original x scale. Internally the polynomial fits are solved on x centred at
//! its mean, which keeps year-valued inputs (x around 2000) well conditioned.

use crate::functions::{ExponentialCoef, LinearCoef, LogarithmicCoef, QuadraticCoef};
use crate::point::Datapoint;
use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};
use statrs::statistics::Statistics;

const SINGULAR_EPS: f64 = 1e-12;

/// Ordinary least squares fit of `y = k0 + k1*x`.
///
/// Needs at least two points with distinct x; with exactly two the result is
/// the line through them.
pub fn linear_regression(points: &[Datapoint]) -> Result<LinearCoef> {
    if points.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Linear regression needs at least 2 points, got {}",
            points.len()
        )));
    }

    let x_mean = points.iter().map(|p| p.x).mean();
    let y_mean = points.iter().map(|p| p.y).mean();

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for p in points {
        numerator += (p.x - x_mean) * (p.y - y_mean);
        denominator += (p.x - x_mean) * (p.x - x_mean);
    }

    if denominator.abs() < SINGULAR_EPS {
        return Err(MathError::CalculationError(
            "Cannot calculate slope: x values are too similar".to_string(),
        ));
    }

    let k1 = numerator / denominator;
    Ok(LinearCoef::new(y_mean - k1 * x_mean, k1))
}

/// Least squares fit of `y = k0 + k1*x + k2*x^2`.
///
/// With fewer than three distinct x values the fit degrades instead of failing:
/// two distinct x give the connecting line (`k2 = 0`), a single x gives the
/// constant mean of y.
pub fn quadratic_regression(points: &[Datapoint]) -> Result<QuadraticCoef> {
    if points.is_empty() {
        return Err(MathError::InsufficientData(
            "Quadratic regression needs at least 1 point".to_string(),
        ));
    }

    match distinct_x_count(points) {
        1 => {
            let y_mean = points.iter().map(|p| p.y).mean();
            return Ok(QuadraticCoef::new(y_mean, 0.0, 0.0));
        }
        2 => {
            let line = linear_regression(points)?;
            return Ok(QuadraticCoef::new(line.k0, line.k1, 0.0));
        }
        _ => {}
    }

    let n = points.len();
    let m = points.iter().map(|p| p.x).mean();
    let design = DMatrix::from_fn(n, 3, |i, j| (points[i].x - m).powi(j as i32));
    let targets = DVector::from_iterator(n, points.iter().map(|p| p.y));

    let beta = design
        .svd(true, true)
        .solve(&targets, SINGULAR_EPS)
        .map_err(|e| MathError::CalculationError(format!("Quadratic fit failed: {}", e)))?;
    let (a, b, c) = (beta[0], beta[1], beta[2]);

    // Expand a + b(x - m) + c(x - m)^2 back into powers of x.
    Ok(QuadraticCoef::new(a - b * m + c * m * m, b - 2.0 * c * m, c))
}

/// Least squares fit of `y = k0 + k1*ln(x)`; every x must be positive.
pub fn logarithmic_regression(points: &[Datapoint]) -> Result<LogarithmicCoef> {
    if let Some(bad) = points.iter().find(|p| p.x <= 0.0) {
        return Err(MathError::Domain(format!(
            "Logarithmic regression needs positive x, got {}",
            bad.x
        )));
    }

    let transformed: Vec<Datapoint> = points
        .iter()
        .map(|p| Datapoint::new(p.x.ln(), p.y))
        .collect();
    let line = linear_regression(&transformed)?;

    Ok(LogarithmicCoef::new(line.k0, line.k1))
}

/// Compound growth anchored at the last point.
///
/// The rate is the compound annual growth between the points with the smallest
/// and largest x. A single point (or a single distinct x) grows at rate 0.
pub fn exponential_growth(points: &[Datapoint]) -> Result<ExponentialCoef> {
    let (first, last) = match (
        points.iter().min_by(|a, b| a.x.total_cmp(&b.x)),
        points.iter().max_by(|a, b| a.x.total_cmp(&b.x)),
    ) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(MathError::InsufficientData(
                "Exponential growth needs at least 1 point".to_string(),
            ))
        }
    };

    let span = last.x - first.x;
    if span.abs() < SINGULAR_EPS {
        return Ok(ExponentialCoef::new(last, 0.0));
    }

    let ratio = last.y / first.y;
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(MathError::CalculationError(format!(
            "Cannot derive a growth rate from {} to {}",
            first, last
        )));
    }

    Ok(ExponentialCoef::new(last, ratio.powf(1.0 / span) - 1.0))
}

fn distinct_x_count(points: &[Datapoint]) -> usize {
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    xs.dedup();
    xs.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn points(raw: &[(f64, f64)]) -> Vec<Datapoint> {
        raw.iter().map(|&p| Datapoint::from(p)).collect()
    }

    #[test]
    fn test_linear_regression_two_points() {
        let coef = linear_regression(&points(&[(0.0, 1.0), (2.0, 5.0)])).unwrap();
        assert_relative_eq!(coef.k0, 1.0);
        assert_relative_eq!(coef.k1, 2.0);
    }

    #[test]
    fn test_linear_regression_rejects_single_point() {
        assert!(matches!(
            linear_regression(&points(&[(1.0, 1.0)])),
            Err(MathError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_linear_regression_rejects_vertical_line() {
        assert!(matches!(
            linear_regression(&points(&[(1.0, 1.0), (1.0, 3.0)])),
            Err(MathError::CalculationError(_))
        ));
    }

    #[test]
    fn test_quadratic_degrades() {
        let single = quadratic_regression(&points(&[(2020.0, 4.0)])).unwrap();
        assert_eq!(single, QuadraticCoef::new(4.0, 0.0, 0.0));

        let pair = quadratic_regression(&points(&[(0.0, 1.0), (1.0, 3.0)])).unwrap();
        assert_relative_eq!(pair.k0, 1.0);
        assert_relative_eq!(pair.k1, 2.0);
        assert_eq!(pair.k2, 0.0);
    }

    #[test]
    fn test_exponential_growth_rate() {
        let coef =
            exponential_growth(&points(&[(2015.0, 100.0), (2016.0, 110.0), (2017.0, 121.0)]))
                .unwrap();
        assert_eq!(coef.start, Datapoint::new(2017.0, 121.0));
        assert_relative_eq!(coef.rate, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_exponential_single_point_is_flat() {
        let coef = exponential_growth(&points(&[(2010.0, 7.0)])).unwrap();
        assert_eq!(coef.rate, 0.0);
        assert_eq!(coef.eval(2050.0), 7.0);
    }

    #[test]
    fn test_exponential_sign_change_fails() {
        assert!(exponential_growth(&points(&[(0.0, -1.0), (1.0, 2.0)])).is_err());
        assert!(exponential_growth(&points(&[(0.0, 0.0), (1.0, 2.0)])).is_err());
    }

    #[test]
    fn test_logarithmic_regression_requires_positive_x() {
        assert!(matches!(
            logarithmic_regression(&points(&[(0.0, 1.0), (1.0, 2.0)])),
            Err(MathError::Domain(_))
        ));
    }
}
