//! Goodness of fit for the regression families of a series
//!
//! Read-only: inspecting the fit never changes the selected method.

use crate::coefficients::{Coefficients, Method};
use crate::error::{ForecastError, Result};
use demand_math::Datapoint;
use statrs::statistics::Statistics;
use std::fmt;

/// Accuracy of fitted values against observed values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination, `None` when the observations are constant
    pub r_squared: Option<f64>,
}

/// Calculate accuracy metrics for fitted vs actual values
pub fn fit_accuracy(fitted: &[f64], actual: &[f64]) -> Result<FitAccuracy> {
    if fitted.len() != actual.len() || fitted.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Fitted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = fitted.len() as f64;
    let errors: Vec<f64> = fitted.iter().zip(actual).map(|(&f, &a)| a - f).collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let ss_residual = errors.iter().map(|e| e.powi(2)).sum::<f64>();
    let rmse = (ss_residual / n).sqrt();

    let actual_mean = actual.mean();
    let ss_total = actual.iter().map(|a| (a - actual_mean).powi(2)).sum::<f64>();
    let r_squared = (ss_total.abs() > 1e-12).then(|| 1.0 - ss_residual / ss_total);

    Ok(FitAccuracy {
        mae,
        rmse,
        r_squared,
    })
}

/// Accuracy of every populated family on `data`.
///
/// Families that cannot be evaluated at every x (a logarithm at x <= 0) are left out.
pub fn fit_report(coef: &Coefficients, data: &[Datapoint]) -> Vec<(Method, FitAccuracy)> {
    let actual: Vec<f64> = data.iter().map(|p| p.y).collect();

    coef.populated_methods()
        .into_iter()
        .filter_map(|method| {
            let function = coef.function_for(method).ok()?;
            let fitted = data
                .iter()
                .map(|p| function.eval(p.x))
                .collect::<Result<Vec<f64>>>()
                .ok()?;
            fit_accuracy(&fitted, &actual)
                .ok()
                .map(|accuracy| (method, accuracy))
        })
        .collect()
}

impl fmt::Display for FitAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAE: {:.4}, RMSE: {:.4}", self.mae, self.rmse)?;
        match self.r_squared {
            Some(r_squared) => write!(f, ", R2: {:.4}", r_squared),
            None => write!(f, ", R2: n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_fit() {
        let accuracy = fit_accuracy(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(accuracy.mae, 0.0);
        assert_eq!(accuracy.rmse, 0.0);
        assert_relative_eq!(accuracy.r_squared.unwrap(), 1.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(fit_accuracy(&[1.0], &[1.0, 2.0]).is_err());
        assert!(fit_accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_constant_actuals_have_no_r_squared() {
        let accuracy = fit_accuracy(&[1.0, 3.0], &[2.0, 2.0]).unwrap();
        assert_eq!(accuracy.mae, 1.0);
        assert_eq!(accuracy.r_squared, None);
        assert_eq!(accuracy.to_string(), "MAE: 1.0000, RMSE: 1.0000, R2: n/a");
    }

    #[test]
    fn test_report_leaves_selection_untouched() {
        let data = [
            Datapoint::new(1.0, 2.0),
            Datapoint::new(2.0, 4.0),
            Datapoint::new(3.0, 6.0),
        ];
        let coef = Coefficients::fit(&data);
        let report = fit_report(&coef, &data);

        let linear = report
            .iter()
            .find(|(method, _)| *method == Method::Linear)
            .map(|(_, accuracy)| *accuracy)
            .unwrap();
        assert!(linear.rmse < 1e-9);
        assert_eq!(report.len(), coef.populated_methods().len());
        assert_eq!(coef.method(), None);
    }
}
