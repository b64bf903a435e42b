//! Fitted regression families for one series and the selection of which one forecasts
//!
//! A [`Coefficients`] bundle can hold every family at once (they are all computed
//! together when a series is fitted), while exactly one selected [`Method`] decides
//! what [`Coefficients::get_value`] returns. Resolving the selection yields a
//! [`RegressionFunction`], which carries only the parameters of that family.

use crate::error::{ForecastError, Result};
use demand_math::{
    exponential_growth, linear_regression, logarithmic_regression, quadratic_regression,
    Datapoint, ExponentialCoef, LinearCoef, LogarithmicCoef, QuadraticCoef,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{trace, warn};

/// Regression family a forecast dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Linear,
    Quadratic,
    Exponential,
    QuadraticOffset,
    Logarithmic,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Linear,
        Method::Quadratic,
        Method::Exponential,
        Method::QuadraticOffset,
        Method::Logarithmic,
    ];
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Linear => write!(f, "linear"),
            Method::Quadratic => write!(f, "quadratic"),
            Method::Exponential => write!(f, "exponential"),
            Method::QuadraticOffset => write!(f, "quadratic_offset"),
            Method::Logarithmic => write!(f, "logarithmic"),
        }
    }
}

/// One resolved regression family with exactly the parameters it needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegressionFunction {
    Linear(LinearCoef),
    Quadratic(QuadraticCoef),
    QuadraticOffset { coef: QuadraticCoef, offset: f64 },
    Exponential(ExponentialCoef),
    Logarithmic(LogarithmicCoef),
}

impl RegressionFunction {
    pub fn method(&self) -> Method {
        match self {
            RegressionFunction::Linear(_) => Method::Linear,
            RegressionFunction::Quadratic(_) => Method::Quadratic,
            RegressionFunction::QuadraticOffset { .. } => Method::QuadraticOffset,
            RegressionFunction::Exponential(_) => Method::Exponential,
            RegressionFunction::Logarithmic(_) => Method::Logarithmic,
        }
    }

    pub fn eval(&self, x: f64) -> Result<f64> {
        Ok(match self {
            RegressionFunction::Linear(coef) => coef.eval(x),
            RegressionFunction::Quadratic(coef) => coef.eval(x),
            RegressionFunction::QuadraticOffset { coef, offset } => coef.with_offset(*offset).eval(x),
            RegressionFunction::Exponential(coef) => coef.eval(x),
            RegressionFunction::Logarithmic(coef) => coef.eval(x)?,
        })
    }
}

/// Fitted parameters for every regression family plus the selected method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    exponential: Option<ExponentialCoef>,
    logarithmic: Option<LogarithmicCoef>,
    linear: Option<LinearCoef>,
    quadratic: Option<QuadraticCoef>,
    offset: Option<f64>,
    method: Option<Method>,
    fixed: bool,
}

impl Coefficients {
    /// Empty container: no family populated, no method selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit every family the data supports.
    ///
    /// Families whose fit fails (too few points, non-positive x for the
    /// logarithm, sign change for the growth rate) stay unpopulated. A series
    /// with a single datapoint is fixated to exponential growth at rate 0.
    pub fn fit(points: &[Datapoint]) -> Self {
        let mut coef = Self::new();

        match linear_regression(points) {
            Ok(linear) => coef.linear = Some(linear),
            Err(e) => trace!("skipping linear fit: {}", e),
        }
        match quadratic_regression(points) {
            Ok(quadratic) => coef.quadratic = Some(quadratic),
            Err(e) => trace!("skipping quadratic fit: {}", e),
        }
        match exponential_growth(points) {
            Ok(exponential) => coef.exponential = Some(exponential),
            Err(e) => trace!("skipping exponential fit: {}", e),
        }
        match logarithmic_regression(points) {
            Ok(logarithmic) => coef.logarithmic = Some(logarithmic),
            Err(e) => trace!("skipping logarithmic fit: {}", e),
        }

        if let [only] = points {
            coef.exponential = Some(ExponentialCoef::new(*only, 0.0));
            coef.set_method(Method::Exponential, true);
        }

        coef
    }

    /// Select the family `get_value` dispatches to.
    ///
    /// Once fixated, later calls leave the method untouched; `fixate` itself can
    /// always be (re)applied.
    pub fn set_method(&mut self, method: Method, fixate: bool) -> &mut Self {
        if !self.fixed {
            self.method = Some(method);
        }
        self.fixed |= fixate;
        self
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Set the exponential family; `rate` must be finite and above -1
    pub fn set_exponential(&mut self, start: Datapoint, rate: f64) -> Result<&mut Self> {
        if !rate.is_finite() || rate <= -1.0 || !start.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "Exponential growth from {} needs a finite rate above -1, got {}",
                start, rate
            )));
        }
        self.exponential = Some(ExponentialCoef::new(start, rate));
        Ok(self)
    }

    pub fn set_linear(&mut self, k0: f64, k1: f64) -> &mut Self {
        self.linear = Some(LinearCoef::new(k0, k1));
        self
    }

    pub fn set_quadratic(&mut self, k0: f64, k1: f64, k2: f64) -> &mut Self {
        self.quadratic = Some(QuadraticCoef::new(k0, k1, k2));
        self
    }

    pub fn set_logarithmic(&mut self, k0: f64, k1: f64) -> &mut Self {
        self.logarithmic = Some(LogarithmicCoef::new(k0, k1));
        self
    }

    /// Offset added to the quadratic constant term by [`Method::QuadraticOffset`]
    pub fn set_offset(&mut self, offset: f64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn exponential(&self) -> Option<&ExponentialCoef> {
        self.exponential.as_ref()
    }

    pub fn linear(&self) -> Option<&LinearCoef> {
        self.linear.as_ref()
    }

    pub fn quadratic(&self) -> Option<&QuadraticCoef> {
        self.quadratic.as_ref()
    }

    pub fn logarithmic(&self) -> Option<&LogarithmicCoef> {
        self.logarithmic.as_ref()
    }

    pub fn offset(&self) -> Option<f64> {
        self.offset
    }

    /// Every method whose parameters are available
    pub fn populated_methods(&self) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|&method| self.function_for(method).is_ok())
            .collect()
    }

    /// Resolve one family regardless of the current selection
    pub fn function_for(&self, method: Method) -> Result<RegressionFunction> {
        let function = match method {
            Method::Linear => self.linear.map(RegressionFunction::Linear),
            Method::Quadratic => self.quadratic.map(RegressionFunction::Quadratic),
            Method::QuadraticOffset => self
                .quadratic
                .zip(self.offset)
                .map(|(coef, offset)| RegressionFunction::QuadraticOffset { coef, offset }),
            Method::Exponential => self.exponential.map(RegressionFunction::Exponential),
            Method::Logarithmic => self.logarithmic.map(RegressionFunction::Logarithmic),
        };

        function.ok_or(ForecastError::MissingCoefficients(method))
    }

    /// Resolve the selected family
    pub fn function(&self) -> Result<RegressionFunction> {
        let method = self.method.ok_or(ForecastError::NoMethodSelected)?;
        self.function_for(method)
    }

    /// Evaluate the selected family at `x`
    pub fn get_value(&self, x: f64) -> Result<f64> {
        let function = self.function().map_err(|e| {
            warn!(x, "no usable forecast configured: {}", e);
            e
        })?;

        function.eval(x)
    }
}
