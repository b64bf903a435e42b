//! Historical data paired with the strategy that forecasts beyond it
//!
//! A [`Series`] answers "value at year Y" for any year: years before the
//! caller's last available year come from the historical [`Timeseries`], later
//! years from its [`ForecastStrategy`]. The strategy is chosen once at
//! construction:
//!
//! - [`ForecastStrategy::Regression`]: a selected regression family
//! - [`ForecastStrategy::ManualPoints`]: externally supplied predictions, matched by exact year
//! - [`ForecastStrategy::IntervalGrowth`]: compound growth over growth-rate intervals
//! - [`ForecastStrategy::Rigid`]: no forecast, the last known value carries forward

use crate::coefficients::{Coefficients, Method};
use crate::error::{ForecastError, Result};
use crate::interval::IntervalForecast;
use crate::timeseries::{normalize_year, Timeseries};
use demand_math::Datapoint;
use tracing::debug;

/// How a [`Series`] projects past its historical data
#[derive(Debug, Clone)]
pub enum ForecastStrategy {
    Regression(Coefficients),
    ManualPoints(Timeseries),
    IntervalGrowth {
        start: Datapoint,
        forecast: IntervalForecast,
    },
    Rigid,
}

/// Historical timeseries plus its forecast strategy
#[derive(Debug, Clone)]
pub struct Series {
    historical: Timeseries,
    strategy: ForecastStrategy,
}

impl Series {
    /// Forecast with the regression family `method`, fitted on the historical data.
    ///
    /// A single-point history stays fixated to flat exponential growth.
    pub fn regression(historical: Timeseries, method: Method) -> Self {
        let mut coef = historical.get_coef().clone();
        coef.set_method(method, false);
        Self::with_coefficients(historical, coef)
    }

    /// Forecast with externally prepared coefficients
    pub fn with_coefficients(historical: Timeseries, coef: Coefficients) -> Self {
        Self {
            historical,
            strategy: ForecastStrategy::Regression(coef),
        }
    }

    /// Forecast by looking up manually supplied prediction points
    pub fn manual<I, P>(historical: Timeseries, predictions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Datapoint>,
    {
        Self {
            historical,
            strategy: ForecastStrategy::ManualPoints(Timeseries::new(predictions)),
        }
    }

    /// Forecast by compound growth from the last historical datapoint.
    ///
    /// Intervals that end before the last historical year are discarded.
    pub fn step_sequence(historical: Timeseries, mut forecast: IntervalForecast) -> Result<Self> {
        let start = historical.last_datapoint().ok_or_else(|| {
            ForecastError::InvalidParameter(
                "Step sequence needs at least one historical datapoint".to_string(),
            )
        })?;

        let discarded = forecast.discard_ending_before(start.x);
        if discarded > 0 {
            debug!(discarded, last_year = start.x, "discarded used-up growth intervals");
        }

        Ok(Self::interval_growth(historical, start, forecast))
    }

    /// Forecast by compound growth from an explicit start point
    pub fn interval_growth(historical: Timeseries, start: Datapoint, forecast: IntervalForecast) -> Self {
        Self {
            historical,
            strategy: ForecastStrategy::IntervalGrowth { start, forecast },
        }
    }

    /// Never forecast; later years repeat the last known value
    pub fn rigid(historical: Timeseries) -> Self {
        Self {
            historical,
            strategy: ForecastStrategy::Rigid,
        }
    }

    pub fn historical(&self) -> &Timeseries {
        &self.historical
    }

    pub fn strategy(&self) -> &ForecastStrategy {
        &self.strategy
    }

    /// Regression coefficients, when the strategy is a regression
    pub fn coefficients(&self) -> Option<&Coefficients> {
        match &self.strategy {
            ForecastStrategy::Regression(coef) => Some(coef),
            _ => None,
        }
    }

    pub fn coefficients_mut(&mut self) -> Option<&mut Coefficients> {
        match &mut self.strategy {
            ForecastStrategy::Regression(coef) => Some(coef),
            _ => None,
        }
    }

    /// Historical value at `year`, failing when absent
    pub fn get_value_at_year(&self, year: f64) -> Result<f64> {
        self.historical.get_value_at_year(year)
    }

    /// Historical value at `year`, or 0.0 when absent
    pub fn get_value_at_year_or_zero(&self, year: f64) -> f64 {
        self.historical.get_value_at_year_or_zero(year)
    }

    /// Forecast value at `x`, ignoring the historical data except as a start point
    pub fn get_forecast_value(&self, x: f64) -> Result<f64> {
        match &self.strategy {
            ForecastStrategy::Regression(coef) => coef.get_value(x),
            ForecastStrategy::ManualPoints(points) => points
                .get_value_at_year(x)
                .map_err(|_| ForecastError::ManualPointMissing {
                    x: normalize_year(x),
                }),
            ForecastStrategy::IntervalGrowth { start, forecast } => Ok(forecast.project(*start, x)),
            ForecastStrategy::Rigid => self.historical.get_last_available_value(x),
        }
    }

    /// Historical value before `last_available_year`, forecast value from it onwards
    pub fn get_value(&self, x: f64, last_available_year: f64) -> Result<f64> {
        if x < last_available_year {
            self.get_value_at_year(x)
        } else {
            self.get_forecast_value(x)
        }
    }
}
