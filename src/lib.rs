//! # Endemo
//!
//! `endemo` is the forecasting core of a useful-energy demand model: it turns
//! historical population, GDP, production and specific-consumption series into
//! projections, per country and per NUTS2 region.
//!
//! Sector modules talk to it through [`Projection`], which binds the run's
//! [`ForecastSettings`] to the series and region trees they build.
//!
//! ## Example
//!
//! ```
//! use endemo::prelude::*;
//!
//! let settings = ForecastSettings {
//!     last_available_year: 2017.0,
//!     target_year: 2020.0,
//!     forecast_method: Method::Exponential,
//!     quadratic_offset: None,
//! };
//! let projection = Projection::new(settings)?;
//!
//! let history = Timeseries::new([(2015.0, 100.0), (2016.0, 110.0), (2017.0, 121.0)]);
//! let series = projection.series(history);
//!
//! let value = projection.target_value(&series)?;
//! assert!((value - 161.051).abs() < 1e-9);
//! # Ok::<(), endemo::ForecastError>(())
//! ```

pub use demand_forecast::{
    fit_report, Coefficients, Datapoint, FitAccuracy, ForecastError, ForecastSettings,
    ForecastStrategy, Interval, IntervalForecast, Method, NutsRegion, RegionNode,
    RegressionFunction, Result, Series, Timeseries, TwoDseries,
};
pub use demand_math::MathError;

/// Everything a sector module needs in one import
pub mod prelude {
    pub use crate::Projection;
    pub use demand_forecast::{
        Coefficients, Datapoint, ForecastSettings, Interval, IntervalForecast, Method,
        NutsRegion, Series, Timeseries,
    };
}

use tracing::debug;

/// Settings-bound access to series and region values
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    settings: ForecastSettings,
}

impl Projection {
    /// Creates a projection for validated settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use endemo::{ForecastSettings, Projection};
    ///
    /// let mut settings = ForecastSettings::default();
    /// settings.target_year = settings.last_available_year - 1.0;
    /// assert!(Projection::new(settings).is_err());
    /// ```
    pub fn new(settings: ForecastSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Creates a projection from JSON settings
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            settings: ForecastSettings::from_json(json)?,
        })
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Wraps `historical` in a regression forecast using the configured method
    pub fn series(&self, historical: Timeseries) -> Series {
        let mut coef = historical.get_coef().clone();
        self.settings.apply(&mut coef);
        Series::with_coefficients(historical, coef)
    }

    /// Value of `series` at `year`, historical before the last available year
    pub fn value(&self, series: &Series, year: f64) -> Result<f64> {
        series.get_value(year, self.settings.last_available_year)
    }

    /// Value of `series` at the target year
    pub fn target_value(&self, series: &Series) -> Result<f64> {
        self.value(series, self.settings.target_year)
    }

    /// Value of `region` (summed over its leaves for branches) at `year`
    pub fn region_value(&self, region: &NutsRegion, year: f64) -> Result<f64> {
        region.get_value(year, self.settings.last_available_year)
    }

    /// Splits `total` across the leaves of `region` in proportion to their
    /// values at the target year.
    pub fn distribute(&self, total: f64, region: &NutsRegion) -> Result<Vec<(String, f64)>> {
        let shares = region.leaf_shares(self.settings.target_year, self.settings.last_available_year)?;
        debug!(region = region.code(), leaves = shares.len(), total, "distributing total");

        Ok(shares
            .into_iter()
            .map(|(code, share)| (code.to_string(), total * share))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn settings() -> ForecastSettings {
        ForecastSettings {
            last_available_year: 2018.0,
            target_year: 2030.0,
            forecast_method: Method::Linear,
            quadratic_offset: None,
        }
    }

    fn population_tree(projection: &Projection) -> NutsRegion {
        let mut root = NutsRegion::branch("DE");
        for (code, base) in [("DE11", 10.0), ("DE12", 20.0), ("DE21", 70.0)] {
            let history = Timeseries::new([(2017.0, base), (2018.0, base)]);
            root.insert(NutsRegion::leaf(code, projection.series(history)))
                .unwrap();
        }
        root
    }

    #[test]
    fn test_projection_rejects_bad_settings() {
        let json = r#"{"last_available_year": 2018, "target_year": 2000}"#;
        assert!(Projection::from_json(json).is_err());
    }

    #[test]
    fn test_series_uses_configured_method() {
        let projection = Projection::new(settings()).unwrap();
        let series = projection.series(Timeseries::new([(2016.0, 1.0), (2018.0, 3.0)]));

        assert_eq!(series.coefficients().unwrap().method(), Some(Method::Linear));
        assert_eq!(projection.value(&series, 2016.0).unwrap(), 1.0);
        assert_relative_eq!(projection.target_value(&series).unwrap(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_region_value_and_distribution() {
        let projection = Projection::new(settings()).unwrap();
        let root = population_tree(&projection);

        assert_relative_eq!(projection.region_value(&root, 2017.0).unwrap(), 100.0);
        assert_relative_eq!(projection.region_value(&root, 2030.0).unwrap(), 100.0, epsilon = 1e-9);

        let distributed = projection.distribute(50.0, &root).unwrap();
        let codes: Vec<&str> = distributed.iter().map(|(code, _)| code.as_str()).collect();
        assert_eq!(codes, vec!["DE11", "DE12", "DE21"]);
        assert_relative_eq!(distributed[0].1, 5.0, epsilon = 1e-9);
        assert_relative_eq!(distributed[1].1, 10.0, epsilon = 1e-9);
        assert_relative_eq!(distributed[2].1, 35.0, epsilon = 1e-9);
    }
}
