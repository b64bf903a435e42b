//! Forecast run settings
//!
//! The historical/forecast boundary and the default regression family are
//! configuration, passed in by the caller rather than derived from the data.

use crate::coefficients::{Coefficients, Method};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by every series of one forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastSettings {
    /// Last year with historical data; later years are forecast
    pub last_available_year: f64,
    /// Year the projection is built for
    pub target_year: f64,
    /// Regression family used when a series does not choose its own
    #[serde(default = "default_method")]
    pub forecast_method: Method,
    /// Offset for [`Method::QuadraticOffset`]
    #[serde(default)]
    pub quadratic_offset: Option<f64>,
}

fn default_method() -> Method {
    Method::Exponential
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            last_available_year: 2018.0,
            target_year: 2050.0,
            forecast_method: default_method(),
            quadratic_offset: None,
        }
    }
}

impl ForecastSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate settings from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.last_available_year.is_finite() || !self.target_year.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Years must be finite".to_string(),
            ));
        }
        if self.target_year < self.last_available_year {
            return Err(ForecastError::InvalidParameter(format!(
                "Target year {} lies before the last available year {}",
                self.target_year, self.last_available_year
            )));
        }
        if self.forecast_method == Method::QuadraticOffset && self.quadratic_offset.is_none() {
            return Err(ForecastError::InvalidParameter(
                "quadratic_offset method requires a quadratic_offset value".to_string(),
            ));
        }
        Ok(())
    }

    /// Select the configured method (and offset) on `coef`
    pub fn apply(&self, coef: &mut Coefficients) {
        if let Some(offset) = self.quadratic_offset {
            coef.set_offset(offset);
        }
        coef.set_method(self.forecast_method, false);
    }
}
