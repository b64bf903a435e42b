//! # Demand Forecast
//!
//! Time-series regression and forecasting for energy demand projections.
//!
//! ## Features
//!
//! - (x, y) series with NaN/Inf filtering, arithmetic and gap filling
//! - Year-indexed timeseries with lazily fitted, memoized regression coefficients
//! - Linear, quadratic, quadratic-with-offset, exponential and logarithmic forecasts
//! - Piecewise compound growth over growth-rate intervals
//! - Manual prediction points and rigid (non-forecasting) series
//! - NUTS region trees that aggregate historical and forecast values bottom-up
//!
//! ## Quick Start
//!
//! ```rust
//! use demand_forecast::{Method, NutsRegion, Series, Timeseries};
//!
//! let history = Timeseries::new([(2015.0, 100.0), (2016.0, 110.0), (2017.0, 121.0)]);
//! let series = Series::regression(history, Method::Exponential);
//!
//! let mut germany = NutsRegion::branch("DE");
//! germany.insert(NutsRegion::leaf("DE11", series))?;
//!
//! let value = germany.get_value(2020.0, 2017.0)?;
//! assert!((value - 161.051).abs() < 1e-9);
//! # Ok::<(), demand_forecast::ForecastError>(())
//! ```

pub mod coefficients;
pub mod error;
pub mod interval;
pub mod metrics;
pub mod nuts;
pub mod series;
pub mod settings;
pub mod strategy;
pub mod timeseries;

// Re-export commonly used types
pub use crate::coefficients::{Coefficients, Method, RegressionFunction};
pub use crate::error::{ForecastError, Result};
pub use crate::interval::IntervalForecast;
pub use crate::metrics::{fit_accuracy, fit_report, FitAccuracy};
pub use crate::nuts::{NutsRegion, RegionNode};
pub use crate::series::TwoDseries;
pub use crate::settings::ForecastSettings;
pub use crate::strategy::{ForecastStrategy, Series};
pub use crate::timeseries::{normalize_year, Timeseries};
pub use demand_math::{Datapoint, Interval};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
