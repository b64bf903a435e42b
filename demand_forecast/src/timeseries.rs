//! Year-indexed series
//!
//! A [`Timeseries`] is a [`TwoDseries`] whose x values are whole years kept in
//! ascending order. Years are rounded at ingestion and every lookup rounds its
//! query the same way, so year matching never depends on float noise from
//! spreadsheet headers. When two points land on the same year the later one
//! wins.

use crate::coefficients::{Coefficients, Method};
use crate::error::{ForecastError, Result};
use crate::series::TwoDseries;
use chrono::{Datelike, NaiveDate};
use demand_math::{Datapoint, Interval};
use num_traits::ToPrimitive;

/// Round an x value to the whole year it denotes
pub fn normalize_year(x: f64) -> f64 {
    x.round()
}

/// Ascending, year-indexed series
#[derive(Debug, Clone, Default)]
pub struct Timeseries {
    inner: TwoDseries,
}

impl Timeseries {
    /// Create a series from raw (year, value) points, dropping NaN/Inf pairs
    pub fn new<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Datapoint>,
    {
        Self::from_series(TwoDseries::new(points))
    }

    /// Create a series from pairs coercible to `f64`
    pub fn from_pairs<X, Y, I>(pairs: I) -> Self
    where
        X: ToPrimitive,
        Y: ToPrimitive,
        I: IntoIterator<Item = (X, Y)>,
    {
        Self::from_series(TwoDseries::from_pairs(pairs))
    }

    /// Create a series from date-stamped values, keeping the calendar year
    pub fn from_dated<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            values
                .into_iter()
                .map(|(date, y)| Datapoint::new(f64::from(date.year()), y)),
        )
    }

    /// Normalize and sort an arbitrary series into a timeseries
    pub fn from_series(series: TwoDseries) -> Self {
        let dropped = series.dropped_points();
        let mut data: Vec<Datapoint> = series
            .data()
            .iter()
            .map(|p| Datapoint::new(normalize_year(p.x), p.y))
            .collect();
        data.sort_by(|a, b| a.x.total_cmp(&b.x));
        data.dedup_by(|later, earlier| {
            if later.x == earlier.x {
                *earlier = *later;
                true
            } else {
                false
            }
        });

        Self {
            inner: TwoDseries::from_clean(data, dropped),
        }
    }

    /// The underlying (x, y) series
    pub fn as_series(&self) -> &TwoDseries {
        &self.inner
    }

    pub fn data(&self) -> &[Datapoint] {
        self.inner.data()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn dropped_points(&self) -> usize {
        self.inner.dropped_points()
    }

    pub fn years(&self) -> Vec<f64> {
        self.inner.xs()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.inner.ys()
    }

    pub fn first_datapoint(&self) -> Option<Datapoint> {
        self.data().first().copied()
    }

    pub fn last_datapoint(&self) -> Option<Datapoint> {
        self.data().last().copied()
    }

    /// Covered years as an interval, `None` when empty
    pub fn year_range(&self) -> Option<Interval> {
        match (self.first_datapoint(), self.last_datapoint()) {
            (Some(first), Some(last)) => Some(Interval {
                start: first.x,
                end: last.x,
            }),
            _ => None,
        }
    }

    pub fn get_coef(&self) -> &Coefficients {
        self.inner.get_coef()
    }

    pub fn get_coef_mut(&mut self) -> &mut Coefficients {
        self.inner.get_coef_mut()
    }

    pub fn generate_coef(&mut self) -> &Coefficients {
        self.inner.generate_coef()
    }

    pub fn set_method(&mut self, method: Method, fixate: bool) -> &mut Self {
        self.inner.set_method(method, fixate);
        self
    }

    fn position(&self, year: f64) -> std::result::Result<usize, usize> {
        let year = normalize_year(year);
        self.data().binary_search_by(|p| p.x.total_cmp(&year))
    }

    /// Historical value at `year`, failing when the year is absent
    pub fn get_value_at_year(&self, year: f64) -> Result<f64> {
        self.position(year)
            .map(|i| self.data()[i].y)
            .map_err(|_| ForecastError::NotFound {
                x: normalize_year(year),
            })
    }

    /// Historical value at `year`, or 0.0 when the year is absent
    pub fn get_value_at_year_or_zero(&self, year: f64) -> f64 {
        self.get_value_at_year(year).unwrap_or(0.0)
    }

    /// Value of the latest year that is not after `year`
    pub fn get_last_available_value(&self, year: f64) -> Result<f64> {
        match self.position(year) {
            Ok(i) => Ok(self.data()[i].y),
            Err(0) => Err(ForecastError::NotFound {
                x: normalize_year(year),
            }),
            Err(i) => Ok(self.data()[i - 1].y),
        }
    }

    /// Insert or replace the value at a year, keeping the order.
    ///
    /// Non-finite points are not inserted and count towards [`Timeseries::dropped_points`].
    pub fn insert(&mut self, point: Datapoint) -> &mut Self {
        if !point.is_finite() {
            self.inner.record_dropped();
            return self;
        }
        let point = Datapoint::new(normalize_year(point.x), point.y);
        match self.position(point.x) {
            Ok(i) => self.inner.data_mut()[i] = point,
            Err(i) => self.inner.data_mut().insert(i, point),
        }
        self
    }

    /// Add `other` year by year, keeping only the years present in both
    pub fn add(&mut self, other: &Timeseries) -> &mut Self {
        self.inner.add(&other.inner);
        self
    }

    /// Divide year by year, dropping years whose divisor is zero
    pub fn divide_by(&mut self, other: &Timeseries) -> &mut Self {
        self.inner.divide_by(&other.inner);
        self
    }

    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.inner.scale(factor);
        self
    }

    pub fn map_y(&mut self, f: impl Fn(f64) -> f64) -> &mut Self {
        self.inner.map_y(f);
        self
    }

    /// Insert `value` for every whole year of `interval` that has no datapoint.
    ///
    /// A single forward sweep over the ascending data.
    pub fn fill_own_empty_years_with_value(&mut self, interval: Interval, value: f64) -> &mut Self {
        let existing = std::mem::take(self.inner.data_mut());
        let mut merged = Vec::with_capacity(existing.len());
        let mut points = existing.into_iter().peekable();

        for year in interval.years() {
            while let Some(p) = points.next_if(|p| p.x < year) {
                merged.push(p);
            }
            match points.peek() {
                Some(p) if p.x == year => {}
                _ => merged.push(Datapoint::new(year, value)),
            }
        }
        merged.extend(points);

        *self.inner.data_mut() = merged;
        self
    }

    /// Drop every datapoint after `year`
    pub fn truncate_after(&mut self, year: f64) -> &mut Self {
        let year = normalize_year(year);
        self.inner.data_mut().retain(|p| p.x <= year);
        self
    }

    pub fn mean_y(&self) -> Option<f64> {
        self.inner.mean_y()
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }
}

impl From<TwoDseries> for Timeseries {
    fn from(series: TwoDseries) -> Self {
        Self::from_series(series)
    }
}

impl<P: Into<Datapoint>> FromIterator<P> for Timeseries {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter)
    }
}
