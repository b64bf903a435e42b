//! Two-dimensional (x, y) series with lazily fitted coefficients
//!
//! Construction drops every pair whose x or y is NaN or infinite instead of
//! failing; the number of dropped pairs is kept for inspection.
//!
//! Coefficients are fitted on the first call to [`TwoDseries::get_coef`] and
//! memoized. Mutating methods (`add`, `divide_by`, `scale`, `map_y`) do **not**
//! invalidate the memo; call [`TwoDseries::generate_coef`] to refit.

use crate::coefficients::{Coefficients, Method};
use crate::error::{ForecastError, Result};
use demand_math::Datapoint;
use num_traits::ToPrimitive;
use statrs::statistics::Statistics;
use std::cell::OnceCell;
use std::collections::HashMap;
use tracing::debug;

/// An (x, y) dataset without ordering guarantees
#[derive(Debug, Clone, Default)]
pub struct TwoDseries {
    data: Vec<Datapoint>,
    dropped: usize,
    coef: OnceCell<Coefficients>,
}

impl TwoDseries {
    /// Create a series from raw points, dropping NaN/Inf pairs
    pub fn new<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Datapoint>,
    {
        let mut dropped = 0;
        let data: Vec<Datapoint> = points
            .into_iter()
            .map(Into::into)
            .filter(|p: &Datapoint| {
                let keep = p.is_finite();
                dropped += usize::from(!keep);
                keep
            })
            .collect();

        Self::from_clean(data, dropped)
    }

    /// Create a series from pairs coercible to `f64`.
    ///
    /// Pairs that cannot be represented count as dropped, like NaN/Inf pairs.
    pub fn from_pairs<X, Y, I>(pairs: I) -> Self
    where
        X: ToPrimitive,
        Y: ToPrimitive,
        I: IntoIterator<Item = (X, Y)>,
    {
        let mut unconvertible = 0;
        let points: Vec<Datapoint> = pairs
            .into_iter()
            .filter_map(|(x, y)| {
                let point = Datapoint::from_pair(x, y);
                unconvertible += usize::from(point.is_none());
                point
            })
            .collect();

        let mut series = Self::new(points);
        series.dropped += unconvertible;
        series
    }

    pub(crate) fn from_clean(data: Vec<Datapoint>, dropped: usize) -> Self {
        if dropped > 0 {
            debug!(dropped, kept = data.len(), "dropped non-finite datapoints");
        }

        Self {
            data,
            dropped,
            coef: OnceCell::new(),
        }
    }

    pub fn data(&self) -> &[Datapoint] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut Vec<Datapoint> {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of non-finite pairs filtered out, at construction or on insertion
    pub fn dropped_points(&self) -> usize {
        self.dropped
    }

    pub(crate) fn record_dropped(&mut self) {
        self.dropped += 1;
        debug!(dropped = self.dropped, "dropped non-finite datapoint");
    }

    pub fn xs(&self) -> Vec<f64> {
        self.data.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.data.iter().map(|p| p.y).collect()
    }

    /// Memoized coefficients, fitted on first access
    pub fn get_coef(&self) -> &Coefficients {
        self.coef.get_or_init(|| Coefficients::fit(&self.data))
    }

    /// Mutable access to the memoized coefficients, fitting them first if needed
    pub fn get_coef_mut(&mut self) -> &mut Coefficients {
        if self.coef.get().is_none() {
            self.generate_coef();
        }
        match self.coef.get_mut() {
            Some(coef) => coef,
            None => unreachable!("coefficients are generated above"),
        }
    }

    /// Refit every family from the current data, replacing the memo
    pub fn generate_coef(&mut self) -> &Coefficients {
        self.coef = OnceCell::from(Coefficients::fit(&self.data));
        self.get_coef()
    }

    /// Whether the coefficients have been fitted yet
    pub fn has_coef(&self) -> bool {
        self.coef.get().is_some()
    }

    /// Select the forecast method on the memoized coefficients
    pub fn set_method(&mut self, method: Method, fixate: bool) -> &mut Self {
        self.get_coef_mut().set_method(method, fixate);
        self
    }

    /// Value at exactly `x`
    pub fn get_value(&self, x: f64) -> Result<f64> {
        self.data
            .iter()
            .find(|p| p.x == x)
            .map(|p| p.y)
            .ok_or(ForecastError::NotFound { x })
    }

    /// Value at exactly `x`, or 0.0 when `x` is absent
    pub fn get_value_or_zero(&self, x: f64) -> f64 {
        self.get_value(x).unwrap_or(0.0)
    }

    /// Add `other` pairwise, keeping only the x values present in both
    pub fn add(&mut self, other: &TwoDseries) -> &mut Self {
        let lookup = index_by_x(&other.data);
        self.data.retain_mut(|p| match lookup.get(&x_key(p.x)) {
            Some(&y) => {
                p.y += y;
                true
            }
            None => false,
        });
        self
    }

    /// Divide pairwise by `other` on shared x values, dropping zero divisors
    pub fn divide_by(&mut self, other: &TwoDseries) -> &mut Self {
        let lookup = index_by_x(&other.data);
        self.data.retain_mut(|p| match lookup.get(&x_key(p.x)) {
            Some(&divisor) if divisor != 0.0 => {
                p.y /= divisor;
                true
            }
            _ => false,
        });
        self
    }

    /// Multiply every y by `factor`
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.map_y(|y| y * factor)
    }

    /// Replace every y with `f(y)`
    pub fn map_y(&mut self, f: impl Fn(f64) -> f64) -> &mut Self {
        for p in &mut self.data {
            p.y = f(p.y);
        }
        self
    }

    pub fn mean_y(&self) -> Option<f64> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().map(|p| p.y).mean())
    }

    /// True if the series is empty or every y is zero
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|p| p.y == 0.0)
    }
}

/// Exact-equality key for an x value; `-0.0` and `0.0` share a key
fn x_key(x: f64) -> u64 {
    if x == 0.0 {
        0.0_f64.to_bits()
    } else {
        x.to_bits()
    }
}

fn index_by_x(points: &[Datapoint]) -> HashMap<u64, f64> {
    points.iter().map(|p| (x_key(p.x), p.y)).collect()
}

impl<P: Into<Datapoint>> FromIterator<P> for TwoDseries {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_construction_drops_non_finite_pairs() {
        let series = TwoDseries::new([
            (1.0, 2.0),
            (f64::NAN, 3.0),
            (2.0, f64::INFINITY),
            (3.0, 4.0),
            (f64::NEG_INFINITY, 1.0),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.dropped_points(), 3);
        assert_eq!(series.xs(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_from_pairs_coerces() {
        let series = TwoDseries::from_pairs([(1_u32, 10_i64), (2, 20)]);
        assert_eq!(series.ys(), vec![10.0, 20.0]);
        assert_eq!(series.dropped_points(), 0);
    }

    #[test]
    fn test_add_is_an_inner_join() {
        let mut a = TwoDseries::new([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let b = TwoDseries::new([(2.0, 10.0), (3.0, 20.0), (4.0, 30.0)]);

        a.add(&b);
        assert_eq!(a.data(), &[Datapoint::new(2.0, 12.0), Datapoint::new(3.0, 23.0)]);
    }

    #[test]
    fn test_divide_by_drops_zero_divisors() {
        let mut a = TwoDseries::new([(1.0, 4.0), (2.0, 6.0), (3.0, 9.0)]);
        let b = TwoDseries::new([(1.0, 2.0), (2.0, 0.0), (3.0, 3.0)]);

        a.divide_by(&b);
        assert_eq!(a.data(), &[Datapoint::new(1.0, 2.0), Datapoint::new(3.0, 3.0)]);
    }

    #[test]
    fn test_chained_mutation() {
        let mut a = TwoDseries::new([(1.0, 1.0), (2.0, 2.0)]);
        let b = TwoDseries::new([(1.0, 1.0), (2.0, 1.0)]);

        a.add(&b).scale(10.0);
        assert_eq!(a.ys(), vec![20.0, 30.0]);
    }

    #[test]
    fn test_lookup_variants() {
        let series = TwoDseries::new([(0.5, 7.0)]);
        assert_eq!(series.get_value(0.5).unwrap(), 7.0);
        assert!(matches!(series.get_value(1.0), Err(ForecastError::NotFound { .. })));
        assert_eq!(series.get_value_or_zero(1.0), 0.0);
    }

    #[test]
    fn test_coefficients_are_lazy() {
        let mut series = TwoDseries::new([(1.0, 1.0), (2.0, 2.0)]);
        assert!(!series.has_coef());

        series.get_coef();
        assert!(series.has_coef());

        series.set_method(Method::Linear, false);
        assert_eq!(series.get_coef().get_value(3.0).unwrap(), 3.0);
    }

    #[test]
    fn test_mean_and_zero() {
        assert_eq!(TwoDseries::default().mean_y(), None);
        assert!(TwoDseries::default().is_zero());

        let series = TwoDseries::new([(1.0, 1.0), (2.0, 3.0)]);
        assert_eq!(series.mean_y(), Some(2.0));
        assert!(!series.is_zero());
    }
}
