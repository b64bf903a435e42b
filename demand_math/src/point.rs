//! Value types shared by every regression routine

use crate::{MathError, Result};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An (x, y) pair, typically (year, quantity)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub x: f64,
    pub y: f64,
}

impl Datapoint {
    /// Create a new datapoint
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a datapoint from anything coercible to `f64`.
    ///
    /// Returns `None` when either component cannot be represented.
    pub fn from_pair<X: ToPrimitive, Y: ToPrimitive>(x: X, y: Y) -> Option<Self> {
        Some(Self {
            x: x.to_f64()?,
            y: y.to_f64()?,
        })
    }

    /// True if neither component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Datapoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Datapoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A closed range `[start, end]` of x values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    /// Create a new interval, rejecting reversed or non-finite bounds
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Interval bounds must be finite, got [{}, {}]",
                start, end
            )));
        }
        if start > end {
            return Err(MathError::InvalidInput(format!(
                "Interval start {} lies after its end {}",
                start, end
            )));
        }

        Ok(Self { start, end })
    }

    /// Width of the interval
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }

    /// Length of the overlap between this interval and `[from, to]`, clamped at zero
    pub fn overlap(&self, from: f64, to: f64) -> f64 {
        (to.min(self.end) - from.max(self.start)).max(0.0)
    }

    /// Whole years within the interval, ascending
    pub fn years(&self) -> impl Iterator<Item = f64> {
        let first = self.start.ceil() as i64;
        let last = self.end.floor() as i64;
        (first..=last).map(|year| year as f64)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pair_coerces_integers() {
        let point = Datapoint::from_pair(2010_i32, 5_u8).unwrap();
        assert_eq!(point, Datapoint::new(2010.0, 5.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(Datapoint::new(1.0, 2.0).is_finite());
        assert!(!Datapoint::new(f64::NAN, 2.0).is_finite());
        assert!(!Datapoint::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_interval_rejects_reversed_bounds() {
        assert!(Interval::new(2030.0, 2020.0).is_err());
        assert!(Interval::new(f64::NAN, 2020.0).is_err());
    }

    #[test]
    fn test_overlap_clamps_to_zero() {
        let interval = Interval::new(2020.0, 2030.0).unwrap();
        assert_eq!(interval.overlap(2015.0, 2025.0), 5.0);
        assert_eq!(interval.overlap(2031.0, 2040.0), 0.0);
        assert_eq!(interval.overlap(2000.0, 2010.0), 0.0);
        assert_eq!(interval.overlap(2000.0, 2050.0), 10.0);
    }

    #[test]
    fn test_years() {
        let interval = Interval::new(2019.5, 2022.0).unwrap();
        let years: Vec<f64> = interval.years().collect();
        assert_eq!(years, vec![2020.0, 2021.0, 2022.0]);
    }
}
