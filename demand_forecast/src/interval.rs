//! Piecewise compound growth over consecutive growth-rate intervals
//!
//! Used for GDP and population projections published as "r % per year between
//! A and B" rather than as point data.

use crate::error::{ForecastError, Result};
use demand_math::{Datapoint, Interval};
use serde::{Deserialize, Serialize};

/// Disjoint growth-rate intervals, ascending by start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalForecast {
    segments: Vec<(Interval, f64)>,
}

impl IntervalForecast {
    /// Create a forecast from `(interval, percentage)` pairs.
    ///
    /// Percentages are stored as fractions and must lie above -100%. Intervals
    /// may touch at their endpoints but must not overlap.
    pub fn new<I>(progression: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Interval, f64)>,
    {
        Self::from_rates(
            progression
                .into_iter()
                .map(|(interval, percentage)| (interval, percentage / 100.0)),
        )
    }

    /// Create a forecast from `(interval, rate)` pairs already expressed as fractions
    pub fn from_rates<I>(rates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Interval, f64)>,
    {
        let mut segments: Vec<(Interval, f64)> = rates.into_iter().collect();
        if let Some((interval, rate)) = segments
            .iter()
            .find(|(_, rate)| !rate.is_finite() || *rate <= -1.0)
        {
            return Err(ForecastError::InvalidParameter(format!(
                "Growth rate over {} must be finite and above -100%, got {}",
                interval, rate
            )));
        }

        segments.sort_by(|(a, _), (b, _)| a.start.total_cmp(&b.start));
        for pair in segments.windows(2) {
            let (previous, next) = (pair[0].0, pair[1].0);
            if next.start < previous.end {
                return Err(ForecastError::OverlappingIntervals(format!(
                    "{} and {}",
                    previous, next
                )));
            }
        }

        Ok(Self { segments })
    }

    /// The `(interval, rate)` segments, rates as fractions
    pub fn segments(&self) -> &[(Interval, f64)] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Keep only the segments that still reach past `x`
    pub fn discard_ending_before(&mut self, x: f64) -> usize {
        let before = self.segments.len();
        self.segments.retain(|(interval, _)| interval.end >= x);
        before - self.segments.len()
    }

    /// Compound `start` forward to `target_x`.
    ///
    /// Each segment contributes `(1 + rate)^overlap`, where `overlap` is the
    /// part of the segment inside `[start.x, target_x]`. Targets at or before
    /// the start yield the start value unchanged.
    pub fn project(&self, start: Datapoint, target_x: f64) -> f64 {
        if target_x <= start.x {
            return start.y;
        }

        self.segments
            .iter()
            .fold(start.y, |value, (interval, rate)| {
                value * (1.0 + rate).powf(interval.overlap(start.x, target_x))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn interval(start: f64, end: f64) -> Interval {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn test_percentages_become_fractions() {
        let forecast = IntervalForecast::new([(interval(2020.0, 2030.0), 1.5)]).unwrap();
        assert_eq!(forecast.segments()[0].1, 0.015);
    }

    #[test]
    fn test_shrinking_past_zero_is_rejected() {
        for percentage in [-150.0, -100.0, f64::NAN] {
            assert!(matches!(
                IntervalForecast::new([(interval(2020.0, 2030.0), percentage)]),
                Err(ForecastError::InvalidParameter(_))
            ));
        }

        let forecast = IntervalForecast::new([(interval(2020.0, 2030.0), -50.0)]).unwrap();
        let value = forecast.project(Datapoint::new(2020.0, 10.0), 2025.5);
        assert_relative_eq!(value, 10.0 * 0.5_f64.powf(5.5), epsilon = 1e-12);
    }

    #[test]
    fn test_overlap_is_rejected() {
        let result = IntervalForecast::new([
            (interval(2020.0, 2030.0), 1.0),
            (interval(2025.0, 2035.0), 1.0),
        ]);
        assert!(matches!(result, Err(ForecastError::OverlappingIntervals(_))));
    }

    #[test]
    fn test_touching_intervals_are_accepted_and_sorted() {
        let forecast = IntervalForecast::new([
            (interval(2030.0, 2040.0), 2.0),
            (interval(2020.0, 2030.0), 1.0),
        ])
        .unwrap();
        assert_eq!(forecast.segments()[0].0.start, 2020.0);
    }

    #[test]
    fn test_target_before_start_returns_start_value() {
        let forecast = IntervalForecast::new([(interval(2000.0, 2100.0), 10.0)]).unwrap();
        let start = Datapoint::new(2020.0, 50.0);
        assert_eq!(forecast.project(start, 2020.0), 50.0);
        assert_eq!(forecast.project(start, 2010.0), 50.0);
    }

    #[test]
    fn test_past_and_future_segments_contribute_nothing() {
        let forecast = IntervalForecast::new([
            (interval(2000.0, 2010.0), 50.0),
            (interval(2020.0, 2030.0), 10.0),
            (interval(2040.0, 2050.0), 50.0),
        ])
        .unwrap();
        let value = forecast.project(Datapoint::new(2015.0, 1.0), 2035.0);
        assert_relative_eq!(value, 1.1_f64.powi(10), epsilon = 1e-12);
    }

    #[test]
    fn test_discard_ending_before() {
        let mut forecast = IntervalForecast::new([
            (interval(2000.0, 2010.0), 1.0),
            (interval(2010.0, 2020.0), 2.0),
            (interval(2020.0, 2030.0), 3.0),
        ])
        .unwrap();
        assert_eq!(forecast.discard_ending_before(2015.0), 1);
        assert_eq!(forecast.segments().len(), 2);
    }
}
