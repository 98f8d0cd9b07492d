use foundation::IndicatorName;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::Observation;

/// Closed `[min, max]` range of an indicator over some subset.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Fallback range for subsets without data.
    pub const UNIT: Extent = Extent { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Extent over the non-absent values of `indicator` in `subset`.
    pub fn of<'a>(
        indicator: &str,
        subset: impl IntoIterator<Item = &'a Observation>,
    ) -> Result<Extent, StoreError> {
        let values: Vec<f64> = subset
            .into_iter()
            .filter_map(|o| o.value(indicator))
            .collect();
        let (min, max) =
            Statistics::min_max(&values).ok_or_else(|| StoreError::EmptyExtent {
                indicator: IndicatorName::new(indicator),
            })?;
        Ok(Extent { min, max })
    }

    /// Maps `v` into `[0, 1]`.
    ///
    /// A degenerate extent (`min == max`) maps every value to the midpoint.
    /// `None` when `v` or the result is not finite, e.g. a span that
    /// overflowed to infinity.
    pub fn normalize(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return Some(0.5);
        }
        let t = (v - self.min) / span;
        t.is_finite().then(|| t.clamp(0.0, 1.0))
    }
}

pub struct Statistics;

impl Statistics {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        // Running mean; a plain sum overflows for values near f64::MAX.
        let mut mean = 0.0;
        for (i, &v) in values.iter().enumerate() {
            mean += (v - mean) / (i + 1) as f64;
        }
        Some(mean)
    }

    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let first = *values.first()?;
        let mut min = first;
        let mut max = first;
        for &v in values.iter().skip(1) {
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::{Extent, Statistics};
    use crate::error::StoreError;
    use crate::record::Observation;
    use foundation::{EntityId, IndicatorName, Year};

    fn obs(entity: &str, year: i32, pol: Option<f64>) -> Observation {
        let mut o = Observation::new(EntityId::new(entity), Year(year));
        o.indicators.insert(IndicatorName::new("pol"), pol);
        o
    }

    #[test]
    fn mean_works() {
        let m = Statistics::mean(&[1.0, 2.0, 3.0]).unwrap();
        assert!((m - 2.0).abs() < 1e-9);
        assert_eq!(Statistics::mean(&[]), None);
    }

    #[test]
    fn extent_skips_absent_values() {
        let subset = [obs("A", 2014, Some(5.0)), obs("B", 2014, None), obs("C", 2014, Some(-1.0))];
        let e = Extent::of("pol", &subset).unwrap();
        assert_eq!(e, Extent::new(-1.0, 5.0));
    }

    #[test]
    fn extent_without_values_is_an_error() {
        let subset = [obs("A", 2014, None)];
        let err = Extent::of("pol", &subset).unwrap_err();
        assert_eq!(
            err,
            StoreError::EmptyExtent {
                indicator: IndicatorName::new("pol")
            }
        );
        let none: [Observation; 0] = [];
        assert_eq!(Extent::of("pol", &none).unwrap_err(), err);
    }

    #[test]
    fn normalize_clamps_and_handles_degenerate_range() {
        let e = Extent::new(10.0, 20.0);
        assert_eq!(e.normalize(15.0), Some(0.5));
        assert_eq!(e.normalize(10.0), Some(0.0));
        assert_eq!(e.normalize(25.0), Some(1.0));

        let flat = Extent::new(3.0, 3.0);
        assert_eq!(flat.normalize(3.0), Some(0.5));
    }

    #[test]
    fn normalize_refuses_non_finite_results() {
        let e = Extent::new(0.0, 1.0);
        assert_eq!(e.normalize(f64::INFINITY), None);
        assert_eq!(e.normalize(f64::NAN), None);

        let huge = Extent::new(-f64::MAX, f64::MAX);
        assert_eq!(huge.normalize(f64::MAX), None);
        assert_eq!(huge.normalize(-f64::MAX), Some(0.0));
    }

    #[test]
    fn mean_of_huge_values_stays_finite() {
        let m = Statistics::mean(&[f64::MAX, f64::MAX]).unwrap();
        assert_eq!(m, f64::MAX);
    }
}
