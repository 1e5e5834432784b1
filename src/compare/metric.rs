// gridcompare/src/compare/metric.rs

use super::errors::CompareError;
use log::trace;
use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use ndarray_stats::QuantileExt;
use std::fmt;
use std::str::FromStr;

/// Ratio when both inputs are exactly zero: "no change".
const RATIO_BOTH_ZERO: f64 = 1.0;
/// Ratio when only the denominator is zero and the numerator is positive.
const RATIO_SATURATED_HIGH: f64 = 1.5;
/// Ratio when only the denominator is zero and the numerator is negative.
const RATIO_SATURATED_LOW: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ComparisonKind {
    Ratio,
    PercentDifference,
    #[default]
    AbsoluteDifference,
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonKind::Ratio => write!(f, "ratio"),
            ComparisonKind::PercentDifference => write!(f, "percent_difference"),
            ComparisonKind::AbsoluteDifference => write!(f, "absolute_difference"),
        }
    }
}

impl FromStr for ComparisonKind {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ratio" => Ok(ComparisonKind::Ratio),
            "percent_difference" | "percent" => Ok(ComparisonKind::PercentDifference),
            "absolute_difference" | "difference" | "diff" => Ok(ComparisonKind::AbsoluteDifference),
            other => Err(CompareError::UnknownKind(other.to_string())),
        }
    }
}

/// Pointwise comparison of two equally shaped arrays.
///
/// Returns `(low, high, result)` where `low`/`high` are the finite bounds
/// actually present in `result` (NaN entries, which mark missing inputs, are
/// ignored). For `AbsoluteDifference` the bounds are widened to be
/// symmetric about zero. If nothing finite remains the bounds are `(0, 0)`.
///
/// Degenerate positions get fixed values rather than non-finite ones:
/// `Ratio` gives 1.0 for 0/0, 1.5 for positive/0 and 0.5 for negative/0;
/// `PercentDifference` gives 0 wherever the formula is not finite.
pub fn compare_arrays<S1, S2, D>(
    a: &ArrayBase<S1, D>,
    b: &ArrayBase<S2, D>,
    kind: ComparisonKind,
) -> Result<(f64, f64, Array<f64, D>), CompareError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    if a.shape() != b.shape() {
        return Err(CompareError::ShapeMismatch(
            a.shape().to_vec(),
            b.shape().to_vec(),
        ));
    }

    let mut substituted = 0usize;
    let result = match kind {
        ComparisonKind::Ratio => Zip::from(a).and(b).map_collect(|&x, &y| {
            let (value, fixed) = ratio(x, y);
            substituted += fixed as usize;
            value
        }),
        ComparisonKind::PercentDifference => Zip::from(a).and(b).map_collect(|&x, &y| {
            let (value, fixed) = percent_difference(x, y);
            substituted += fixed as usize;
            value
        }),
        ComparisonKind::AbsoluteDifference => Zip::from(a).and(b).map_collect(|&x, &y| x - y),
    };
    if substituted > 0 {
        trace!(
            "{} of {} positions took a fixed {} value",
            substituted,
            result.len(),
            kind
        );
    }

    let (low, high) = realized_bounds(&result);
    let (low, high) = match kind {
        ComparisonKind::AbsoluteDifference => {
            let extent = low.abs().max(high.abs());
            (-extent, extent)
        }
        _ => (low, high),
    };
    Ok((low, high, result))
}

/// `(value, substituted)` for one ratio position.
fn ratio(a: f64, b: f64) -> (f64, bool) {
    if a.is_nan() || b.is_nan() {
        return (f64::NAN, false);
    }
    if b == 0. {
        let fixed = if a == 0. {
            RATIO_BOTH_ZERO
        } else if a > 0. {
            RATIO_SATURATED_HIGH
        } else {
            RATIO_SATURATED_LOW
        };
        return (fixed, true);
    }
    (a / b, false)
}

/// `(value, substituted)` for one percent-difference position.
fn percent_difference(a: f64, b: f64) -> (f64, bool) {
    if a.is_nan() || b.is_nan() {
        return (f64::NAN, false);
    }
    let value = (a - b).abs() / ((a + b) / 2.) * 100.;
    if value.is_finite() {
        (value, false)
    } else {
        (0., true)
    }
}

fn realized_bounds<S, D>(result: &ArrayBase<S, D>) -> (f64, f64)
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let low = *result.min_skipnan();
    let high = *result.max_skipnan();
    if low.is_finite() && high.is_finite() {
        return (low, high);
    }
    let (low, high) = result
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if low <= high {
        (low, high)
    } else {
        (0., 0.)
    }
}
