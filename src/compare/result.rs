// gridcompare/src/compare/result.rs

use super::errors::CompareError;
use super::metric::{compare_arrays, ComparisonKind};
use crate::grid::{Field, Grid};
use log::debug;
use ndarray::ArrayD;
use std::fmt;

/// Metric field handed to the renderer, with the colour-scale bounds it
/// actually spans.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonResult {
    grid: Grid,
    kind: ComparisonKind,
    low: f64,
    high: f64,
}

impl ComparisonResult {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn data(&self) -> &ArrayD<f64> {
        self.grid.data()
    }

    pub fn kind(&self) -> ComparisonKind {
        self.kind
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} spanning [{}, {}]",
            self.kind, self.grid, self.low, self.high
        )
    }
}

/// Compare two reconciled grids. The result carries `a`'s coordinates.
///
/// Both grids must already share shape and dimension layout; nothing is
/// computed otherwise.
pub fn compare(a: &Grid, b: &Grid, kind: ComparisonKind) -> Result<ComparisonResult, CompareError> {
    if a.shape() != b.shape() {
        return Err(CompareError::ShapeMismatch(
            a.shape().to_vec(),
            b.shape().to_vec(),
        ));
    }
    if a.dims() != b.dims() {
        return Err(CompareError::LayoutMismatch(
            a.dims().to_vec(),
            b.dims().to_vec(),
        ));
    }
    let (low, high, data) = compare_arrays(a.data(), b.data(), kind)?;
    let grid = Grid::new(Field::new(data, a.dims().to_vec())?, a.axes().to_vec())?;
    debug!("Computed {} on {}: [{}, {}]", kind, grid, low, high);
    Ok(ComparisonResult {
        grid,
        kind,
        low,
        high,
    })
}
