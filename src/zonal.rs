// gridcompare/src/zonal.rs

use crate::axis::AxisRole;
use crate::errors::ErrorKind;
use crate::grid::{Grid, GridError};
use log::{debug, trace};
use thiserror::Error;

/// Magnitude at or above which a value is treated as a fill value.
pub const DEFAULT_FILL_THRESHOLD: f64 = 1e9;

/// Averages a field over longitude, skipping missing values.
///
/// NaN entries and entries with magnitude at or above the fill threshold are
/// left out of the mean. A row with nothing left to average comes out NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZonalAverager {
    fill_threshold: f64,
}

impl Default for ZonalAverager {
    fn default() -> Self {
        Self {
            fill_threshold: DEFAULT_FILL_THRESHOLD,
        }
    }
}

impl ZonalAverager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_threshold(&mut self, fill_threshold: f64) -> &mut Self {
        self.fill_threshold = fill_threshold;
        self
    }

    /// (level, lat, lon) -> (level, lat), or (lat, lon) -> (lat).
    pub fn average(&self, grid: &Grid) -> Result<Grid, ZonalError> {
        Self::validate_fill_threshold(self.fill_threshold)?;
        grid.require_axis(AxisRole::Latitude)?;
        let lon = grid.array_axis(AxisRole::Longitude)?;
        let threshold = self.fill_threshold;

        let mut masked = 0usize;
        let mut empty_rows = 0usize;
        let means = grid.data().map_axis(lon, |row| {
            let (sum, count) = row.iter().fold((0., 0usize), |(sum, count), &v| {
                if v.is_nan() || v.abs() >= threshold {
                    (sum, count)
                } else {
                    (sum + v, count + 1)
                }
            });
            masked += row.len() - count;
            if count == 0 {
                empty_rows += 1;
                f64::NAN
            } else {
                sum / count as f64
            }
        });
        if masked > 0 {
            trace!("Excluded {} missing values from zonal mean", masked);
        }
        if empty_rows > 0 {
            debug!("{} zonal rows had no valid values", empty_rows);
        }
        Ok(grid.without_axis(AxisRole::Longitude, means)?)
    }

    fn validate_fill_threshold(fill_threshold: f64) -> Result<(), ZonalError> {
        if !(fill_threshold > 0.) {
            return Err(ZonalError::InvalidFillThreshold(fill_threshold));
        }
        Ok(())
    }
}

/// Zonal mean with the default fill threshold.
pub fn zonal_mean(grid: &Grid) -> Result<Grid, ZonalError> {
    ZonalAverager::default().average(grid)
}

#[derive(Error, Debug)]
pub enum ZonalError {
    #[error("fill threshold must be positive, got {0}")]
    InvalidFillThreshold(f64),
    #[error(transparent)]
    GridError(#[from] GridError),
}

impl ZonalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZonalError::InvalidFillThreshold(_) => ErrorKind::Configuration,
            ZonalError::GridError(e) => e.kind(),
        }
    }
}
