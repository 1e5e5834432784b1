// gridcompare/src/vertical/errors.rs

use crate::axis::{AxisError, AxisRole, VerticalUnit};
use crate::errors::ErrorKind;
use crate::grid::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LevelError {
    #[error("vertical axis has no finite levels to search")]
    NoLevels,
    #[error("target level must be finite, got {0}")]
    NonFiniteTarget(f64),
    #[error("expected a vertical axis but got a {0} axis")]
    NotVertical(AxisRole),
    #[error("target level {0} lies outside the axis range [{1}, {2}]")]
    OutOfRange(f64, f64, f64),
    #[error("cannot align a {0} vertical axis with a {1} vertical axis")]
    UnitMismatch(VerticalUnit, VerticalUnit),
    #[error("model level index axes of different lengths ({0} and {1}) cannot be matched level by level")]
    IndexLengthMismatch(usize, usize),
    #[error("only one of the two grids has a vertical axis")]
    VerticalPresence,
    #[error("nearest-level matching picked level {0} more than once; the finer grid does not cover the coarser one")]
    DuplicateMatch(usize),
    #[error(transparent)]
    GridError(#[from] GridError),
    #[error(transparent)]
    AxisError(#[from] AxisError),
}

impl LevelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LevelError::UnitMismatch(..) => ErrorKind::AmbiguousConvention,
            LevelError::GridError(e) => e.kind(),
            LevelError::AxisError(e) => e.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}

#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("reference pressure {0} hPa is outside the grid's vertical range [{1}, {2}] hPa")]
    ReferenceOutOfRange(f64, f64, f64),
    #[error("tropopause partitioning needs a pressure axis, got {0}")]
    NotPressure(VerticalUnit),
    #[error("reference pressure must be finite and positive, got {0}")]
    InvalidReference(f64),
    #[error(transparent)]
    LevelError(#[from] LevelError),
    #[error(transparent)]
    GridError(#[from] GridError),
}

impl PartitionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PartitionError::LevelError(e) => e.kind(),
            PartitionError::GridError(e) => e.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}
