// gridcompare/src/compare/errors.rs

use crate::axis::AxisRole;
use crate::errors::ErrorKind;
use crate::grid::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("cannot compare fields of shape {0:?} and {1:?}; reconcile them first")]
    ShapeMismatch(Vec<usize>, Vec<usize>),
    #[error("cannot compare fields laid out as {0:?} and {1:?}")]
    LayoutMismatch(Vec<AxisRole>, Vec<AxisRole>),
    #[error("unknown comparison kind: {0}")]
    UnknownKind(String),
    #[error(transparent)]
    GridError(#[from] GridError),
}

impl CompareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompareError::GridError(e) => e.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}
