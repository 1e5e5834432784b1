// gridcompare/src/reconcile/errors.rs

use crate::axis::{AxisError, AxisRole, LongitudeConvention};
use crate::errors::ErrorKind;
use crate::grid::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("longitude axis has no convention flag; cannot tell 0-360 from -180-180")]
    MissingConvention,
    #[error("source longitudes use {0} but target longitudes use {1}; reconcile conventions first")]
    ConventionMismatch(LongitudeConvention, LongitudeConvention),
    #[error("{0} axis is not strictly increasing after normalization: {1:?}")]
    NotMonotonic(AxisRole, Vec<f64>),
    #[error("expected a {0} target axis but got a {1} axis")]
    TargetRoleMismatch(AxisRole, AxisRole),
    #[error(transparent)]
    GridError(#[from] GridError),
    #[error(transparent)]
    AxisError(#[from] AxisError),
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::MissingConvention
            | ReconcileError::ConventionMismatch(..)
            | ReconcileError::NotMonotonic(..) => ErrorKind::AmbiguousConvention,
            ReconcileError::TargetRoleMismatch(..) => ErrorKind::Configuration,
            ReconcileError::GridError(e) => e.kind(),
            ReconcileError::AxisError(e) => e.kind(),
        }
    }
}
