// gridcompare/src/pipeline/errors.rs

use super::settings::ComparisonSettingsBuilderError;
use crate::compare::CompareError;
use crate::errors::ErrorKind;
use crate::grid::GridError;
use crate::reconcile::ReconcileError;
use crate::vertical::{LevelError, PartitionError, VerticalSegment};
use crate::zonal::ZonalError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Uninitialized field on ComparisonBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("{0} segment requested but the grids have no vertical axis")]
    SegmentWithoutVertical(VerticalSegment),
    #[error(transparent)]
    ComparisonSettingsBuilderError(#[from] ComparisonSettingsBuilderError),
    #[error(transparent)]
    GridError(#[from] GridError),
    #[error(transparent)]
    ReconcileError(#[from] ReconcileError),
    #[error(transparent)]
    LevelError(#[from] LevelError),
    #[error(transparent)]
    PartitionError(#[from] PartitionError),
    #[error(transparent)]
    ZonalError(#[from] ZonalError),
    #[error(transparent)]
    CompareError(#[from] CompareError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::GridError(e) => e.kind(),
            PipelineError::ReconcileError(e) => e.kind(),
            PipelineError::LevelError(e) => e.kind(),
            PipelineError::PartitionError(e) => e.kind(),
            PipelineError::ZonalError(e) => e.kind(),
            PipelineError::CompareError(e) => e.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}
