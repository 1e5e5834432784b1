// gridcompare/src/vertical/tropopause.rs

use super::align::orient_vertical;
use super::errors::{LevelError, PartitionError};
use super::locator::locate_level;
use crate::axis::{AxisRole, VerticalDirection, VerticalUnit};
use crate::grid::Grid;
use log::debug;
use std::fmt;

/// Pressure level used as a fixed troposphere/stratosphere boundary.
pub const TROPOPAUSE_PROXY_HPA: f64 = 100.0;

/// Which part of a vertical profile a comparison looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalSegment {
    #[default]
    Full,
    Troposphere,
    Stratosphere,
}

impl fmt::Display for VerticalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalSegment::Full => write!(f, "full"),
            VerticalSegment::Troposphere => write!(f, "troposphere"),
            VerticalSegment::Stratosphere => write!(f, "stratosphere"),
        }
    }
}

/// The two halves of a profile split at the tropopause proxy level.
///
/// The boundary level appears in both segments. Segments keep the storage
/// order of the grid they were cut from.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    troposphere: Grid,
    stratosphere: Grid,
    boundary_index: usize,
    boundary_pressure: f64,
}

impl Partition {
    pub fn troposphere(&self) -> &Grid {
        &self.troposphere
    }

    pub fn stratosphere(&self) -> &Grid {
        &self.stratosphere
    }

    /// Index of the boundary level in the partitioned grid's storage order.
    pub fn boundary_index(&self) -> usize {
        self.boundary_index
    }

    pub fn boundary_pressure(&self) -> f64 {
        self.boundary_pressure
    }

    pub fn into_parts(self) -> (Grid, Grid) {
        (self.troposphere, self.stratosphere)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TropopausePartitioner {
    reference_hpa: f64,
}

impl Default for TropopausePartitioner {
    fn default() -> Self {
        Self {
            reference_hpa: TROPOPAUSE_PROXY_HPA,
        }
    }
}

impl TropopausePartitioner {
    pub fn new(reference_hpa: f64) -> Self {
        Self { reference_hpa }
    }

    pub fn reference_hpa(&self) -> f64 {
        self.reference_hpa
    }

    /// Split a pressure-level grid at the level nearest the reference.
    ///
    /// The troposphere runs from the boundary down to the surface-most level,
    /// the stratosphere from the top-most level down to the boundary. A
    /// reference outside the axis range means the model grid never reaches
    /// it and is reported rather than snapped to an end level.
    pub fn partition(&self, grid: &Grid) -> Result<Partition, PartitionError> {
        if !self.reference_hpa.is_finite() || self.reference_hpa <= 0. {
            return Err(PartitionError::InvalidReference(self.reference_hpa));
        }
        let axis = grid.require_axis(AxisRole::Vertical)?;
        let (unit, direction) = match (axis.vertical_unit(), axis.vertical_direction()) {
            (Some(unit), Some(direction)) => (unit, direction),
            _ => return Err(LevelError::NotVertical(axis.role()).into()),
        };
        if unit != VerticalUnit::PressureHpa {
            return Err(PartitionError::NotPressure(unit));
        }
        if !axis.contains(self.reference_hpa) {
            return Err(PartitionError::ReferenceOutOfRange(
                self.reference_hpa,
                axis.min(),
                axis.max(),
            ));
        }
        let boundary = locate_level(axis, self.reference_hpa)?;
        let len = axis.len();
        let (troposphere, stratosphere): (Vec<usize>, Vec<usize>) = match direction {
            VerticalDirection::SurfaceFirst => {
                ((0..=boundary).collect(), (boundary..len).collect())
            }
            VerticalDirection::TopFirst => ((boundary..len).collect(), (0..=boundary).collect()),
        };
        let boundary_pressure = axis.values()[boundary];
        debug!(
            "Split {} at level {} ({} hPa): {} tropospheric, {} stratospheric levels",
            grid,
            boundary,
            boundary_pressure,
            troposphere.len(),
            stratosphere.len()
        );
        Ok(Partition {
            troposphere: grid.select(AxisRole::Vertical, &troposphere)?,
            stratosphere: grid.select(AxisRole::Vertical, &stratosphere)?,
            boundary_index: boundary,
            boundary_pressure,
        })
    }

    /// Partition two grids so that every segment runs in `direction`.
    pub fn partition_pair(
        &self,
        a: &Grid,
        b: &Grid,
        direction: VerticalDirection,
    ) -> Result<(Partition, Partition), PartitionError> {
        let a = orient_vertical(a, direction)?;
        let b = orient_vertical(b, direction)?;
        Ok((self.partition(&a)?, self.partition(&b)?))
    }
}
