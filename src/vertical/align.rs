// gridcompare/src/vertical/align.rs

use super::errors::LevelError;
use super::locator::nearest_levels;
use crate::axis::{AxisRole, VerticalDirection, VerticalUnit};
use crate::grid::Grid;
use log::debug;

/// Re-lay out `grid` so its vertical axis runs in `direction`.
pub fn orient_vertical(grid: &Grid, direction: VerticalDirection) -> Result<Grid, LevelError> {
    let axis = grid.require_axis(AxisRole::Vertical)?;
    if axis.vertical_direction() == Some(direction) {
        return Ok(grid.clone());
    }
    debug!("Reversing vertical axis of {} to {}", grid, direction);
    Ok(grid.reversed_along(AxisRole::Vertical)?)
}

/// Put two grids on matching vertical levels.
///
/// `b` is first oriented to `a`'s direction. Equal level counts are paired
/// by position, even when the pressures differ. When the level counts differ,
/// the grid with more levels keeps only the level nearest to each level of
/// the other one. Both grids must use the same vertical unit, and level
/// index axes must already have the same length. Grids without a vertical
/// axis pass through untouched.
pub fn align_vertical(a: &Grid, b: &Grid) -> Result<(Grid, Grid), LevelError> {
    let (va, vb) = match (a.axis(AxisRole::Vertical), b.axis(AxisRole::Vertical)) {
        (None, None) => return Ok((a.clone(), b.clone())),
        (Some(va), Some(vb)) => (va, vb),
        _ => return Err(LevelError::VerticalPresence),
    };
    let (unit_a, unit_b) = match (va.vertical_unit(), vb.vertical_unit()) {
        (Some(ua), Some(ub)) => (ua, ub),
        _ => return Err(LevelError::NotVertical(AxisRole::Vertical)),
    };
    if unit_a != unit_b {
        return Err(LevelError::UnitMismatch(unit_a, unit_b));
    }
    let direction = va
        .vertical_direction()
        .ok_or(LevelError::NotVertical(AxisRole::Vertical))?;
    let b = orient_vertical(b, direction)?;
    if va.len() == vb.len() {
        let oriented = b.require_axis(AxisRole::Vertical)?;
        if unit_a == VerticalUnit::PressureHpa && oriented.values() != va.values() {
            debug!(
                "Pairing {} pressure levels by position: {:?} against {:?}",
                va.len(),
                va.to_vec(),
                oriented.to_vec()
            );
        }
        return Ok((a.clone(), b));
    }
    if unit_a == VerticalUnit::ModelLevelIndex {
        return Err(LevelError::IndexLengthMismatch(va.len(), vb.len()));
    }

    if va.len() < vb.len() {
        let b = subsample_levels(&b, a)?;
        Ok((a.clone(), b))
    } else {
        let a = subsample_levels(a, &b)?;
        Ok((a, b))
    }
}

/// Keep the levels of `fine` nearest to each level of `coarse`.
fn subsample_levels(fine: &Grid, coarse: &Grid) -> Result<Grid, LevelError> {
    let fine_levels = fine.require_axis(AxisRole::Vertical)?.to_vec();
    let coarse_levels = coarse.require_axis(AxisRole::Vertical)?.to_vec();
    let indices = nearest_levels(&fine_levels, &coarse_levels)?;
    if let Some(pair) = indices.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(LevelError::DuplicateMatch(pair[0]));
    }
    debug!(
        "Matched {} of {} levels onto {}: {:?}",
        indices.len(),
        fine_levels.len(),
        coarse,
        indices
    );
    Ok(fine.select(AxisRole::Vertical, &indices)?)
}
