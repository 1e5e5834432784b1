// gridcompare/src/vertical/locator.rs

use super::errors::LevelError;
use crate::axis::{AxisRole, CoordinateAxis};

/// Index of the entry in `levels` closest to `target`.
///
/// Closeness is the plain absolute difference. Ties go to the earliest index
/// in storage order; the array is never reversed here, so a caller that
/// needs "nearest from the top" on a surface-first axis must reverse it
/// first. Non-finite entries are skipped.
pub fn find_level_from_array(levels: &[f64], target: f64) -> Result<usize, LevelError> {
    if !target.is_finite() {
        return Err(LevelError::NonFiniteTarget(target));
    }
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in levels.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let distance = (value - target).abs();
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index).ok_or(LevelError::NoLevels)
}

/// Like [`find_level_from_array`] on a vertical axis, but a target outside
/// the axis range is an error instead of snapping to the end level.
pub fn locate_level(axis: &CoordinateAxis, target: f64) -> Result<usize, LevelError> {
    if axis.role() != AxisRole::Vertical {
        return Err(LevelError::NotVertical(axis.role()));
    }
    if !target.is_finite() {
        return Err(LevelError::NonFiniteTarget(target));
    }
    if !axis.contains(target) {
        return Err(LevelError::OutOfRange(target, axis.min(), axis.max()));
    }
    find_level_from_array(&axis.to_vec(), target)
}

/// Nearest index in `levels` for each of `targets`.
pub fn nearest_levels(levels: &[f64], targets: &[f64]) -> Result<Vec<usize>, LevelError> {
    targets
        .iter()
        .map(|&target| find_level_from_array(levels, target))
        .collect()
}
