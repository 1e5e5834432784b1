// gridcompare/src/reconcile/longitude.rs

use super::errors::ReconcileError;
use crate::axis::{is_strictly_increasing, AxisRole, CoordinateAxis, LongitudeConvention};
use crate::grid::Grid;
use log::debug;

/// Number of positions an axis of `len` points is rotated left by when it is
/// moved onto `target`.
///
/// The split sits at the midpoint. For odd lengths the eastern half
/// (0 <= lon < 180) keeps the extra point, so 0-360 -> signed rotates by
/// `ceil(len / 2)` and signed -> 0-360 by `floor(len / 2)`. The two offsets
/// always sum to `len`, which makes the pair exact inverses.
pub fn rotation_offset(len: usize, target: LongitudeConvention) -> usize {
    match target {
        LongitudeConvention::Signed180 => (len + 1) / 2,
        LongitudeConvention::ZeroTo360 => len / 2,
    }
}

/// Rewrite `grid` so its longitude axis uses `target`.
///
/// Data and axis are rotated together by [`rotation_offset`] and the axis
/// values are wrapped into the target range (values >= 180 become negative
/// going to signed, negative values gain 360 going back). A grid already on
/// `target` is returned unchanged.
pub fn reconcile_longitude(
    grid: &Grid,
    target: LongitudeConvention,
) -> Result<Grid, ReconcileError> {
    let axis = grid.require_axis(AxisRole::Longitude)?;
    let source = axis
        .longitude_convention()
        .ok_or(ReconcileError::MissingConvention)?;
    if source == target {
        return Ok(grid.clone());
    }

    let len = axis.len();
    let offset = rotation_offset(len, target);
    let order: Vec<usize> = (0..len).map(|i| (i + offset) % len).collect();
    let values: Vec<f64> = order
        .iter()
        .map(|&i| wrap_longitude(axis.values()[i], target))
        .collect();
    if !is_strictly_increasing(values.iter().cloned()) {
        return Err(ReconcileError::NotMonotonic(AxisRole::Longitude, values));
    }
    debug!(
        "Rotated {} longitudes by {} from {} to {}",
        len, offset, source, target
    );

    let rotated = CoordinateAxis::longitude(values, Some(target))?;
    let data = grid
        .data()
        .select(grid.array_axis(AxisRole::Longitude)?, &order);
    Ok(grid.with_axis_data(rotated, data)?)
}

fn wrap_longitude(value: f64, target: LongitudeConvention) -> f64 {
    match target {
        LongitudeConvention::Signed180 if value >= 180. => value - 360.,
        LongitudeConvention::ZeroTo360 if value < 0. => value + 360.,
        _ => value,
    }
}
