// gridcompare/src/reconcile/horizontal.rs

use super::errors::ReconcileError;
use crate::axis::{is_strictly_increasing, AxisRole, CoordinateAxis};
use crate::grid::Grid;
use log::{debug, trace};
use ndarray::{ArrayD, Axis, IxDyn, Zip};

/// Linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be strictly increasing. Points outside `[xp[0], xp[n-1]]` take
/// the nearest end value instead of being extrapolated. An empty table or a
/// NaN `x` yields NaN.
pub fn interp1d(xp: &[f64], fp: &[f64], x: f64) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 || x.is_nan() {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    let upper = xp[..n].partition_point(|&v| v <= x);
    let lower = upper - 1;
    let t = (x - xp[lower]) / (xp[upper] - xp[lower]);
    if t == 0. {
        return fp[lower];
    }
    fp[lower] + (fp[upper] - fp[lower]) * t
}

/// How a source axis is laid out for interpolation: the increasing abscissa,
/// the storage index each abscissa came from, and where to evaluate.
struct SourceLayout {
    xp: Vec<f64>,
    order: Vec<usize>,
    targets: Vec<f64>,
}

/// Interpolate every longitude row of `grid` onto `target`.
///
/// Both axes must carry the same convention. A source axis that wraps (e.g.
/// `[180, 270, 0, 90]`) is shifted by +180 and taken modulo 360, together
/// with the target, so the interpolation never straddles the seam.
pub fn interpolate_longitude(
    grid: &Grid,
    target: &CoordinateAxis,
) -> Result<Grid, ReconcileError> {
    expect_role(target, AxisRole::Longitude)?;
    let source = grid.require_axis(AxisRole::Longitude)?;
    let layout = longitude_layout(source, target)?;
    let data = interpolate_along(grid.data(), grid.array_axis(AxisRole::Longitude)?, &layout);
    debug!(
        "Interpolated {} longitudes onto {} for {}",
        source.len(),
        target.len(),
        grid
    );
    Ok(grid.with_axis_data(target.clone(), data)?)
}

/// Interpolate every latitude column of `grid` onto `target`.
/// Descending source latitudes (north to south) are accepted.
pub fn interpolate_latitude(
    grid: &Grid,
    target: &CoordinateAxis,
) -> Result<Grid, ReconcileError> {
    expect_role(target, AxisRole::Latitude)?;
    let source = grid.require_axis(AxisRole::Latitude)?;
    let layout = latitude_layout(source, target)?;
    let data = interpolate_along(grid.data(), grid.array_axis(AxisRole::Latitude)?, &layout);
    debug!(
        "Interpolated {} latitudes onto {} for {}",
        source.len(),
        target.len(),
        grid
    );
    Ok(grid.with_axis_data(target.clone(), data)?)
}

/// Bring `grid` onto the horizontal axes of another grid.
///
/// Longitude is interpolated whenever the two longitude axes differ. Latitude
/// is only interpolated when the axis lengths differ; equal-length latitude
/// axes are taken to be the same grid, reversed if stored in the opposite
/// order. When both run, longitude is resolved
/// first on the original latitude rows, then latitude on the resolved
/// longitude columns.
pub fn regrid_horizontal(
    grid: &Grid,
    target_latitude: &CoordinateAxis,
    target_longitude: &CoordinateAxis,
) -> Result<Grid, ReconcileError> {
    expect_role(target_latitude, AxisRole::Latitude)?;
    let source_longitude = grid.require_axis(AxisRole::Longitude)?;
    let mut regridded = if source_longitude.values() != target_longitude.values() {
        interpolate_longitude(grid, target_longitude)?
    } else {
        trace!("Longitude axes already match for {}", grid);
        grid.clone()
    };
    let source_latitude = regridded.require_axis(AxisRole::Latitude)?;
    if source_latitude.len() != target_latitude.len() {
        regridded = interpolate_latitude(&regridded, target_latitude)?;
    } else if source_latitude.is_strictly_increasing()
        != target_latitude.is_strictly_increasing()
    {
        debug!("Reversing latitude rows of {} to match the target order", regridded);
        regridded = regridded.reversed_along(AxisRole::Latitude)?;
    }
    Ok(regridded)
}

fn expect_role(axis: &CoordinateAxis, role: AxisRole) -> Result<(), ReconcileError> {
    if axis.role() != role {
        return Err(ReconcileError::TargetRoleMismatch(role, axis.role()));
    }
    Ok(())
}

fn longitude_layout(
    source: &CoordinateAxis,
    target: &CoordinateAxis,
) -> Result<SourceLayout, ReconcileError> {
    let source_convention = source
        .longitude_convention()
        .ok_or(ReconcileError::MissingConvention)?;
    let target_convention = target
        .longitude_convention()
        .ok_or(ReconcileError::MissingConvention)?;
    if source_convention != target_convention {
        return Err(ReconcileError::ConventionMismatch(
            source_convention,
            target_convention,
        ));
    }
    if source.is_strictly_increasing() {
        return Ok(SourceLayout {
            xp: source.to_vec(),
            order: (0..source.len()).collect(),
            targets: target.to_vec(),
        });
    }

    let plus180 = |v: &f64| (v + 180.).rem_euclid(360.);
    let shifted: Vec<f64> = source.values().iter().map(plus180).collect();
    let start = shifted
        .iter()
        .enumerate()
        .fold(0, |best, (i, v)| if *v < shifted[best] { i } else { best });
    let len = shifted.len();
    let order: Vec<usize> = (0..len).map(|i| (i + start) % len).collect();
    let xp: Vec<f64> = order.iter().map(|&i| shifted[i]).collect();
    if !is_strictly_increasing(xp.iter().cloned()) {
        return Err(ReconcileError::NotMonotonic(AxisRole::Longitude, xp));
    }
    trace!("Wrapped longitude axis unrolled starting at index {}", start);
    Ok(SourceLayout {
        xp,
        order,
        targets: target.values().iter().map(plus180).collect(),
    })
}

fn latitude_layout(
    source: &CoordinateAxis,
    target: &CoordinateAxis,
) -> Result<SourceLayout, ReconcileError> {
    let len = source.len();
    let order: Vec<usize> = if source.is_strictly_increasing() {
        (0..len).collect()
    } else {
        (0..len).rev().collect()
    };
    let xp: Vec<f64> = order.iter().map(|&i| source.values()[i]).collect();
    if !is_strictly_increasing(xp.iter().cloned()) {
        return Err(ReconcileError::NotMonotonic(AxisRole::Latitude, xp));
    }
    Ok(SourceLayout {
        xp,
        order,
        targets: target.to_vec(),
    })
}

fn interpolate_along(data: &ArrayD<f64>, axis: Axis, layout: &SourceLayout) -> ArrayD<f64> {
    let mut shape = data.shape().to_vec();
    shape[axis.index()] = layout.targets.len();
    let mut interpolated = ArrayD::<f64>::zeros(IxDyn(&shape));
    let mut fp = vec![0.; layout.order.len()];
    Zip::from(interpolated.lanes_mut(axis))
        .and(data.lanes(axis))
        .for_each(|mut out_lane, in_lane| {
            for (slot, &i) in fp.iter_mut().zip(layout.order.iter()) {
                *slot = in_lane[i];
            }
            for (out, &x) in out_lane.iter_mut().zip(layout.targets.iter()) {
                *out = interp1d(&layout.xp, &fp, x);
            }
        });
    interpolated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{LongitudeConvention, VerticalDirection, VerticalUnit};
    use crate::errors::ErrorKind;
    use ndarray::{array, Array2, Array3};

    const TOL: f64 = 1e-12;

    fn lon(values: Vec<f64>, convention: LongitudeConvention) -> CoordinateAxis {
        CoordinateAxis::longitude(values, Some(convention)).unwrap()
    }

    fn row_grid(lons: CoordinateAxis, row: Vec<f64>) -> Grid {
        let lat = CoordinateAxis::latitude(vec![10.]).unwrap();
        let n = row.len();
        Grid::from_2d(Array2::from_shape_vec((1, n), row).unwrap(), lat, lons).unwrap()
    }

    fn row(grid: &Grid) -> Vec<f64> {
        grid.data().iter().cloned().collect()
    }

    #[test]
    fn test_interp1d_interior_and_nodes() {
        let xp = [0., 1., 3.];
        let fp = [0., 10., 30.];
        assert_eq!(interp1d(&xp, &fp, 0.5), 5.);
        assert_eq!(interp1d(&xp, &fp, 2.), 20.);
        assert_eq!(interp1d(&xp, &fp, 1.), 10.);
        assert_eq!(interp1d(&xp, &fp, 3.), 30.);
    }

    #[test]
    fn test_interp1d_clamps_out_of_range() {
        let xp = [0., 1., 3.];
        let fp = [2., 10., 30.];
        assert_eq!(interp1d(&xp, &fp, -5.), 2.);
        assert_eq!(interp1d(&xp, &fp, 99.), 30.);
    }

    #[test]
    fn test_interp1d_degenerate_inputs() {
        assert!(interp1d(&[], &[], 1.).is_nan());
        assert!(interp1d(&[0., 1.], &[0., 1.], f64::NAN).is_nan());
        assert_eq!(interp1d(&[4.], &[7.], -1.), 7.);
        // an exact node next to a masked neighbour keeps its own value
        assert_eq!(interp1d(&[0., 1., 2.], &[1., 2., f64::NAN], 1.), 2.);
    }

    #[test]
    fn test_identical_axes_are_identity() {
        let lat = CoordinateAxis::latitude(vec![-60., -20., 20., 60.]).unwrap();
        let lons = lon(
            (0..6).map(|i| i as f64 * 60.).collect(),
            LongitudeConvention::ZeroTo360,
        );
        let data = Array2::from_shape_fn((4, 6), |(j, i)| ((j * 7 + i * 3) as f64).sin());
        let grid = Grid::from_2d(data, lat.clone(), lons.clone()).unwrap();
        let out = interpolate_longitude(&grid, &lons).unwrap();
        let out = interpolate_latitude(&out, &lat).unwrap();
        for (a, b) in out.data().iter().zip(grid.data().iter()) {
            assert!((a - b).abs() < TOL);
        }
    }

    #[test]
    fn test_refine_longitude() {
        let grid = row_grid(
            lon(vec![0., 90., 180., 270.], LongitudeConvention::ZeroTo360),
            vec![1., 2., 3., 4.],
        );
        let target = lon(
            (0..8).map(|i| i as f64 * 45.).collect(),
            LongitudeConvention::ZeroTo360,
        );
        let out = interpolate_longitude(&grid, &target).unwrap();
        assert_eq!(row(&out), vec![1., 1.5, 2., 2.5, 3., 3.5, 4., 4.]);
        assert_eq!(out.require_axis(AxisRole::Longitude).unwrap(), &target);
    }

    #[test]
    fn test_wrapped_source_is_unrolled() {
        let grid = row_grid(
            lon(vec![180., 270., 0., 90.], LongitudeConvention::ZeroTo360),
            vec![3., 4., 1., 2.],
        );
        let target = lon(vec![0., 90., 180., 270.], LongitudeConvention::ZeroTo360);
        let out = interpolate_longitude(&grid, &target).unwrap();
        assert_eq!(row(&out), vec![1., 2., 3., 4.]);
    }

    #[test]
    fn test_convention_mismatch_is_rejected() {
        let grid = row_grid(
            lon(vec![0., 90., 180., 270.], LongitudeConvention::ZeroTo360),
            vec![1., 2., 3., 4.],
        );
        let target = lon(vec![-180., -90., 0., 90.], LongitudeConvention::Signed180);
        let err = interpolate_longitude(&grid, &target).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::ConventionMismatch(
                LongitudeConvention::ZeroTo360,
                LongitudeConvention::Signed180
            )
        ));
        assert_eq!(err.kind(), ErrorKind::AmbiguousConvention);
    }

    #[test]
    fn test_missing_target_convention() {
        let grid = row_grid(
            lon(vec![0., 90., 180., 270.], LongitudeConvention::ZeroTo360),
            vec![1., 2., 3., 4.],
        );
        let target = CoordinateAxis::longitude(vec![0., 180.], None).unwrap();
        let err = interpolate_longitude(&grid, &target).unwrap_err();
        assert!(matches!(err, ReconcileError::MissingConvention));
    }

    #[test]
    fn test_wrong_target_role() {
        let grid = row_grid(
            lon(vec![0., 90., 180., 270.], LongitudeConvention::ZeroTo360),
            vec![1., 2., 3., 4.],
        );
        let target = CoordinateAxis::latitude(vec![0., 10.]).unwrap();
        let err = interpolate_longitude(&grid, &target).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::TargetRoleMismatch(AxisRole::Longitude, AxisRole::Latitude)
        ));
    }

    #[test]
    fn test_descending_latitude_source() {
        let lat = CoordinateAxis::latitude(vec![90., 0., -90.]).unwrap();
        let lons = lon(vec![0.], LongitudeConvention::ZeroTo360);
        let grid = Grid::from_2d(array![[9.], [0.], [-9.]], lat, lons).unwrap();
        let target = CoordinateAxis::latitude(vec![-45., 45., 60.]).unwrap();
        let out = interpolate_latitude(&grid, &target).unwrap();
        assert_eq!(row(&out), vec![-4.5, 4.5, 6.]);
    }

    #[test]
    fn test_regrid_both_axes_on_3d_field() {
        let lev = CoordinateAxis::vertical(
            vec![1000., 500.],
            VerticalUnit::PressureHpa,
            VerticalDirection::SurfaceFirst,
        )
        .unwrap();
        let lat = CoordinateAxis::latitude(vec![-60., 0., 60.]).unwrap();
        let lons = lon(vec![0., 90., 180., 270.], LongitudeConvention::ZeroTo360);
        // linear in both horizontal directions, so interpolation is exact inside the grid
        let data = Array3::from_shape_fn((2, 3, 4), |(k, j, i)| {
            k as f64 * 100. + (j as f64 * 60. - 60.) * 0.5 + i as f64 * 90. / 45.
        });
        let grid = Grid::from_3d(data, lev, lat, lons).unwrap();

        let target_lat = CoordinateAxis::latitude(vec![-30., 30.]).unwrap();
        let target_lon = lon(vec![45., 135., 225.], LongitudeConvention::ZeroTo360);
        let out = regrid_horizontal(&grid, &target_lat, &target_lon).unwrap();
        assert_eq!(out.shape(), &[2, 2, 3]);
        for ((k, j, i), value) in out
            .data()
            .view()
            .into_dimensionality::<ndarray::Ix3>()
            .unwrap()
            .indexed_iter()
        {
            let expected = k as f64 * 100.
                + target_lat.values()[j] * 0.5
                + target_lon.values()[i] / 45.;
            assert!((value - expected).abs() < 1e-9, "{} vs {}", value, expected);
        }
    }

    #[test]
    fn test_regrid_skips_equal_length_latitudes() {
        let lat = CoordinateAxis::latitude(vec![-45., 45.]).unwrap();
        let lons = lon(vec![0., 180.], LongitudeConvention::ZeroTo360);
        let grid = Grid::from_2d(array![[1., 2.], [3., 4.]], lat, lons.clone()).unwrap();
        let shifted_lat = CoordinateAxis::latitude(vec![-44., 44.]).unwrap();
        let out = regrid_horizontal(&grid, &shifted_lat, &lons).unwrap();
        assert_eq!(out, grid);
    }

    #[test]
    fn test_regrid_reverses_opposite_latitude_order() {
        let lons = lon(vec![0., 180.], LongitudeConvention::ZeroTo360);
        let south_first = CoordinateAxis::latitude(vec![-45., 45.]).unwrap();
        let north_first = CoordinateAxis::latitude(vec![45., -45.]).unwrap();
        let grid =
            Grid::from_2d(array![[45., 45.], [-45., -45.]], north_first, lons.clone()).unwrap();
        let out = regrid_horizontal(&grid, &south_first, &lons).unwrap();
        assert_eq!(out.require_axis(AxisRole::Latitude).unwrap(), &south_first);
        assert_eq!(out.data(), &array![[-45., -45.], [45., 45.]].into_dyn());
    }
}
