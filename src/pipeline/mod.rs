// gridcompare/src/pipeline/mod.rs

mod batch;
mod builder;
mod errors;
mod settings;
pub use batch::{run_batch, ComparisonJob};
pub use builder::ComparisonBuilder;
pub use errors::PipelineError;
pub use settings::{ComparisonSettings, ComparisonSettingsBuilder, ComparisonSettingsBuilderError};

use crate::axis::AxisRole;
use crate::compare::{compare, ComparisonResult};
use crate::grid::Grid;
use crate::reconcile::{reconcile_longitude, regrid_horizontal};
use crate::vertical::{align_vertical, orient_vertical, TropopausePartitioner, VerticalSegment};
use crate::zonal::ZonalAverager;
use humantime::format_duration;
use log::{debug, info};
use std::time::Instant;

/// Compare grid `b` against grid `a`.
///
/// Fill values are masked on the raw fields and both grids are rotated onto
/// the configured longitude convention. `b` is then interpolated onto `a`'s
/// horizontal axes. Vertical grids are oriented to one direction, optionally
/// cut to a segment at the reference pressure, and matched level by level.
/// Both are then optionally zonally averaged and converted to tracer units
/// before the metric is computed. The result lives on `a`'s (reconciled)
/// coordinates.
pub fn run_comparison(
    a: &Grid,
    b: &Grid,
    settings: &ComparisonSettings,
) -> Result<ComparisonResult, PipelineError> {
    let start = Instant::now();
    debug!("gridcompare {}", crate::VERSION);
    info!(
        "Comparing {} against {} ({}, {} segment)",
        b, a, settings.kind, settings.segment
    );

    let a = a.mask_fill_values(settings.fill_threshold);
    let b = b.mask_fill_values(settings.fill_threshold);

    let stage = Instant::now();
    let a = reconcile_longitude(&a, settings.longitude_convention)?;
    let b = reconcile_longitude(&b, settings.longitude_convention)?;
    let b = regrid_horizontal(
        &b,
        a.require_axis(AxisRole::Latitude)?,
        a.require_axis(AxisRole::Longitude)?,
    )?;
    debug!("Horizontal reconciliation took {}", format_duration(stage.elapsed()));

    let stage = Instant::now();
    let (a, b) = select_segment(a, b, settings)?;
    let (a, b) = align_vertical(&a, &b)?;
    debug!("Vertical reconciliation took {}", format_duration(stage.elapsed()));

    let (a, b) = if settings.zonal_mean {
        let mut averager = ZonalAverager::new();
        averager.fill_threshold(settings.fill_threshold);
        (averager.average(&a)?, averager.average(&b)?)
    } else {
        (a, b)
    };

    let (a, b) = match settings.tracer {
        Some(tracer) => {
            debug!("Converting both grids to {} {}", tracer, tracer.units());
            (
                tracer.convert(&a, settings.fill_threshold),
                tracer.convert(&b, settings.fill_threshold),
            )
        }
        None => (a, b),
    };

    let result = compare(&a, &b, settings.kind)?;
    info!("Finished {} in {}", result, format_duration(start.elapsed()));
    Ok(result)
}

fn select_segment(
    a: Grid,
    b: Grid,
    settings: &ComparisonSettings,
) -> Result<(Grid, Grid), PipelineError> {
    if !(a.has_axis(AxisRole::Vertical) && b.has_axis(AxisRole::Vertical)) {
        if settings.segment != VerticalSegment::Full {
            return Err(PipelineError::SegmentWithoutVertical(settings.segment));
        }
        return Ok((a, b));
    }
    let direction = settings.vertical_direction.or_else(|| {
        a.axis(AxisRole::Vertical)
            .and_then(|axis| axis.vertical_direction())
    });
    let direction = match direction {
        Some(direction) => direction,
        None => return Ok((a, b)),
    };
    if settings.segment == VerticalSegment::Full {
        return Ok((orient_vertical(&a, direction)?, orient_vertical(&b, direction)?));
    }
    let partitioner = TropopausePartitioner::new(settings.reference_pressure_hpa);
    let (pa, pb) = partitioner.partition_pair(&a, &b, direction)?;
    let ((troposphere_a, stratosphere_a), (troposphere_b, stratosphere_b)) =
        (pa.into_parts(), pb.into_parts());
    match settings.segment {
        VerticalSegment::Troposphere => Ok((troposphere_a, troposphere_b)),
        _ => Ok((stratosphere_a, stratosphere_b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{CoordinateAxis, LongitudeConvention, VerticalDirection, VerticalUnit};
    use crate::compare::ComparisonKind;
    use crate::errors::ErrorKind;
    use crate::reconcile::ReconcileError;
    use crate::tracers::Tracer;
    use ndarray::{Array2, Array3};

    // Smooth in pressure and latitude, periodic in longitude.
    fn truth(p: f64, lat: f64, lon: f64) -> f64 {
        p / 10. + lat + 5. * lon.to_radians().cos()
    }

    fn model_grid(
        levels: Vec<f64>,
        direction: VerticalDirection,
        longitudes: Vec<f64>,
        convention: LongitudeConvention,
    ) -> Grid {
        let latitudes = vec![-45., 45.];
        let data = Array3::from_shape_fn((levels.len(), 2, longitudes.len()), |(k, j, i)| {
            truth(levels[k], latitudes[j], longitudes[i])
        });
        let lev = CoordinateAxis::vertical(levels, VerticalUnit::PressureHpa, direction).unwrap();
        let lat = CoordinateAxis::latitude(latitudes).unwrap();
        let lon = CoordinateAxis::longitude(longitudes, Some(convention)).unwrap();
        Grid::from_3d(data, lev, lat, lon).unwrap()
    }

    fn grid_a() -> Grid {
        model_grid(
            vec![1000., 500., 100., 50., 10.],
            VerticalDirection::SurfaceFirst,
            vec![-180., -90., 0., 90.],
            LongitudeConvention::Signed180,
        )
    }

    fn grid_b() -> Grid {
        model_grid(
            vec![10., 50., 100., 500., 1000.],
            VerticalDirection::TopFirst,
            vec![0., 90., 180., 270.],
            LongitudeConvention::ZeroTo360,
        )
    }

    #[test]
    fn test_same_truth_on_different_conventions() {
        crate::_setup_pretty_env_logger_default();
        let settings = ComparisonSettings::default();
        let result = run_comparison(&grid_a(), &grid_b(), &settings).unwrap();
        assert_eq!(result.grid().shape(), &[5, 2, 4]);
        assert!(result.data().iter().all(|v| v.abs() < 1e-12));
        let lon = result.grid().require_axis(AxisRole::Longitude).unwrap();
        assert_eq!(lon.to_vec(), vec![-180., -90., 0., 90.]);
        assert_eq!(
            result.grid().require_axis(AxisRole::Vertical).unwrap().to_vec(),
            vec![1000., 500., 100., 50., 10.]
        );
    }

    #[test]
    fn test_troposphere_zonal_ratio() {
        let settings = ComparisonSettingsBuilder::default()
            .kind(ComparisonKind::Ratio)
            .segment(VerticalSegment::Troposphere)
            .zonal_mean(true)
            .build()
            .unwrap();
        let result = run_comparison(&grid_a(), &grid_b(), &settings).unwrap();
        assert_eq!(result.grid().shape(), &[3, 2]);
        assert_eq!(result.grid().dims(), &[AxisRole::Vertical, AxisRole::Latitude]);
        assert!(result.data().iter().all(|v| (v - 1.).abs() < 1e-12));
        assert!((result.low() - 1.).abs() < 1e-12 && (result.high() - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_stratosphere_in_requested_direction() {
        let settings = ComparisonSettingsBuilder::default()
            .segment(VerticalSegment::Stratosphere)
            .vertical_direction(VerticalDirection::TopFirst)
            .build()
            .unwrap();
        let result = run_comparison(&grid_a(), &grid_b(), &settings).unwrap();
        assert_eq!(
            result.grid().require_axis(AxisRole::Vertical).unwrap().to_vec(),
            vec![10., 50., 100.]
        );
    }

    #[test]
    fn test_coarser_longitudes_are_interpolated() {
        let a = grid_a();
        let b = model_grid(
            vec![1000., 500., 100., 50., 10.],
            VerticalDirection::SurfaceFirst,
            vec![0., 180.],
            LongitudeConvention::ZeroTo360,
        );
        let result = run_comparison(&a, &b, &ComparisonSettings::default()).unwrap();
        assert_eq!(result.grid().shape(), &[5, 2, 4]);
        // b's columns at 180 and 0 coincide with a's
        for k in 0..5 {
            for j in 0..2 {
                assert!(result.data()[[k, j, 0]].abs() < 1e-12);
                assert!(result.data()[[k, j, 2]].abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_fill_values_do_not_reach_bounds() {
        let a = grid_a();
        let mut data = grid_b().data().clone();
        data[[0, 0, 0]] = 1e20;
        let b = Grid::new(
            crate::grid::Field::new(data, grid_b().dims().to_vec()).unwrap(),
            grid_b().axes().to_vec(),
        )
        .unwrap();
        let result = run_comparison(&a, &b, &ComparisonSettings::default()).unwrap();
        assert_eq!(result.data().iter().filter(|v| v.is_nan()).count(), 1);
        let (low, high) = result.bounds();
        assert!(low.abs() < 1e-12 && high.abs() < 1e-12);
    }

    #[test]
    fn test_tracer_units_are_applied_to_both() {
        let settings = ComparisonSettingsBuilder::default()
            .tracer(Tracer::O3)
            .kind(ComparisonKind::Ratio)
            .build()
            .unwrap();
        let result = run_comparison(&grid_a(), &grid_b(), &settings).unwrap();
        assert!(result.data().iter().all(|v| (v - 1.).abs() < 1e-9));
    }

    #[test]
    fn test_opposite_latitude_order_is_reconciled() {
        let lon = CoordinateAxis::longitude(vec![-90., 90.], Some(LongitudeConvention::Signed180))
            .unwrap();
        let south_first = CoordinateAxis::latitude(vec![-45., 45.]).unwrap();
        let north_first = CoordinateAxis::latitude(vec![45., -45.]).unwrap();
        let a = Grid::from_2d(
            Array2::from_shape_fn((2, 2), |(j, _)| south_first.values()[j]),
            south_first.clone(),
            lon.clone(),
        )
        .unwrap();
        let b = Grid::from_2d(
            Array2::from_shape_fn((2, 2), |(j, _)| north_first.values()[j]),
            north_first,
            lon,
        )
        .unwrap();
        let result = run_comparison(&a, &b, &ComparisonSettings::default()).unwrap();
        assert!(result.data().iter().all(|&v| v == 0.));
        assert_eq!(result.bounds(), (0., 0.));
        assert_eq!(
            result.grid().require_axis(AxisRole::Latitude).unwrap(),
            &south_first
        );
    }

    #[test]
    fn test_segment_needs_vertical_axis() {
        let lat = CoordinateAxis::latitude(vec![0., 10.]).unwrap();
        let lon = CoordinateAxis::longitude(vec![0., 180.], Some(LongitudeConvention::ZeroTo360))
            .unwrap();
        let grid = Grid::from_2d(Array2::ones((2, 2)), lat, lon).unwrap();
        let settings = ComparisonSettingsBuilder::default()
            .segment(VerticalSegment::Troposphere)
            .build()
            .unwrap();
        let err = run_comparison(&grid, &grid, &settings).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SegmentWithoutVertical(VerticalSegment::Troposphere)
        ));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_convention_is_ambiguous() {
        let lat = CoordinateAxis::latitude(vec![0., 10.]).unwrap();
        let lon = CoordinateAxis::longitude(vec![0., 180.], None).unwrap();
        let grid = Grid::from_2d(Array2::ones((2, 2)), lat, lon).unwrap();
        let err = run_comparison(&grid, &grid, &ComparisonSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ReconcileError(ReconcileError::MissingConvention)
        ));
        assert_eq!(err.kind(), ErrorKind::AmbiguousConvention);
    }
}
