// gridcompare/src/pipeline/builder.rs

use super::errors::PipelineError;
use super::run_comparison;
use super::settings::ComparisonSettings;
use crate::compare::ComparisonResult;
use crate::grid::Grid;

/// Borrowing front end to [`run_comparison`]. Settings fall back to
/// [`ComparisonSettings::default`].
#[derive(Default)]
pub struct ComparisonBuilder<'a> {
    grid_a: Option<&'a Grid>,
    grid_b: Option<&'a Grid>,
    settings: Option<&'a ComparisonSettings>,
}

impl<'a> ComparisonBuilder<'a> {
    pub fn build(&self) -> Result<ComparisonResult, PipelineError> {
        let grid_a = self
            .grid_a
            .ok_or_else(|| PipelineError::UninitializedFieldError("grid_a".to_string()))?;
        let grid_b = self
            .grid_b
            .ok_or_else(|| PipelineError::UninitializedFieldError("grid_b".to_string()))?;
        let default_settings = ComparisonSettings::default();
        let settings = self.settings.unwrap_or(&default_settings);
        run_comparison(grid_a, grid_b, settings)
    }

    pub fn grid_a(&mut self, grid_a: &'a Grid) -> &mut Self {
        self.grid_a = Some(grid_a);
        self
    }

    pub fn grid_b(&mut self, grid_b: &'a Grid) -> &mut Self {
        self.grid_b = Some(grid_b);
        self
    }

    pub fn settings(&mut self, settings: &'a ComparisonSettings) -> &mut Self {
        self.settings = Some(settings);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{CoordinateAxis, LongitudeConvention};
    use crate::compare::ComparisonKind;
    use crate::pipeline::ComparisonSettingsBuilder;
    use ndarray::array;

    fn grid(data: ndarray::Array2<f64>) -> Grid {
        let lat = CoordinateAxis::latitude(vec![-20., 20.]).unwrap();
        let lon = CoordinateAxis::longitude(vec![-90., 90.], Some(LongitudeConvention::Signed180))
            .unwrap();
        Grid::from_2d(data, lat, lon).unwrap()
    }

    #[test]
    fn test_missing_grid() {
        let a = grid(array![[1., 2.], [3., 4.]]);
        let err = ComparisonBuilder::default().grid_a(&a).build().unwrap_err();
        assert!(matches!(err, PipelineError::UninitializedFieldError(name) if name == "grid_b"));
    }

    #[test]
    fn test_build_with_settings() {
        let a = grid(array![[2., 2.], [3., 4.]]);
        let b = grid(array![[1., 2.], [3., 0.]]);
        let settings = ComparisonSettingsBuilder::default()
            .kind(ComparisonKind::Ratio)
            .build()
            .unwrap();
        let result = ComparisonBuilder::default()
            .grid_a(&a)
            .grid_b(&b)
            .settings(&settings)
            .build()
            .unwrap();
        assert_eq!(result.data(), &array![[2., 1.], [1., 1.5]].into_dyn());
        assert_eq!(result.bounds(), (1., 2.));
    }

    #[test]
    fn test_default_settings() {
        let a = grid(array![[1., 2.], [3., 4.]]);
        let b = grid(array![[0., 0.], [0., 0.]]);
        let result = ComparisonBuilder::default().grid_a(&a).grid_b(&b).build().unwrap();
        assert_eq!(result.kind(), ComparisonKind::AbsoluteDifference);
        assert_eq!(result.bounds(), (-4., 4.));
    }
}
