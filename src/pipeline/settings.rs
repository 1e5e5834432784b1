// gridcompare/src/pipeline/settings.rs

use crate::axis::{LongitudeConvention, VerticalDirection};
use crate::compare::ComparisonKind;
use crate::tracers::Tracer;
use crate::vertical::{VerticalSegment, TROPOPAUSE_PROXY_HPA};
use crate::zonal::DEFAULT_FILL_THRESHOLD;
use derive_builder::Builder;

/// Knobs for one comparison run.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ComparisonSettings {
    #[builder(default)]
    pub kind: ComparisonKind,
    #[builder(default)]
    pub segment: VerticalSegment,
    #[builder(default = "false")]
    pub zonal_mean: bool,
    /// Boundary between troposphere and stratosphere.
    #[builder(default = "TROPOPAUSE_PROXY_HPA")]
    pub reference_pressure_hpa: f64,
    /// Magnitude at or above which raw values count as missing.
    #[builder(default = "DEFAULT_FILL_THRESHOLD")]
    pub fill_threshold: f64,
    /// Convention both grids are rotated onto before interpolation.
    #[builder(default = "LongitudeConvention::Signed180")]
    pub longitude_convention: LongitudeConvention,
    /// Shared vertical order of the outputs; the first grid's when unset.
    #[builder(default, setter(strip_option))]
    pub vertical_direction: Option<VerticalDirection>,
    /// Convert raw mixing ratios to display units before comparing.
    #[builder(default, setter(strip_option))]
    pub tracer: Option<Tracer>,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            kind: ComparisonKind::default(),
            segment: VerticalSegment::default(),
            zonal_mean: false,
            reference_pressure_hpa: TROPOPAUSE_PROXY_HPA,
            fill_threshold: DEFAULT_FILL_THRESHOLD,
            longitude_convention: LongitudeConvention::Signed180,
            vertical_direction: None,
            tracer: None,
        }
    }
}

impl ComparisonSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(reference) = self.reference_pressure_hpa {
            if !(reference.is_finite() && reference > 0.) {
                return Err(format!(
                    "reference_pressure_hpa must be finite and positive, but got {}",
                    reference
                ));
            }
        }
        if let Some(threshold) = self.fill_threshold {
            if !(threshold > 0.) {
                return Err(format!(
                    "fill_threshold must be positive, but got {}",
                    threshold
                ));
            }
        }
        Ok(())
    }
}
