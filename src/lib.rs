//! Reconciles gridded atmospheric-model output onto a common grid and
//! compares two fields pointwise.

use pretty_env_logger;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn _setup_pretty_env_logger_default() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}

/// Crate version with the git revision and build profile.
pub const VERSION: &str = env!("GRIDCOMPARE_VERSION");

pub mod axis;
pub mod compare;
pub mod errors;
pub mod grid;
pub mod pipeline;
pub mod reconcile;
pub mod tracers;
pub mod vertical;
pub mod zonal;

pub use axis::{AxisRole, CoordinateAxis, LongitudeConvention, VerticalDirection, VerticalUnit};
pub use compare::{compare, ComparisonKind, ComparisonResult};
pub use errors::ErrorKind;
pub use grid::{Field, Grid};
pub use pipeline::{
    run_batch, run_comparison, ComparisonBuilder, ComparisonJob, ComparisonSettings,
    ComparisonSettingsBuilder, PipelineError,
};
pub use tracers::Tracer;
pub use vertical::{TropopausePartitioner, VerticalSegment};
pub use zonal::{zonal_mean, ZonalAverager};
