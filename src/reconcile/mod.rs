// gridcompare/src/reconcile/mod.rs

mod errors;
mod horizontal;
mod longitude;

pub use errors::ReconcileError;
pub use horizontal::{interp1d, interpolate_latitude, interpolate_longitude, regrid_horizontal};
pub use longitude::{reconcile_longitude, rotation_offset};
