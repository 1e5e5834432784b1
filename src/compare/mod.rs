// gridcompare/src/compare/mod.rs

mod errors;
mod metric;
mod result;

pub use errors::CompareError;
pub use metric::{compare_arrays, ComparisonKind};
pub use result::{compare, ComparisonResult};
