// gridcompare/src/errors.rs

use std::fmt;

/// Coarse classification shared by every error in the crate.
///
/// Nothing here is retryable: all operations are pure, so the same inputs
/// always produce the same error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Inputs that cannot be compared as given (shape mismatch, reference
    /// level outside the grid, missing axis, ...).
    Configuration,
    /// Coordinate metadata that cannot be interpreted safely (missing
    /// longitude convention, non-monotonic axis, mixed vertical units).
    AmbiguousConvention,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration error"),
            ErrorKind::AmbiguousConvention => write!(f, "ambiguous convention error"),
        }
    }
}
