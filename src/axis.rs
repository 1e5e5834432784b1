// gridcompare/src/axis.rs

use crate::errors::ErrorKind;
use ndarray::Array1;
use std::fmt;
use thiserror::Error;

/// Which array dimension an axis describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisRole {
    Vertical,
    Latitude,
    Longitude,
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisRole::Vertical => write!(f, "vertical"),
            AxisRole::Latitude => write!(f, "latitude"),
            AxisRole::Longitude => write!(f, "longitude"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LongitudeConvention {
    /// 0 -> 360 degrees east.
    ZeroTo360,
    /// -180 -> +180 degrees.
    Signed180,
}

impl fmt::Display for LongitudeConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LongitudeConvention::ZeroTo360 => write!(f, "zero_to_360"),
            LongitudeConvention::Signed180 => write!(f, "signed_180"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerticalUnit {
    PressureHpa,
    ModelLevelIndex,
}

impl fmt::Display for VerticalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalUnit::PressureHpa => write!(f, "pressure_hpa"),
            VerticalUnit::ModelLevelIndex => write!(f, "model_level_index"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerticalDirection {
    SurfaceFirst,
    TopFirst,
}

impl VerticalDirection {
    pub fn reversed(self) -> Self {
        match self {
            VerticalDirection::SurfaceFirst => VerticalDirection::TopFirst,
            VerticalDirection::TopFirst => VerticalDirection::SurfaceFirst,
        }
    }
}

impl fmt::Display for VerticalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalDirection::SurfaceFirst => write!(f, "surface_first"),
            VerticalDirection::TopFirst => write!(f, "top_first"),
        }
    }
}

/// Semantic kind of a coordinate axis, with the metadata each kind needs.
///
/// A longitude convention of `None` means the caller did not know it; any
/// operation that depends on the convention refuses to run on such an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisKind {
    Latitude,
    Longitude {
        convention: Option<LongitudeConvention>,
    },
    Vertical {
        unit: VerticalUnit,
        direction: VerticalDirection,
    },
}

impl AxisKind {
    pub fn role(&self) -> AxisRole {
        match self {
            AxisKind::Latitude => AxisRole::Latitude,
            AxisKind::Longitude { .. } => AxisRole::Longitude,
            AxisKind::Vertical { .. } => AxisRole::Vertical,
        }
    }
}

/// One labeled 1-D coordinate.
///
/// Latitude and vertical axes are strictly monotonic in either direction.
/// Longitude axes are allowed a single wraparound (e.g. `[180, 270, 0, 90]`)
/// since that is how rotated model output arrives; the interpolator deals
/// with it explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateAxis {
    values: Array1<f64>,
    kind: AxisKind,
}

impl CoordinateAxis {
    pub fn new(values: Array1<f64>, kind: AxisKind) -> Result<Self, AxisError> {
        Self::validate_values(&values, kind.role())?;
        match kind {
            AxisKind::Latitude => {
                if !is_strictly_monotonic(&values) {
                    return Err(AxisError::NotMonotonic(AxisRole::Latitude));
                }
            }
            AxisKind::Longitude { .. } => {
                if count_descents(&values) > 1 {
                    return Err(AxisError::NotMonotonic(AxisRole::Longitude));
                }
            }
            AxisKind::Vertical { unit, direction } => {
                if !is_strictly_monotonic(&values) {
                    return Err(AxisError::NotMonotonic(AxisRole::Vertical));
                }
                Self::validate_vertical_direction(&values, unit, direction)?;
            }
        }
        Ok(Self { values, kind })
    }

    pub fn latitude(values: Vec<f64>) -> Result<Self, AxisError> {
        Self::new(Array1::from_vec(values), AxisKind::Latitude)
    }

    pub fn longitude(
        values: Vec<f64>,
        convention: Option<LongitudeConvention>,
    ) -> Result<Self, AxisError> {
        Self::new(Array1::from_vec(values), AxisKind::Longitude { convention })
    }

    pub fn vertical(
        values: Vec<f64>,
        unit: VerticalUnit,
        direction: VerticalDirection,
    ) -> Result<Self, AxisError> {
        Self::new(
            Array1::from_vec(values),
            AxisKind::Vertical { unit, direction },
        )
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    pub fn role(&self) -> AxisRole {
        self.kind.role()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn longitude_convention(&self) -> Option<LongitudeConvention> {
        match self.kind {
            AxisKind::Longitude { convention } => convention,
            _ => None,
        }
    }

    pub fn vertical_unit(&self) -> Option<VerticalUnit> {
        match self.kind {
            AxisKind::Vertical { unit, .. } => Some(unit),
            _ => None,
        }
    }

    pub fn vertical_direction(&self) -> Option<VerticalDirection> {
        match self.kind {
            AxisKind::Vertical { direction, .. } => Some(direction),
            _ => None,
        }
    }

    pub fn min(&self) -> f64 {
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Whether `value` lies within `[min, max]` of the axis.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min() && value <= self.max()
    }

    pub fn is_strictly_increasing(&self) -> bool {
        is_strictly_increasing(self.values.iter().cloned())
    }

    /// Same axis with its values re-laid out in reverse storage order.
    /// Vertical axes flip their direction flag along with the values.
    pub fn reversed(&self) -> Self {
        let values = self.values.iter().rev().cloned().collect::<Array1<f64>>();
        let kind = match self.kind {
            AxisKind::Vertical { unit, direction } => AxisKind::Vertical {
                unit,
                direction: direction.reversed(),
            },
            other => other,
        };
        Self { values, kind }
    }

    /// New axis of the same kind with different values, revalidated.
    pub fn with_values(&self, values: Array1<f64>) -> Result<Self, AxisError> {
        Self::new(values, self.kind)
    }

    fn validate_values(values: &Array1<f64>, role: AxisRole) -> Result<(), AxisError> {
        if values.is_empty() {
            return Err(AxisError::Empty(role));
        }
        if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(AxisError::NonFinite(role, index, *value));
        }
        Ok(())
    }

    fn validate_vertical_direction(
        values: &Array1<f64>,
        unit: VerticalUnit,
        direction: VerticalDirection,
    ) -> Result<(), AxisError> {
        // Only pressure carries physical ordering; level indices are labels.
        if unit != VerticalUnit::PressureHpa || values.len() < 2 {
            return Ok(());
        }
        let decreasing = values[0] > values[values.len() - 1];
        let consistent = match direction {
            VerticalDirection::SurfaceFirst => decreasing,
            VerticalDirection::TopFirst => !decreasing,
        };
        if !consistent {
            return Err(AxisError::DirectionMismatch(
                direction,
                values[0],
                values[values.len() - 1],
            ));
        }
        Ok(())
    }
}

pub(crate) fn is_strictly_increasing<I>(values: I) -> bool
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = values.into_iter();
    let mut prev = match iter.next() {
        Some(first) => first,
        None => return true,
    };
    for value in iter {
        if !(value > prev) {
            return false;
        }
        prev = value;
    }
    true
}

fn is_strictly_monotonic(values: &Array1<f64>) -> bool {
    is_strictly_increasing(values.iter().cloned())
        || is_strictly_increasing(values.iter().rev().cloned())
}

fn count_descents(values: &Array1<f64>) -> usize {
    values
        .iter()
        .zip(values.iter().skip(1))
        .filter(|(a, b)| !(b > a))
        .count()
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AxisError {
    #[error("{0} axis has no values")]
    Empty(AxisRole),
    #[error("{0} axis has a non-finite value at index {1}: {2}")]
    NonFinite(AxisRole, usize, f64),
    #[error("{0} axis is not monotonic")]
    NotMonotonic(AxisRole),
    #[error("pressure axis flagged {0} runs from {1} hPa to {2} hPa")]
    DirectionMismatch(VerticalDirection, f64, f64),
}

impl AxisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AxisError::NotMonotonic(_) | AxisError::DirectionMismatch(..) => {
                ErrorKind::AmbiguousConvention
            }
            _ => ErrorKind::Configuration,
        }
    }
}
