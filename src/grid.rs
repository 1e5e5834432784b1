// gridcompare/src/grid.rs

use crate::axis::{AxisError, AxisRole, CoordinateAxis};
use crate::errors::ErrorKind;
use ndarray::{Array2, Array3, ArrayD, Axis, IxDyn, ShapeError};
use std::fmt;
use thiserror::Error;

/// A numeric array together with the role of each of its dimensions.
///
/// Fields are never mutated once built; every reconciliation stage hands back
/// a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    data: ArrayD<f64>,
    dims: Vec<AxisRole>,
}

impl Field {
    pub fn new(data: ArrayD<f64>, dims: Vec<AxisRole>) -> Result<Self, GridError> {
        if dims.is_empty() || dims.len() > 3 {
            return Err(GridError::UnsupportedRank(dims.len()));
        }
        if data.ndim() != dims.len() {
            return Err(GridError::DimensionCount(dims.len(), data.ndim()));
        }
        for (i, role) in dims.iter().enumerate() {
            if dims[..i].contains(role) {
                return Err(GridError::DuplicateRole(*role));
            }
        }
        Ok(Self { data, dims })
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    pub fn dims(&self) -> &[AxisRole] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn axis_of(&self, role: AxisRole) -> Option<Axis> {
        self.dims.iter().position(|r| *r == role).map(Axis)
    }

    /// Replace every value with magnitude at or above `threshold` by NaN.
    ///
    /// Model output marks missing points with huge fill values (1e15 and the
    /// like); downstream code only understands NaN as "missing".
    pub fn mask_fill_values(&self, threshold: f64) -> Self {
        let data = self
            .data
            .mapv(|v| if v.abs() >= threshold { f64::NAN } else { v });
        Self {
            data,
            dims: self.dims.clone(),
        }
    }
}

/// A field paired with one coordinate axis per array dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    field: Field,
    axes: Vec<CoordinateAxis>,
}

impl Grid {
    pub fn new(field: Field, axes: Vec<CoordinateAxis>) -> Result<Self, GridError> {
        if axes.len() != field.ndim() {
            return Err(GridError::AxisCount(field.ndim(), axes.len()));
        }
        for (dim, (role, axis)) in field.dims().iter().zip(axes.iter()).enumerate() {
            if axis.role() != *role {
                return Err(GridError::RoleMismatch(dim, *role, axis.role()));
            }
            if axis.len() != field.shape()[dim] {
                return Err(GridError::LengthMismatch(*role, axis.len(), field.shape()[dim]));
            }
        }
        Ok(Self { field, axes })
    }

    /// (lat, lon) grid.
    pub fn from_2d(
        data: Array2<f64>,
        latitude: CoordinateAxis,
        longitude: CoordinateAxis,
    ) -> Result<Self, GridError> {
        let field = Field::new(
            data.into_dyn(),
            vec![AxisRole::Latitude, AxisRole::Longitude],
        )?;
        Self::new(field, vec![latitude, longitude])
    }

    /// (level, lat, lon) grid.
    pub fn from_3d(
        data: Array3<f64>,
        vertical: CoordinateAxis,
        latitude: CoordinateAxis,
        longitude: CoordinateAxis,
    ) -> Result<Self, GridError> {
        let field = Field::new(
            data.into_dyn(),
            vec![AxisRole::Vertical, AxisRole::Latitude, AxisRole::Longitude],
        )?;
        Self::new(field, vec![vertical, latitude, longitude])
    }

    pub fn from_shape_vec(
        shape: &[usize],
        values: Vec<f64>,
        axes: Vec<CoordinateAxis>,
    ) -> Result<Self, GridError> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        let dims = axes.iter().map(|a| a.role()).collect();
        Self::new(Field::new(data, dims)?, axes)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn data(&self) -> &ArrayD<f64> {
        self.field.data()
    }

    pub fn dims(&self) -> &[AxisRole] {
        self.field.dims()
    }

    pub fn shape(&self) -> &[usize] {
        self.field.shape()
    }

    pub fn axes(&self) -> &[CoordinateAxis] {
        &self.axes
    }

    pub fn has_axis(&self, role: AxisRole) -> bool {
        self.field.axis_of(role).is_some()
    }

    pub fn axis(&self, role: AxisRole) -> Option<&CoordinateAxis> {
        self.field.axis_of(role).map(|a| &self.axes[a.index()])
    }

    pub fn require_axis(&self, role: AxisRole) -> Result<&CoordinateAxis, GridError> {
        self.axis(role).ok_or(GridError::MissingAxis(role))
    }

    pub fn array_axis(&self, role: AxisRole) -> Result<Axis, GridError> {
        self.field.axis_of(role).ok_or(GridError::MissingAxis(role))
    }

    pub fn mask_fill_values(&self, threshold: f64) -> Self {
        Self {
            field: self.field.mask_fill_values(threshold),
            axes: self.axes.clone(),
        }
    }

    /// Apply `f` to every value, keeping coordinates.
    pub fn mapv<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            field: Field {
                data: self.field.data.mapv(f),
                dims: self.field.dims.clone(),
            },
            axes: self.axes.clone(),
        }
    }

    /// Swap in new data whose extent along `role` matches `axis`, leaving the
    /// other dimensions untouched.
    pub fn with_axis_data(
        &self,
        axis: CoordinateAxis,
        data: ArrayD<f64>,
    ) -> Result<Self, GridError> {
        let role = axis.role();
        let index = self.array_axis(role)?.index();
        let mut axes = self.axes.clone();
        axes[index] = axis;
        Self::new(Field::new(data, self.field.dims.clone())?, axes)
    }

    /// Keep only the listed positions along `role`, in the order given.
    pub fn select(&self, role: AxisRole, indices: &[usize]) -> Result<Self, GridError> {
        let array_axis = self.array_axis(role)?;
        let source = &self.axes[array_axis.index()];
        if let Some(&bad) = indices.iter().find(|&&i| i >= source.len()) {
            return Err(GridError::IndexOutOfRange(role, bad, source.len()));
        }
        let values = indices.iter().map(|&i| source.values()[i]).collect();
        let axis = source.with_values(values)?;
        let data = self.field.data.select(array_axis, indices);
        self.with_axis_data(axis, data)
    }

    /// Drop the `role` dimension, replacing the data with `data`.
    pub fn without_axis(&self, role: AxisRole, data: ArrayD<f64>) -> Result<Self, GridError> {
        let index = self.array_axis(role)?.index();
        let mut dims = self.field.dims.clone();
        dims.remove(index);
        let mut axes = self.axes.clone();
        axes.remove(index);
        Self::new(Field::new(data, dims)?, axes)
    }

    /// Same grid re-laid out with `role` in reverse storage order.
    pub fn reversed_along(&self, role: AxisRole) -> Result<Self, GridError> {
        let array_axis = self.array_axis(role)?;
        let axis = self.axes[array_axis.index()].reversed();
        let mut data = self.field.data.clone();
        data.invert_axis(array_axis);
        self.with_axis_data(axis, data.as_standard_layout().into_owned())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self
            .axes
            .iter()
            .map(|a| format!("{}={}", a.role(), a.len()))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Grid({})", dims)
    }
}

#[derive(Error, Debug)]
pub enum GridError {
    #[error("fields must have 1 to 3 dimensions, got {0}")]
    UnsupportedRank(usize),
    #[error("field declares {0} dimensions but its array has {1}")]
    DimensionCount(usize, usize),
    #[error("field lists the {0} dimension more than once")]
    DuplicateRole(AxisRole),
    #[error("field has {0} dimensions but {1} coordinate axes were given")]
    AxisCount(usize, usize),
    #[error("dimension {0} is {1} but its coordinate axis is {2}")]
    RoleMismatch(usize, AxisRole, AxisRole),
    #[error("{0} axis has {1} values but the array dimension has length {2}")]
    LengthMismatch(AxisRole, usize, usize),
    #[error("grid has no {0} axis")]
    MissingAxis(AxisRole),
    #[error("index {1} is out of range for {0} axis of length {2}")]
    IndexOutOfRange(AxisRole, usize, usize),
    #[error(transparent)]
    AxisError(#[from] AxisError),
    #[error(transparent)]
    ShapeError(#[from] ShapeError),
}

impl GridError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GridError::AxisError(e) => e.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}
