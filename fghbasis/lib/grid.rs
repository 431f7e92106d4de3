//! Equally spaced coordinate grids.

use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::error::GridError;

pub type GridResult<T> = Result<T, GridError>;

/// Point count and spacing of an equally spaced grid.
///
/// Always describes at least two points with a positive step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
    point_count: usize,
    step: f64,
}

impl Grid {
    /// Create a new `Grid`, checking that it has at least two points and a
    /// positive step.
    pub fn new(point_count: usize, step: f64) -> GridResult<Self> {
        GridError::check_points(point_count)?;
        GridError::check_step(step)?;
        Ok(Self { point_count, step })
    }

    /// Create a new `Grid` matching an `r_list` descriptor.
    pub fn from_rlist(rlist: &RList) -> GridResult<Self> {
        rlist.validate()?;
        Self::new(rlist.point_count(), rlist.r_step)
    }

    /// Number of grid points.
    pub fn point_count(&self) -> usize { self.point_count }

    /// Grid spacing.
    pub fn step(&self) -> f64 { self.step }

    /// Distance between the first and last grid points, `(N - 1) * step`.
    pub fn length(&self) -> f64 { (self.point_count - 1) as f64 * self.step }
}

/// Coordinate range `r_min..=r_max` sampled every `r_step` on which a stored
/// eigenvector lives.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RList {
    pub r_min: f64,
    pub r_max: f64,
    pub r_step: f64,
}

impl RList {
    pub fn new(r_min: f64, r_max: f64, r_step: f64) -> Self {
        Self { r_min, r_max, r_step }
    }

    /// Return an error if the range does not describe at least two points.
    pub fn validate(&self) -> GridResult<()> {
        GridError::check_step(self.r_step)?;
        let ok = self.r_min.is_finite()
            && self.r_max.is_finite()
            && self.r_max > self.r_min;
        if !ok {
            return Err(GridError::BadRList {
                r_min: self.r_min,
                r_max: self.r_max,
                r_step: self.r_step,
            });
        }
        GridError::check_points(self.point_count())
    }

    /// Number of points in the range, both endpoints included.
    ///
    /// The range is rounded to the nearest whole number of steps.
    pub fn point_count(&self) -> usize {
        let steps = ((self.r_max - self.r_min) / self.r_step).round();
        if steps.is_finite() && steps >= 0.0 { steps as usize + 1 } else { 0 }
    }

    /// Generate the coordinate array.
    pub fn points(&self) -> nd::Array1<f64> {
        let n = self.point_count();
        (0..n).map(|k| self.r_min + k as f64 * self.r_step).collect()
    }

    /// Convert to a [`Grid`].
    pub fn grid(&self) -> GridResult<Grid> { Grid::from_rlist(self) }
}
