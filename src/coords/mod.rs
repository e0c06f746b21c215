//! Coordinate systems for image simulation.
//!
//! Real-space grids, Fourier-space frequency grids, unordered point
//! clouds, and the central frequency slice used for Fourier-space
//! projection. All wrappers are immutable: scaling returns a new instance
//! and the underlying array is never touched after construction.

pub mod grids;

pub use grids::{cartesian_to_polar, make_coordinates, make_frequencies};

use nalgebra::Point3;
use ndarray::{Array2, Array4, ArrayD, Axis};

use crate::error::{ExitwaveError, Result};
use crate::image::fft;

/// An unordered cloud of 2D or 3D points, shape `(n_points, ndim)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateList {
    array: Array2<f64>,
}

impl CoordinateList {
    /// Wraps a point array, requiring 2 or 3 columns.
    pub fn new(array: Array2<f64>) -> Result<Self> {
        let ndim = array.ncols();
        if ndim != 2 && ndim != 3 {
            return Err(ExitwaveError::invalid(
                "array",
                format!("points must have 2 or 3 components, got {ndim}"),
            ));
        }
        Ok(Self { array })
    }

    /// Builds a 3D list from geometric points.
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let array = Array2::from_shape_fn((points.len(), 3), |(i, c)| points[i][c]);
        Self { array }
    }

    pub fn get(&self) -> &Array2<f64> {
        &self.array
    }

    pub fn n_points(&self) -> usize {
        self.array.nrows()
    }

    /// Returns a new list with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            array: &self.array * factor,
        }
    }
}

/// A dense real-space Cartesian grid, shape `(*spatial, ndim)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    array: ArrayD<f64>,
}

impl CoordinateGrid {
    /// Builds the grid for a 2D or 3D spatial shape at the given spacing.
    pub fn new(shape: &[usize], grid_spacing: f64) -> Result<Self> {
        Ok(Self {
            array: make_coordinates(shape, grid_spacing)?,
        })
    }

    /// Wraps an existing `(*spatial, ndim)` coordinate array.
    pub fn from_array(array: ArrayD<f64>) -> Result<Self> {
        check_grid_layout(&array, "coordinate grid")?;
        Ok(Self { array })
    }

    pub fn get(&self) -> &ArrayD<f64> {
        &self.array
    }

    /// The grid shape without the trailing channel axis.
    pub fn spatial_shape(&self) -> &[usize] {
        let nd = self.array.ndim();
        &self.array.shape()[..nd - 1]
    }

    /// Returns a new grid with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            array: &self.array * factor,
        }
    }
}

/// A dense Fourier-space grid, shape `(*spatial, ndim)`, zero frequency at
/// index 0.
///
/// With `half_space` set, only non-negative frequencies are stored along
/// the last spatial axis (see [`make_frequencies`] for the exact axis
/// selection rule).
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    array: ArrayD<f64>,
    half_space: bool,
}

impl FrequencyGrid {
    pub fn new(shape: &[usize], grid_spacing: f64, half_space: bool) -> Result<Self> {
        Ok(Self {
            array: make_frequencies(shape, grid_spacing, half_space)?,
            half_space,
        })
    }

    pub fn get(&self) -> &ArrayD<f64> {
        &self.array
    }

    pub fn half_space(&self) -> bool {
        self.half_space
    }

    /// The grid shape without the trailing channel axis.
    pub fn spatial_shape(&self) -> &[usize] {
        let nd = self.array.ndim();
        &self.array.shape()[..nd - 1]
    }

    /// Returns a new grid with every frequency multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            array: &self.array * factor,
            half_space: self.half_space,
        }
    }
}

/// A 2D frequency grid promoted to a single-slice 3D volume at z = 0,
/// shape `(H, W, 1, 3)`.
///
/// Unlike [`FrequencyGrid`], the zero frequency sits at the grid center:
/// the non-truncated axes are shifted, and a zero z-frequency channel is
/// appended. Suitable for insertion into a centered 3D Fourier volume at
/// zero frequency along z.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySlice {
    array: Array4<f64>,
    half_space: bool,
}

impl FrequencySlice {
    pub fn new(shape: (usize, usize), grid_spacing: f64, half_space: bool) -> Result<Self> {
        let plane = make_frequencies(&[shape.0, shape.1], grid_spacing, half_space)?;

        // Center the zero frequency along every axis the half-space
        // truncation has not already pinned to index 0.
        let shift_axes: &[usize] = if half_space { &[0] } else { &[0, 1] };
        let centered = fft::fftshift(&plane, shift_axes);

        let (h, w) = (centered.shape()[0], centered.shape()[1]);
        let array = Array4::from_shape_fn((h, w, 1, 3), |(i, j, _, c)| {
            if c < 2 { centered[[i, j, c]] } else { 0.0 }
        });
        Ok(Self { array, half_space })
    }

    pub fn get(&self) -> &Array4<f64> {
        &self.array
    }

    pub fn half_space(&self) -> bool {
        self.half_space
    }

    /// Returns a new slice with every frequency multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            array: &self.array * factor,
            half_space: self.half_space,
        }
    }
}

/// Checks the `(*spatial, ndim)` layout: rank 3 or 4, channel extent
/// matching the spatial rank.
fn check_grid_layout(array: &ArrayD<f64>, context: &'static str) -> Result<()> {
    let nd = array.ndim();
    let spatial = nd.saturating_sub(1);
    let channels = if nd == 0 { 0 } else { array.len_of(Axis(nd - 1)) };
    if (spatial != 2 && spatial != 3) || channels != spatial {
        return Err(ExitwaveError::ShapeMismatch {
            context,
            expected: vec![spatial, spatial],
            actual: vec![spatial, channels],
        });
    }
    Ok(())
}
