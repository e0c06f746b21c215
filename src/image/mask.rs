//! Multiplicative masks over images and volumes.
//!
//! A mask is a real-valued buffer built once from a coordinate grid and
//! never mutated; applying it multiplies elementwise. The buffer is a
//! fixed geometric window, not a fit parameter: its construction scalars
//! are stored beside it, and nothing downstream writes to it.

use log::debug;
use ndarray::{Array, ArrayD, Axis, Dimension};

use crate::coords::CoordinateGrid;
use crate::error::{ExitwaveError, Result};

/// Default rolloff fraction for [`CircularMask`].
pub const DEFAULT_ROLLOFF: f64 = 0.05;

/// A precomputed multiplicative window.
pub trait Mask {
    /// The window, matching the shape of the images it applies to.
    fn buffer(&self) -> &ArrayD<f64>;

    /// Multiplies an image or volume by the window.
    fn apply<D>(&self, image: &Array<f64, D>) -> Result<Array<f64, D>>
    where
        D: Dimension,
    {
        let buffer = self.buffer();
        if image.shape() != buffer.shape() {
            return Err(ExitwaveError::ShapeMismatch {
                context: "mask apply",
                expected: buffer.shape().to_vec(),
                actual: image.shape().to_vec(),
            });
        }
        let window = buffer
            .view()
            .into_dimensionality::<D>()
            .map_err(|_| ExitwaveError::ShapeMismatch {
                context: "mask apply",
                expected: buffer.shape().to_vec(),
                actual: image.shape().to_vec(),
            })?;
        Ok(image * &window)
    }
}

/// A circular window with a raised-cosine edge.
///
/// Weights are 1.0 up to `radius - rolloff_width`, 0.0 beyond `radius`,
/// and taper smoothly in between. The rolloff width is `rolloff` times the
/// largest radial coordinate of the grid the mask was built on, so two
/// grids of different extents get different absolute taper widths from the
/// same fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularMask {
    radius: f64,
    rolloff: f64,
    buffer: ArrayD<f64>,
}

impl CircularMask {
    /// Builds the window over a coordinate grid in physical units.
    ///
    /// `rolloff` is a fraction in `[0, 1]`; zero degenerates to a hard
    /// step at `radius`.
    pub fn new(coordinate_grid: &CoordinateGrid, radius: f64, rolloff: f64) -> Result<Self> {
        if !(radius > 0.0) {
            return Err(ExitwaveError::invalid(
                "radius",
                format!("must be strictly positive, got {radius}"),
            ));
        }
        if !(0.0..=1.0).contains(&rolloff) {
            return Err(ExitwaveError::invalid(
                "rolloff",
                format!("must lie in [0, 1], got {rolloff}"),
            ));
        }

        let grid = coordinate_grid.get();
        let nd = grid.ndim();
        let radial = grid.map_axis(Axis(nd - 1), |lane| {
            lane.iter().map(|v| v * v).sum::<f64>().sqrt()
        });
        let max_radius = radial.iter().fold(0.0_f64, |m, &r| m.max(r));
        let rolloff_width = rolloff * max_radius;
        debug!(
            "circular mask over {:?}: radius {radius}, rolloff width {rolloff_width}",
            coordinate_grid.spatial_shape()
        );

        let buffer = radial.mapv(|r| {
            if r > radius {
                0.0
            } else if r <= radius - rolloff_width {
                1.0
            } else {
                0.5 * (1.0
                    + (std::f64::consts::PI * (r - radius - rolloff_width) / rolloff_width).cos())
            }
        });
        Ok(Self {
            radius,
            rolloff,
            buffer,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn rolloff(&self) -> f64 {
        self.rolloff
    }
}

impl Mask for CircularMask {
    fn buffer(&self) -> &ArrayD<f64> {
        &self.buffer
    }
}

/// A window supplied by the caller, applied as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomMask {
    buffer: ArrayD<f64>,
}

impl CustomMask {
    pub fn new(buffer: ArrayD<f64>) -> Self {
        Self { buffer }
    }
}

impl Mask for CustomMask {
    fn buffer(&self) -> &ArrayD<f64> {
        &self.buffer
    }
}
