//! Frequency-dependent kernels evaluated on frequency grids.
//!
//! These are the pluggable variance strategies consumed by the stochastic
//! ice models: a kernel maps a `(*, ndim)` frequency grid to a real field
//! over its spatial shape.

use ndarray::{ArrayD, Axis};

use crate::error::{ExitwaveError, Result};

/// A real-valued field over Fourier space.
pub trait FourierOperator: Send + Sync {
    /// Evaluates the kernel at every point of a `(*, ndim)` frequency
    /// grid, returning an array of the grid's spatial shape.
    fn evaluate(&self, frequency_grid: &ArrayD<f64>) -> Result<ArrayD<f64>>;
}

/// Power spectrum of a 2D real-space exponential decay.
///
/// In real space the kernel is `g(r) = amplitude / (2 pi scale^2) *
/// exp(-r / scale)`; its 2D Hankel transform pair is
/// `P(k) = amplitude / (2 pi scale^3) * (scale^-2 + |k|^2)^(-3/2)`,
/// which is what `evaluate` returns. `scale` has units of length.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierExp2D {
    amplitude: f64,
    scale: f64,
}

impl FourierExp2D {
    pub fn new(amplitude: f64, scale: f64) -> Result<Self> {
        if !(scale > 0.0) {
            return Err(ExitwaveError::invalid(
                "scale",
                format!("must be strictly positive, got {scale}"),
            ));
        }
        Ok(Self { amplitude, scale })
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for FourierExp2D {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            scale: 1.0,
        }
    }
}

impl FourierOperator for FourierExp2D {
    fn evaluate(&self, frequency_grid: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        let k_sqr = radial_component_squared(frequency_grid)?;
        let prefactor = self.amplitude / (2.0 * std::f64::consts::PI * self.scale.powi(3));
        let inv_scale_sqr = self.scale.powi(-2);
        Ok(k_sqr.mapv(|k2| prefactor * (inv_scale_sqr + k2).powf(-1.5)))
    }
}

/// A uniform field, independent of frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl FourierOperator for Constant {
    fn evaluate(&self, frequency_grid: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        let spatial = spatial_shape(frequency_grid)?;
        Ok(ArrayD::from_elem(spatial, self.value))
    }
}

/// Sums squares over the trailing channel axis.
fn radial_component_squared(grid: &ArrayD<f64>) -> Result<ArrayD<f64>> {
    let nd = grid.ndim();
    if nd < 2 {
        return Err(ExitwaveError::invalid(
            "frequency_grid",
            format!("expected a (*, ndim) grid, got rank {nd}"),
        ));
    }
    Ok(grid.map_axis(Axis(nd - 1), |lane| lane.iter().map(|v| v * v).sum()))
}

fn spatial_shape(grid: &ArrayD<f64>) -> Result<Vec<usize>> {
    let nd = grid.ndim();
    if nd < 2 {
        return Err(ExitwaveError::invalid(
            "frequency_grid",
            format!("expected a (*, ndim) grid, got rank {nd}"),
        ));
    }
    Ok(grid.shape()[..nd - 1].to_vec())
}
