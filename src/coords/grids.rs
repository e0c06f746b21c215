//! Grid construction kernels for real-space coordinates and Fourier-space
//! frequencies.
//!
//! All grids follow the "xy" meshgrid convention: the first two logical
//! extents are swapped before axis construction, so that in the assembled
//! array channel 0 (x) varies along array axis 1 and channel 1 (y) varies
//! along array axis 0. Any trailing (z) axis stays in natural order. Grids
//! carry physical units: axis values are scaled by the grid spacing.

use ndarray::{Array1, Array3, Array4, ArrayD, Axis, Zip};

use crate::error::{ExitwaveError, Result};

/// Builds a real-space Cartesian coordinate grid of shape `(*shape, ndim)`.
///
/// Each 1D axis holds symmetric integer-like coordinates centered at zero
/// and scaled by `grid_spacing`: for even `n` the values run `-n/2 ..=
/// n/2 - 1` times the spacing, for odd `n` they run `-(n-1)/2 ..=
/// (n-1)/2`. Supported ranks are 2 (images) and 3 (volumes).
pub fn make_coordinates(shape: &[usize], grid_spacing: f64) -> Result<ArrayD<f64>> {
    make_coordinates_or_frequencies(shape, grid_spacing, true, false)
}

/// Builds a Fourier-space frequency grid of shape `(*spatial, ndim)`.
///
/// With `half_space` set, only non-negative frequencies are stored along
/// one axis (the real-FFT convention, zero frequency at index 0): in the
/// 2D case the truncated generator is assigned to swapped-axis index 0,
/// so the stored array has shape `(s0, s1/2 + 1, 2)`; in the 3D case only
/// the last axis is truncated, giving `(s0, s1, s2/2 + 1, 3)`. With
/// `half_space` unset every axis holds the full frequency range. The axis
/// selection determines which half of Fourier space is represented and
/// matches the FFT routines that consume these grids.
pub fn make_frequencies(shape: &[usize], grid_spacing: f64, half_space: bool) -> Result<ArrayD<f64>> {
    make_coordinates_or_frequencies(shape, grid_spacing, false, half_space)
}

/// Converts `(.., 2)`-shaped Cartesian coordinates to polar form.
///
/// Returns `(radius, angle)` with `angle = atan2(coords[.., 0],
/// coords[.., 1])`; the argument order is part of the contract. With
/// `square` set the first component is the squared radius, skipping the
/// root when only `r²` is needed downstream.
pub fn cartesian_to_polar(coords: &ArrayD<f64>, square: bool) -> Result<(ArrayD<f64>, ArrayD<f64>)> {
    let ndim = coords.ndim();
    let channels = coords.shape()[ndim - 1];
    if channels != 2 {
        return Err(ExitwaveError::ShapeMismatch {
            context: "cartesian_to_polar",
            expected: vec![2],
            actual: vec![channels],
        });
    }

    let x = coords.index_axis(Axis(ndim - 1), 0);
    let y = coords.index_axis(Axis(ndim - 1), 1);

    let radius_sq = Zip::from(&x).and(&y).map_collect(|&a, &b| a * a + b * b);
    let angle = Zip::from(&x).and(&y).map_collect(|&a, &b| a.atan2(b));

    let radius = if square {
        radius_sq
    } else {
        radius_sq.mapv(f64::sqrt)
    };
    Ok((radius, angle))
}

/// Builds one 1D axis, in real space or frequency space.
///
/// `half_axis` selects between the truncated non-negative layout and the
/// full layout; it is required whenever `real_space` is false.
pub(crate) fn make_axis_1d(
    size: usize,
    grid_spacing: f64,
    real_space: bool,
    half_axis: Option<bool>,
) -> Result<Array1<f64>> {
    if size == 0 {
        return Err(ExitwaveError::invalid("size", "axis extent must be at least 1"));
    }
    if !(grid_spacing > 0.0) {
        return Err(ExitwaveError::invalid(
            "grid_spacing",
            format!("must be strictly positive, got {grid_spacing}"),
        ));
    }

    if real_space {
        // fftshift(fftfreq(n, 1/dx)) * n: integer offsets from -n/2, scaled.
        let offset = (size / 2) as f64;
        return Ok(Array1::from_shape_fn(size, |i| (i as f64 - offset) * grid_spacing));
    }

    match half_axis {
        Some(true) => {
            let n_half = size / 2 + 1;
            let norm = size as f64 * grid_spacing;
            Ok(Array1::from_shape_fn(n_half, |k| k as f64 / norm))
        }
        Some(false) => {
            let split = size.div_ceil(2);
            let norm = size as f64 * grid_spacing;
            Ok(Array1::from_shape_fn(size, |k| {
                if k < split {
                    k as f64 / norm
                } else {
                    (k as f64 - size as f64) / norm
                }
            }))
        }
        None => Err(ExitwaveError::invalid(
            "half_axis",
            "required when real_space is false",
        )),
    }
}

fn make_coordinates_or_frequencies(
    shape: &[usize],
    grid_spacing: f64,
    real_space: bool,
    half_space: bool,
) -> Result<ArrayD<f64>> {
    let ndim = shape.len();
    if ndim != 2 && ndim != 3 {
        return Err(ExitwaveError::invalid(
            "shape",
            format!("expected rank 2 or 3, got rank {ndim}"),
        ));
    }

    // The "xy" convention swaps the first two extents before axis
    // construction; generator index idx feeds channel idx of the output.
    let mut swapped: Vec<usize> = shape.to_vec();
    swapped.swap(0, 1);

    let mut axes: Vec<Array1<f64>> = Vec::with_capacity(ndim);
    for (idx, &size) in swapped.iter().enumerate() {
        let half_axis = if real_space {
            None
        } else if !half_space {
            Some(false)
        } else if ndim == 2 {
            Some(idx == 0)
        } else {
            Some(idx == ndim - 1)
        };
        axes.push(make_axis_1d(size, grid_spacing, real_space, half_axis)?);
    }

    // Channel 0 varies along array axis 1, channel 1 along array axis 0,
    // trailing channels along their own axis.
    let grid = match ndim {
        2 => {
            let (c0, c1) = (&axes[0], &axes[1]);
            Array3::from_shape_fn((c1.len(), c0.len(), 2), |(i, j, c)| {
                if c == 0 { c0[j] } else { c1[i] }
            })
            .into_dyn()
        }
        _ => {
            let (c0, c1, c2) = (&axes[0], &axes[1], &axes[2]);
            Array4::from_shape_fn((c1.len(), c0.len(), c2.len(), 3), |(i, j, k, c)| match c {
                0 => c0[j],
                1 => c1[i],
                _ => c2[k],
            })
            .into_dyn()
        }
    };
    Ok(grid)
}
