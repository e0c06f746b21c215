//! The voxel rasterization kernel: atoms to real-space density.

use log::debug;
use ndarray::{Array2, Array3, Array4, Axis, Zip};

use crate::error::{ExitwaveError, Result};

/// Rasterizes a Gaussian-sum atomic model onto a real-space voxel grid.
///
/// Every voxel receives the sum over atoms and Gaussian terms of
///
/// ```text
/// a * (4*pi / b)^(3/2) * exp(-4*pi^2 * |r - r_atom|^2 / b)
/// ```
///
/// evaluated at the voxel's physical coordinates. The prefactor
/// normalizes each term to unit integral times its amplitude, so the
/// total density integral (sum times voxel volume) equals `sum(ff_a)`
/// independent of grid resolution, up to discretization error.
///
/// `atom_positions` is `(n_atoms, 3)` in the same physical units as the
/// grid; `ff_a` and `ff_b` are `(n_atoms, n_terms)` amplitude and
/// squared-width matrices; `coordinate_grid` is `(*grid_shape, 3)`.
pub fn build_real_space_voxels_from_atoms(
    atom_positions: &Array2<f64>,
    ff_a: &Array2<f64>,
    ff_b: &Array2<f64>,
    coordinate_grid: &Array4<f64>,
) -> Result<Array3<f64>> {
    let n_atoms = atom_positions.nrows();
    if atom_positions.ncols() != 3 {
        return Err(ExitwaveError::invalid(
            "atom_positions",
            format!(
                "positions must have 3 components, got {}",
                atom_positions.ncols()
            ),
        ));
    }
    if ff_a.dim() != ff_b.dim() || ff_a.nrows() != n_atoms {
        return Err(ExitwaveError::invalid(
            "ff_a/ff_b",
            format!(
                "parameter matrices must both be ({n_atoms}, n_terms), got {:?} and {:?}",
                ff_a.dim(),
                ff_b.dim()
            ),
        ));
    }
    if let Some(&bad) = ff_b.iter().find(|&&b| !(b > 0.0)) {
        return Err(ExitwaveError::invalid(
            "ff_b",
            format!("widths must be strictly positive, got {bad}"),
        ));
    }
    if coordinate_grid.len_of(Axis(3)) != 3 {
        return Err(ExitwaveError::ShapeMismatch {
            context: "voxel rasterization",
            expected: vec![3],
            actual: vec![coordinate_grid.len_of(Axis(3))],
        });
    }

    let (d0, d1, d2, _) = coordinate_grid.dim();
    let n_terms = ff_a.ncols();
    debug!("rasterizing {n_atoms} atoms x {n_terms} terms onto ({d0}, {d1}, {d2})");

    let four_pi = 4.0 * std::f64::consts::PI;
    let prefactor =
        Zip::from(ff_a).and(ff_b).map_collect(|&a, &b| a * (four_pi / b).powf(1.5));
    let decay = ff_b.mapv(|b| four_pi * std::f64::consts::PI / b);

    let mut density = Array3::<f64>::zeros((d0, d1, d2));
    Zip::indexed(&mut density).par_for_each(|(i, j, k), voxel| {
        let x = coordinate_grid[[i, j, k, 0]];
        let y = coordinate_grid[[i, j, k, 1]];
        let z = coordinate_grid[[i, j, k, 2]];

        let mut total = 0.0;
        for atom in 0..n_atoms {
            let dx = x - atom_positions[[atom, 0]];
            let dy = y - atom_positions[[atom, 1]];
            let dz = z - atom_positions[[atom, 2]];
            let r_sq = dx * dx + dy * dy + dz * dz;
            for term in 0..n_terms {
                total += prefactor[[atom, term]] * (-decay[[atom, term]] * r_sq).exp();
            }
        }
        *voxel = total;
    });
    Ok(density)
}
