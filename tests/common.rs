//! Shared fixtures for exitwave integration tests.

use ndarray::{Array2, arr2};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// A small cloud of four atoms with two-term Gaussian parameters, plus a
/// grid geometry sized to contain the density tails.
///
/// Positions sit on grid points of the returned geometry so maximum-
/// location assertions are exact; widths are broad relative to the voxel
/// size so integral assertions see negligible discretization error.
pub struct ToyGaussianCloud {
    pub atom_positions: Array2<f64>,
    pub ff_a: Array2<f64>,
    pub ff_b: Array2<f64>,
    pub n_voxels_per_side: usize,
    pub voxel_size: f64,
}

pub fn toy_gaussian_cloud() -> ToyGaussianCloud {
    ToyGaussianCloud {
        atom_positions: arr2(&[
            [1.0, 1.0, 0.0],
            [-1.0, 0.0, 1.0],
            [0.0, -1.0, -1.0],
            [1.0, -1.0, 1.0],
        ]),
        ff_a: arr2(&[
            [1.0, 0.5],
            [0.75, 0.75],
            [1.25, 0.25],
            [0.5, 1.0],
        ]),
        ff_b: arr2(&[
            [40.0, 25.0],
            [35.0, 30.0],
            [45.0, 20.0],
            [30.0, 40.0],
        ]),
        n_voxels_per_side: 24,
        voxel_size: 0.5,
    }
}

/// The element identifiers matching [`toy_gaussian_cloud`]'s four atoms,
/// for the table-resolving constructors.
pub fn toy_cloud_elements() -> Vec<u32> {
    vec![1, 1, 2, 6]
}

/// Jitters atom positions reproducibly, for synthetic trajectories.
pub fn jitter_positions(positions: &Array2<f64>, amplitude: f64, rng: &mut ChaCha8Rng) -> Array2<f64> {
    positions.mapv(|p| p + rng.gen_range(-amplitude..amplitude))
}
