//! Volumetric density representations of a specimen.
//!
//! A voxel grid is built once per conformation from atom positions,
//! per-element scattering parameters, and a coordinate grid, then never
//! mutated. [`RealVoxelGrid`] holds the density in real space;
//! [`FourierVoxelGrid`] holds its centered spectrum plus the frequency
//! slice used for central-slice extraction downstream.

pub mod atoms;
pub mod form_factors;

pub use atoms::build_real_space_voxels_from_atoms;
pub use form_factors::{
    DEFAULT_FORM_FACTORS, FormFactorParams, FormFactorTable, get_form_factor_params,
};

use log::debug;
use ndarray::{Array2, Array3, Array4, Axis};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::coords::{CoordinateGrid, FrequencySlice};
use crate::error::{ExitwaveError, Result};
use crate::image::fft;

/// A real-space density volume over a coordinate grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RealVoxelGrid {
    density_grid: Array3<f64>,
    voxel_size: f64,
}

impl RealVoxelGrid {
    /// Builds the density for one conformation, resolving scattering
    /// parameters from the built-in form-factor table.
    pub fn from_atoms(
        atom_positions: &Array2<f64>,
        atom_elements: &[u32],
        voxel_size: f64,
        coordinate_grid: &CoordinateGrid,
    ) -> Result<Self> {
        let (ff_a, ff_b) = resolve_params(atom_positions, atom_elements)?;
        Self::from_gaussians(atom_positions, &ff_a, &ff_b, voxel_size, coordinate_grid)
    }

    /// Builds the density from explicit `(n_atoms, n_terms)` Gaussian
    /// parameter matrices.
    pub fn from_gaussians(
        atom_positions: &Array2<f64>,
        ff_a: &Array2<f64>,
        ff_b: &Array2<f64>,
        voxel_size: f64,
        coordinate_grid: &CoordinateGrid,
    ) -> Result<Self> {
        check_voxel_size(voxel_size)?;
        let grid = as_volume_grid(coordinate_grid)?;
        let density_grid = build_real_space_voxels_from_atoms(atom_positions, ff_a, ff_b, &grid)?;
        Ok(Self {
            density_grid,
            voxel_size,
        })
    }

    /// Builds one density volume per frame of a `(frames, n_atoms, 3)`
    /// trajectory.
    ///
    /// Frames are independent: each runs the single-frame kernel with no
    /// shared state, in parallel, and frame order is preserved. Frame `i`
    /// of the result is identical to a direct call on frame `i`.
    pub fn from_trajectory(
        trajectory: &Array3<f64>,
        atom_elements: &[u32],
        voxel_size: f64,
        coordinate_grid: &CoordinateGrid,
    ) -> Result<Vec<Self>> {
        let n_frames = trajectory.len_of(Axis(0));
        if n_frames == 0 {
            return Err(ExitwaveError::invalid(
                "trajectory",
                "at least one frame is required",
            ));
        }
        let first = trajectory.index_axis(Axis(0), 0).to_owned();
        let (ff_a, ff_b) = resolve_params(&first, atom_elements)?;
        debug!("building {n_frames} voxel grids from a trajectory");

        trajectory
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|frame| {
                Self::from_gaussians(
                    &frame.to_owned(),
                    &ff_a,
                    &ff_b,
                    voxel_size,
                    coordinate_grid,
                )
            })
            .collect()
    }

    pub fn density_grid(&self) -> &Array3<f64> {
        &self.density_grid
    }

    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }
}

/// A Fourier-space density volume with the zero frequency at the center.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierVoxelGrid {
    fourier_density_grid: Array3<Complex64>,
    frequency_slice: FrequencySlice,
    voxel_size: f64,
}

impl FourierVoxelGrid {
    /// Builds the centered spectrum of the real-space density for one
    /// conformation.
    ///
    /// The real-space volume follows the "xy" grid convention (channel 0
    /// varies along array axis 1); the spectrum is taken over natural
    /// axis order, so the axes are permuted `[1, 0, 2]` before the
    /// transform: `fftshift(fftn(transpose(real, [1, 0, 2])))`.
    /// `ifftn(ifftshift(..))` therefore recovers the real-space density
    /// up to that fixed permutation.
    pub fn from_atoms(
        atom_positions: &Array2<f64>,
        atom_elements: &[u32],
        voxel_size: f64,
        coordinate_grid: &CoordinateGrid,
    ) -> Result<Self> {
        let real = RealVoxelGrid::from_atoms(
            atom_positions,
            atom_elements,
            voxel_size,
            coordinate_grid,
        )?;

        let transposed = real.density_grid().clone().permuted_axes([1, 0, 2]);
        let complex = transposed.map(|&v| Complex64::new(v, 0.0));
        let spectrum = fft::fftn(&complex);
        let fourier_density_grid = fft::fftshift(&spectrum, &[0, 1, 2]);

        let (h, w, _) = fourier_density_grid.dim();
        let frequency_slice = FrequencySlice::new((h, w), 1.0, false)?;
        debug!("built a centered ({h}, {w}) Fourier voxel grid");

        Ok(Self {
            fourier_density_grid,
            frequency_slice,
            voxel_size,
        })
    }

    pub fn fourier_density_grid(&self) -> &Array3<Complex64> {
        &self.fourier_density_grid
    }

    /// The centered z = 0 frequency slice matching the stored spectrum,
    /// in units of the voxel-grid sampling.
    pub fn frequency_slice(&self) -> &FrequencySlice {
        &self.frequency_slice
    }

    /// The frequency slice in reciprocal physical units.
    pub fn frequency_slice_in_angstroms(&self) -> FrequencySlice {
        self.frequency_slice.scaled(self.voxel_size.recip())
    }

    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }
}

fn check_voxel_size(voxel_size: f64) -> Result<()> {
    if !(voxel_size > 0.0) {
        return Err(ExitwaveError::invalid(
            "voxel_size",
            format!("must be strictly positive, got {voxel_size}"),
        ));
    }
    Ok(())
}

fn resolve_params(
    atom_positions: &Array2<f64>,
    atom_elements: &[u32],
) -> Result<(Array2<f64>, Array2<f64>)> {
    if atom_elements.len() != atom_positions.nrows() {
        return Err(ExitwaveError::invalid(
            "atom_elements",
            format!(
                "expected one element per atom ({}), got {}",
                atom_positions.nrows(),
                atom_elements.len()
            ),
        ));
    }
    get_form_factor_params(atom_elements)
}

/// Converts a wrapped grid into the `(*volume, 3)` array the kernel takes.
fn as_volume_grid(coordinate_grid: &CoordinateGrid) -> Result<Array4<f64>> {
    coordinate_grid
        .get()
        .clone()
        .into_dimensionality::<ndarray::Ix4>()
        .map_err(|_| ExitwaveError::ShapeMismatch {
            context: "voxel rasterization",
            expected: vec![0, 0, 0, 3],
            actual: coordinate_grid.get().shape().to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn element_count_must_match_positions() {
        let positions = arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let grid = CoordinateGrid::new(&[6, 6, 6], 1.0).unwrap();
        let err = RealVoxelGrid::from_atoms(&positions, &[1], 1.0, &grid).unwrap_err();
        assert!(err.to_string().contains("atom_elements"));
    }

    #[test]
    fn planar_grids_are_rejected() {
        let positions = arr2(&[[0.0, 0.0, 0.0]]);
        let grid = CoordinateGrid::new(&[6, 6], 1.0).unwrap();
        assert!(RealVoxelGrid::from_atoms(&positions, &[1], 1.0, &grid).is_err());
    }

    #[test]
    fn voxel_size_must_be_positive() {
        let positions = arr2(&[[0.0, 0.0, 0.0]]);
        let grid = CoordinateGrid::new(&[6, 6, 6], 1.0).unwrap();
        assert!(RealVoxelGrid::from_atoms(&positions, &[1], 0.0, &grid).is_err());
        assert!(RealVoxelGrid::from_atoms(&positions, &[1], -0.5, &grid).is_err());
    }

    #[test]
    fn empty_trajectories_are_rejected() {
        let trajectory = Array3::<f64>::zeros((0, 2, 3));
        let grid = CoordinateGrid::new(&[6, 6, 6], 1.0).unwrap();
        assert!(RealVoxelGrid::from_trajectory(&trajectory, &[1, 1], 1.0, &grid).is_err());
    }

    #[test]
    fn fourier_grid_records_its_slice_geometry() {
        let positions = arr2(&[[0.0, 0.0, 0.0]]);
        let grid = CoordinateGrid::new(&[8, 8, 8], 0.5).unwrap();
        let vg = FourierVoxelGrid::from_atoms(&positions, &[6], 0.5, &grid).unwrap();

        assert_eq!(vg.fourier_density_grid().dim(), (8, 8, 8));
        assert_eq!(vg.frequency_slice().get().dim(), (8, 8, 1, 3));
        // The centered slice holds zero frequency at the grid center.
        assert_eq!(vg.frequency_slice().get()[[4, 4, 0, 0]], 0.0);

        let in_angstroms = vg.frequency_slice_in_angstroms();
        assert_eq!(
            in_angstroms.get()[[4, 5, 0, 0]],
            vg.frequency_slice().get()[[4, 5, 0, 0]] * 2.0
        );
    }
}
