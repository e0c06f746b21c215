//! Stochastic ice-background models.
//!
//! An ice model samples a complex field over an image's Fourier-space
//! shape from an explicit seed; there is no global RNG state, and the
//! same seed over the same grid reproduces the field bit for bit.

use log::debug;
use ndarray::{Array2, ArrayD, IxDyn};
use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{ExitwaveError, Result};
use crate::image::kernels::{FourierExp2D, FourierOperator};
use crate::image::ImageConfig;

/// A stochastic ice model sampled at the exit plane.
pub trait Ice: Send + Sync {
    /// Samples a realization of the ice over a `(*, ndim)` frequency
    /// grid, returning a field of the grid's spatial shape.
    fn sample(&self, seed: u64, frequency_grid: &ArrayD<f64>) -> Result<ArrayD<Complex64>>;

    /// Computes a realization of the ice surrounding a specimen.
    ///
    /// Threads the configuration's padded frequency grid (in reciprocal
    /// angstroms) into [`Ice::sample`]. The exit-plane image is part of
    /// the call contract but does not enter the result.
    #[allow(unused_variables)]
    fn render(
        &self,
        seed: u64,
        image_at_exit_plane: &Array2<Complex64>,
        config: &ImageConfig,
    ) -> Result<ArrayD<Complex64>> {
        let padded = config.padded_frequency_grid_in_angstroms();
        self.sample(seed, padded.get())
    }
}

/// The "no ice" model: every realization is identically zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NullIce;

impl Ice for NullIce {
    fn sample(&self, _seed: u64, frequency_grid: &ArrayD<f64>) -> Result<ArrayD<Complex64>> {
        let spatial = spatial_shape(frequency_grid)?;
        Ok(ArrayD::from_elem(spatial, Complex64::new(0.0, 0.0)))
    }
}

/// Ice modeled as Gaussian noise with a frequency-dependent variance.
///
/// Real and imaginary parts are independent standard-normal draws (real
/// then imaginary per element, row-major), scaled pointwise by the
/// variance kernel evaluated at the frequency grid. The DC term is
/// forced to exactly `0 + 0i`: ice noise contributes no net mass offset.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianIce<V: FourierOperator = FourierExp2D> {
    variance: V,
}

impl<V: FourierOperator> GaussianIce<V> {
    pub fn new(variance: V) -> Self {
        Self { variance }
    }

    pub fn variance(&self) -> &V {
        &self.variance
    }
}

impl Default for GaussianIce<FourierExp2D> {
    fn default() -> Self {
        Self {
            variance: FourierExp2D::default(),
        }
    }
}

impl<V: FourierOperator> Ice for GaussianIce<V> {
    fn sample(&self, seed: u64, frequency_grid: &ArrayD<f64>) -> Result<ArrayD<Complex64>> {
        let variance = self.variance.evaluate(frequency_grid)?;
        debug!(
            "sampling gaussian ice over {:?} with seed {seed}",
            variance.shape()
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut field = ArrayD::from_shape_fn(variance.raw_dim(), |_| {
            let re: f64 = StandardNormal.sample(&mut rng);
            let im: f64 = StandardNormal.sample(&mut rng);
            Complex64::new(re, im)
        });
        field.zip_mut_with(&variance, |v, &var| *v *= var);

        let dc = IxDyn(&vec![0; field.ndim()]);
        field[dc] = Complex64::new(0.0, 0.0);
        Ok(field)
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::make_frequencies;
    use crate::image::kernels::Constant;

    #[test]
    fn null_ice_is_identically_zero() {
        let grid = make_frequencies(&[6, 6], 1.0, true).unwrap();
        let field = NullIce.sample(3, &grid).unwrap();
        assert_eq!(field.shape(), &[6, 4]);
        assert!(field.iter().all(|v| v.re == 0.0 && v.im == 0.0));
    }

    #[test]
    fn gaussian_ice_zeroes_the_dc_term() {
        let grid = make_frequencies(&[8, 8], 1.0, true).unwrap();
        let ice = GaussianIce::default();
        for seed in 0..16 {
            let field = ice.sample(seed, &grid).unwrap();
            assert_eq!(field[[0, 0]], Complex64::new(0.0, 0.0));
        }
    }

    #[test]
    fn same_seed_reproduces_the_field_exactly() {
        let grid = make_frequencies(&[8, 8], 0.5, true).unwrap();
        let ice = GaussianIce::default();
        let first = ice.sample(42, &grid).unwrap();
        let second = ice.sample(42, &grid).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_differ() {
        let grid = make_frequencies(&[8, 8], 0.5, true).unwrap();
        let ice = GaussianIce::default();
        let first = ice.sample(1, &grid).unwrap();
        let second = ice.sample(2, &grid).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn the_variance_kernel_scales_the_draws() {
        let grid = make_frequencies(&[6, 6], 1.0, true).unwrap();
        let unit = GaussianIce::new(Constant::new(1.0)).sample(9, &grid).unwrap();
        let doubled = GaussianIce::new(Constant::new(2.0)).sample(9, &grid).unwrap();
        for (a, b) in unit.iter().zip(doubled.iter()) {
            assert_eq!(*b, *a * 2.0);
        }
    }

    #[test]
    fn render_samples_on_the_padded_grid() {
        let config = ImageConfig::new((8, 8), 1.5, 1.5).unwrap();
        let exit_plane = Array2::from_elem((8, 8), Complex64::new(1.0, 0.0));

        let field = GaussianIce::default().render(7, &exit_plane, &config).unwrap();
        assert_eq!(field.shape(), &[12, 7]);

        // render(seed) is sample(seed) on the padded angstrom grid.
        let direct = GaussianIce::default()
            .sample(7, config.padded_frequency_grid_in_angstroms().get())
            .unwrap();
        assert_eq!(field, direct);
    }

    #[test]
    fn degenerate_grids_are_rejected() {
        let flat = ArrayD::zeros(IxDyn(&[4]));
        assert!(NullIce.sample(0, &flat).is_err());
    }
}
