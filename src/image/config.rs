//! Image-plane configuration: detector shape, pixel size, and the padded
//! coordinate/frequency grids derived from them.

use log::debug;

use crate::coords::{CoordinateGrid, FrequencyGrid};
use crate::error::{ExitwaveError, Result};

/// Detector geometry plus the grids every image-plane operator consumes.
///
/// Grids are built once, in pixel units, at construction; the angstrom
/// accessors return freshly scaled instances (coordinates scale with the
/// pixel size, frequencies with its reciprocal). The padded variants cover
/// `floor(extent * pad_scale)` pixels per axis and are what Fourier-space
/// operators sample on before the final crop.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    shape: (usize, usize),
    pixel_size: f64,
    pad_scale: f64,
    coordinate_grid: CoordinateGrid,
    frequency_grid: FrequencyGrid,
    padded_coordinate_grid: CoordinateGrid,
    padded_frequency_grid: FrequencyGrid,
}

impl ImageConfig {
    /// Validates the geometry and builds the four pixel-unit grids.
    ///
    /// `pixel_size` is in angstroms per pixel and must be strictly
    /// positive; `pad_scale` must be at least 1.
    pub fn new(shape: (usize, usize), pixel_size: f64, pad_scale: f64) -> Result<Self> {
        if shape.0 == 0 || shape.1 == 0 {
            return Err(ExitwaveError::invalid(
                "shape",
                format!("extents must be at least 1, got {shape:?}"),
            ));
        }
        if !(pixel_size > 0.0) {
            return Err(ExitwaveError::invalid(
                "pixel_size",
                format!("must be strictly positive, got {pixel_size}"),
            ));
        }
        if !(pad_scale >= 1.0) {
            return Err(ExitwaveError::invalid(
                "pad_scale",
                format!("must be at least 1, got {pad_scale}"),
            ));
        }

        let padded = (
            (shape.0 as f64 * pad_scale) as usize,
            (shape.1 as f64 * pad_scale) as usize,
        );
        debug!("image config: shape {shape:?}, padded {padded:?}, pixel size {pixel_size}");

        Ok(Self {
            shape,
            pixel_size,
            pad_scale,
            coordinate_grid: CoordinateGrid::new(&[shape.0, shape.1], 1.0)?,
            frequency_grid: FrequencyGrid::new(&[shape.0, shape.1], 1.0, true)?,
            padded_coordinate_grid: CoordinateGrid::new(&[padded.0, padded.1], 1.0)?,
            padded_frequency_grid: FrequencyGrid::new(&[padded.0, padded.1], 1.0, true)?,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Per-axis `floor(extent * pad_scale)`.
    pub fn padded_shape(&self) -> (usize, usize) {
        let nd = self.padded_coordinate_grid.spatial_shape();
        (nd[0], nd[1])
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    pub fn pad_scale(&self) -> f64 {
        self.pad_scale
    }

    pub fn coordinate_grid_in_pixels(&self) -> &CoordinateGrid {
        &self.coordinate_grid
    }

    pub fn frequency_grid_in_pixels(&self) -> &FrequencyGrid {
        &self.frequency_grid
    }

    pub fn padded_coordinate_grid_in_pixels(&self) -> &CoordinateGrid {
        &self.padded_coordinate_grid
    }

    pub fn padded_frequency_grid_in_pixels(&self) -> &FrequencyGrid {
        &self.padded_frequency_grid
    }

    pub fn coordinate_grid_in_angstroms(&self) -> CoordinateGrid {
        self.coordinate_grid.scaled(self.pixel_size)
    }

    /// Frequencies in reciprocal angstroms.
    pub fn frequency_grid_in_angstroms(&self) -> FrequencyGrid {
        self.frequency_grid.scaled(self.pixel_size.recip())
    }

    pub fn padded_coordinate_grid_in_angstroms(&self) -> CoordinateGrid {
        self.padded_coordinate_grid.scaled(self.pixel_size)
    }

    /// Padded frequencies in reciprocal angstroms; the grid stochastic
    /// Fourier-space operators sample on.
    pub fn padded_frequency_grid_in_angstroms(&self) -> FrequencyGrid {
        self.padded_frequency_grid.scaled(self.pixel_size.recip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn padded_shape_truncates() {
        let config = ImageConfig::new((10, 10), 1.0, 1.5).unwrap();
        assert_eq!(config.padded_shape(), (15, 15));

        let config = ImageConfig::new((10, 10), 1.0, 1.34).unwrap();
        assert_eq!(config.padded_shape(), (13, 13));

        let config = ImageConfig::new((10, 10), 1.0, 1.0).unwrap();
        assert_eq!(config.padded_shape(), (10, 10));
    }

    #[test]
    fn frequency_grids_use_the_half_space_convention() {
        let config = ImageConfig::new((8, 8), 2.0, 1.5).unwrap();
        assert_eq!(config.frequency_grid_in_pixels().spatial_shape(), &[8, 5]);
        assert_eq!(
            config.padded_frequency_grid_in_pixels().spatial_shape(),
            &[12, 7]
        );
        assert!(config.padded_frequency_grid_in_pixels().half_space());
    }

    #[test]
    fn angstrom_grids_are_scaled_copies() {
        let config = ImageConfig::new((4, 4), 2.5, 1.0).unwrap();

        let pixels = config.coordinate_grid_in_pixels().get();
        let angstroms = config.coordinate_grid_in_angstroms();
        assert_relative_eq!(angstroms.get()[[0, 0, 0]], pixels[[0, 0, 0]] * 2.5);

        let freq_pixels = config.frequency_grid_in_pixels().get();
        let freq_angstroms = config.frequency_grid_in_angstroms();
        assert_relative_eq!(
            freq_angstroms.get()[[0, 1, 0]],
            freq_pixels[[0, 1, 0]] / 2.5
        );
    }

    #[test]
    fn geometry_is_validated() {
        assert!(ImageConfig::new((0, 4), 1.0, 1.0).is_err());
        assert!(ImageConfig::new((4, 4), 0.0, 1.0).is_err());
        assert!(ImageConfig::new((4, 4), -1.0, 1.0).is_err());
        assert!(ImageConfig::new((4, 4), 1.0, 0.99).is_err());
    }
}
