//! Forward-model cryo-EM image formation.
//!
//! This crate simulates the image-formation pipeline of cryo-electron
//! microscopy from atomic models: coordinate grids in real and Fourier
//! space, voxel densities rasterized from Gaussian-sum atomic scattering
//! factors, and the per-pixel operators (masks, stochastic ice
//! background) that compose into a simulated micrograph.
//!
//! Everything is synchronous and purely functional: entities are built
//! once from validated parameters and never mutated, and all randomness
//! is driven by explicit seeds.

pub mod coords;
pub mod density;
pub mod error;
pub mod ice;
pub mod image;

// Re-exports for easier access
pub use coords::{
    CoordinateGrid, CoordinateList, FrequencyGrid, FrequencySlice, cartesian_to_polar,
    make_coordinates, make_frequencies,
};
pub use density::{
    FormFactorParams, FormFactorTable, FourierVoxelGrid, RealVoxelGrid,
    build_real_space_voxels_from_atoms, get_form_factor_params,
};
pub use error::{ExitwaveError, Result};
pub use ice::{GaussianIce, Ice, NullIce};
pub use image::{
    CircularMask, Constant, CustomMask, DEFAULT_ROLLOFF, FourierExp2D, FourierOperator,
    ImageConfig, Mask,
};
