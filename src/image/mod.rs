//! Image-plane building blocks: FFT helpers, detector configuration,
//! multiplicative masks, and Fourier-space kernels.

pub mod config;
pub mod fft;
pub mod kernels;
pub mod mask;

pub use config::ImageConfig;
pub use kernels::{Constant, FourierExp2D, FourierOperator};
pub use mask::{CircularMask, CustomMask, DEFAULT_ROLLOFF, Mask};
