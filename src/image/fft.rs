//! FFT helpers shared by the Fourier voxel grid, the frequency slice, and
//! the tests.
//!
//! Conventions match the numpy ones the rest of the crate assumes: the
//! forward transform is unnormalized, the inverse carries the `1/n`
//! factor, and `fftshift` moves the zero-frequency entry to the array
//! center (`ifftshift` undoes it, including for odd extents).

use ndarray::{Array, Array3, Axis, Dimension, Slice};
use rustfft::{FftPlanner, num_complex::Complex64};

/// Cyclically shifts an array along one axis: element `i` moves to
/// `(i + shift) % n`.
pub fn roll_axis<T, D>(a: &Array<T, D>, axis: Axis, shift: usize) -> Array<T, D>
where
    T: Clone,
    D: Dimension,
{
    let n = a.len_of(axis);
    if n == 0 {
        return a.clone();
    }
    let s = shift % n;
    if s == 0 {
        return a.clone();
    }

    let mut out = a.clone();
    out.slice_axis_mut(axis, Slice::from(s as isize..))
        .assign(&a.slice_axis(axis, Slice::from(..(n - s) as isize)));
    out.slice_axis_mut(axis, Slice::from(..s as isize))
        .assign(&a.slice_axis(axis, Slice::from((n - s) as isize..)));
    out
}

/// Moves the zero-frequency entry to the center of each listed axis.
pub fn fftshift<T, D>(a: &Array<T, D>, axes: &[usize]) -> Array<T, D>
where
    T: Clone,
    D: Dimension,
{
    let mut out = a.clone();
    for &ax in axes {
        let n = out.len_of(Axis(ax));
        out = roll_axis(&out, Axis(ax), n / 2);
    }
    out
}

/// Undoes [`fftshift`] on each listed axis.
pub fn ifftshift<T, D>(a: &Array<T, D>, axes: &[usize]) -> Array<T, D>
where
    T: Clone,
    D: Dimension,
{
    let mut out = a.clone();
    for &ax in axes {
        let n = out.len_of(Axis(ax));
        out = roll_axis(&out, Axis(ax), n - n / 2);
    }
    out
}

/// Forward complex FFT over all three axes, unnormalized.
pub fn fftn(a: &Array3<Complex64>) -> Array3<Complex64> {
    transform(a, true)
}

/// Inverse complex FFT over all three axes, scaled by `1/len`.
pub fn ifftn(a: &Array3<Complex64>) -> Array3<Complex64> {
    let mut out = transform(a, false);
    let scale = 1.0 / out.len() as f64;
    out.mapv_inplace(|v| v * scale);
    out
}

/// Runs a planned 1D pass along each axis in turn, through a scratch lane
/// buffer (lanes are not contiguous in general).
fn transform(a: &Array3<Complex64>, forward: bool) -> Array3<Complex64> {
    let mut out = a.clone();
    let mut planner = FftPlanner::new();

    for ax in 0..3 {
        let n = out.len_of(Axis(ax));
        if n < 2 {
            continue;
        }
        let fft = if forward {
            planner.plan_fft_forward(n)
        } else {
            planner.plan_fft_inverse(n)
        };

        let mut lane_buf = vec![Complex64::new(0.0, 0.0); n];
        for mut lane in out.lanes_mut(Axis(ax)) {
            for (b, v) in lane_buf.iter_mut().zip(lane.iter()) {
                *b = *v;
            }
            fft.process(&mut lane_buf);
            for (v, b) in lane.iter_mut().zip(lane_buf.iter()) {
                *v = *b;
            }
        }
    }
    out
}
