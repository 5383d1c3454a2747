use lanesight_image::{Image, ImageError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How pixels outside the image are extrapolated by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Pixels outside the image are zero.
    Constant,
    /// Pixels outside the image repeat the nearest edge pixel.
    #[default]
    Replicate,
}

impl BorderMode {
    /// Resolve a possibly out of range index, `None` meaning a zero sample.
    #[inline]
    fn resolve(self, idx: isize, len: usize) -> Option<usize> {
        if idx >= 0 && (idx as usize) < len {
            return Some(idx as usize);
        }
        match self {
            BorderMode::Constant => None,
            BorderMode::Replicate => Some(idx.clamp(0, len as isize - 1) as usize),
        }
    }
}

/// A separable 2D filter that applies horizontal and vertical 1D correlations sequentially.
///
/// This struct caches the kernel data and precomputed offsets for efficient filtering.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
    border: BorderMode,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f32], kernel_y: &'a [f32], border: BorderMode) -> Self {
        let half_x = kernel_x.len() as isize / 2;
        let half_y = kernel_y.len() as isize / 2;

        Self {
            kernel_x,
            kernel_y,
            offsets_x: (0..kernel_x.len() as isize).map(|i| i - half_x).collect(),
            offsets_y: (0..kernel_y.len() as isize).map(|i| i - half_y).collect(),
            border,
        }
    }

    fn apply(&self, src: &Image<f32, 1>, dst: &mut Image<f32, 1>) {
        let (rows, cols) = (src.rows(), src.cols());
        if rows == 0 || cols == 0 {
            return;
        }

        let src_data = src.as_slice();
        let mut temp = vec![0.0f32; src_data.len()];

        // horizontal pass, one row per task
        temp.par_chunks_exact_mut(cols)
            .zip(src_data.par_chunks_exact(cols))
            .for_each(|(row_temp, row_src)| {
                for (c, out) in row_temp.iter_mut().enumerate() {
                    *out = self
                        .kernel_x
                        .iter()
                        .zip(self.offsets_x.iter())
                        .filter_map(|(&k, &off)| {
                            self.border
                                .resolve(c as isize + off, cols)
                                .map(|x| row_src[x] * k)
                        })
                        .sum();
                }
            });

        // vertical pass
        dst.as_slice_mut()
            .par_chunks_exact_mut(cols)
            .enumerate()
            .for_each(|(r, row_dst)| {
                for (c, out) in row_dst.iter_mut().enumerate() {
                    *out = self
                        .kernel_y
                        .iter()
                        .zip(self.offsets_y.iter())
                        .filter_map(|(&k, &off)| {
                            self.border
                                .resolve(r as isize + off, rows)
                                .map(|y| temp[y * cols + c] * k)
                        })
                        .sum();
                }
            });
    }
}

/// Apply a separable filter to a single channel image.
///
/// The kernels are applied as correlations, i.e. without flipping.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - The border extrapolation mode.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn separable_filter(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: BorderMode,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if kernel_x.is_empty() {
        return Err(ImageError::InvalidKernelSize(0));
    }

    if kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelSize(0));
    }

    SeparableFilter::new(kernel_x, kernel_y, border).apply(src, dst);

    Ok(())
}
