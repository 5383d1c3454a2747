use lanesight_image::{Image, ImageError};
use rayon::prelude::*;

use crate::filter::spatial_gradient;

// tan(22.5 deg) and tan(67.5 deg), the sector limits of the gradient direction
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

const NOT_EDGE: u8 = 0;
const WEAK_EDGE: u8 = 1;
const STRONG_EDGE: u8 = 2;

/// Detect edges with the Canny algorithm.
///
/// The gradient is computed with the 3x3 sobel operator and its magnitude is
/// the L1 norm `|dx| + |dy|`. Local maxima along the quantized gradient
/// direction above `high_threshold` seed the edges, which are then grown
/// through 8-connected maxima above `low_threshold`.
///
/// # Arguments
///
/// * `src` - The input single channel image, typically smoothed beforehand.
/// * `dst` - The output binary edge map with values 0 or 255.
/// * `low_threshold` - The hysteresis low threshold.
/// * `high_threshold` - The hysteresis high threshold.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Example
///
/// ```
/// use lanesight_image::{Image, ImageSize};
/// use lanesight_imgproc::features::canny;
///
/// let src = Image::<f32, 1>::from_size_val(
///     ImageSize {
///         width: 8,
///         height: 8,
///     },
///     0.0,
/// )
/// .unwrap();
/// let mut edges = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// canny(&src, &mut edges, 50.0, 100.0).unwrap();
/// assert!(edges.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn canny(
    src: &Image<f32, 1>,
    dst: &mut Image<u8, 1>,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if !(low_threshold >= 0.0 && low_threshold <= high_threshold) {
        return Err(ImageError::InvalidParameter(
            "low_threshold",
            format!("expected 0 <= {low_threshold} <= high_threshold ({high_threshold})"),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    dst.as_slice_mut().fill(0);
    if rows < 3 || cols < 3 {
        return Ok(());
    }

    let mut dx = Image::from_size_val(src.size(), 0.0f32)?;
    let mut dy = Image::from_size_val(src.size(), 0.0f32)?;
    spatial_gradient(src, &mut dx, &mut dy)?;

    let magnitude = dx
        .as_slice()
        .iter()
        .zip(dy.as_slice())
        .map(|(gx, gy)| gx.abs() + gy.abs())
        .collect::<Vec<f32>>();

    // non maximum suppression, the outermost pixels are never edges
    let mut state = vec![NOT_EDGE; rows * cols];
    state
        .par_chunks_exact_mut(cols)
        .enumerate()
        .skip(1)
        .take(rows - 2)
        .for_each(|(r, row_state)| {
            for c in 1..cols - 1 {
                let idx = r * cols + c;
                let mag = magnitude[idx];
                if mag <= low_threshold {
                    continue;
                }

                let (gx, gy) = (dx.as_slice()[idx], dy.as_slice()[idx]);
                let (ax, ay) = (gx.abs(), gy.abs());

                let (before, after) = if ay <= ax * TAN_22_5 {
                    (idx - 1, idx + 1)
                } else if ay >= ax * TAN_67_5 {
                    (idx - cols, idx + cols)
                } else if (gx > 0.0) == (gy > 0.0) {
                    (idx - cols - 1, idx + cols + 1)
                } else {
                    (idx - cols + 1, idx + cols - 1)
                };

                if mag > magnitude[before] && mag >= magnitude[after] {
                    row_state[c] = if mag > high_threshold {
                        STRONG_EDGE
                    } else {
                        WEAK_EDGE
                    };
                }
            }
        });

    // hysteresis: grow the strong edges through connected weak ones
    let mut stack = state
        .iter()
        .enumerate()
        .filter_map(|(idx, &s)| (s == STRONG_EDGE).then_some(idx))
        .collect::<Vec<usize>>();

    let out = dst.as_slice_mut();
    while let Some(idx) = stack.pop() {
        if out[idx] != 0 {
            continue;
        }
        out[idx] = 255;

        let (r, c) = (idx / cols, idx % cols);
        for nr in r.saturating_sub(1)..=(r + 1).min(rows - 1) {
            for nc in c.saturating_sub(1)..=(c + 1).min(cols - 1) {
                let nidx = nr * cols + nc;
                if state[nidx] != NOT_EDGE && out[nidx] == 0 {
                    stack.push(nidx);
                }
            }
        }
    }

    Ok(())
}
