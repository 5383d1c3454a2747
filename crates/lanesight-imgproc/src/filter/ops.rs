use lanesight_image::{Image, ImageError};

use super::{kernels, separable_filter, BorderMode};

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y), both odd.
/// * `sigma` - The sigma of the gaussian kernel (sigma_x, sigma_y).
/// * `border` - The border extrapolation mode.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel_size: (usize, usize),
    sigma: (f32, f32),
    border: BorderMode,
) -> Result<(), ImageError> {
    let kernel_x = kernels::gaussian_kernel_1d(kernel_size.0, sigma.0)?;
    let kernel_y = kernels::gaussian_kernel_1d(kernel_size.1, sigma.1)?;
    separable_filter(src, dst, &kernel_x, &kernel_y, border)?;
    Ok(())
}

/// Compute the first order image derivatives with the 3x3 sobel operator.
///
/// Borders are replicated so that the image frame itself is not reported as
/// an intensity step.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dx` - The horizontal derivative.
/// * `dy` - The vertical derivative.
///
/// PRECONDITION: `src`, `dx` and `dy` must have the same shape.
pub fn spatial_gradient(
    src: &Image<f32, 1>,
    dx: &mut Image<f32, 1>,
    dy: &mut Image<f32, 1>,
) -> Result<(), ImageError> {
    let (derivative, smooth) = kernels::sobel_kernel_1d();
    separable_filter(src, dx, &derivative, &smooth, BorderMode::Replicate)?;
    separable_filter(src, dy, &smooth, &derivative, BorderMode::Replicate)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanesight_image::ImageSize;

    #[test]
    fn test_gaussian_blur_preserves_mass() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 9,
            height: 9,
        };
        let mut data = vec![0.0f32; 81];
        data[40] = 81.0;
        let img = Image::new(size, data)?;
        let mut dst = Image::from_size_val(size, 0.0f32)?;

        gaussian_blur(&img, &mut dst, (5, 5), (1.0, 1.0), BorderMode::Constant)?;

        let total = dst.as_slice().iter().sum::<f32>();
        approx::assert_relative_eq!(total, 81.0, epsilon = 1e-3);
        assert!(dst.as_slice()[40] < 81.0);
        assert_eq!(dst.as_slice()[40 - 1], dst.as_slice()[40 + 1]);

        Ok(())
    }

    #[test]
    fn test_gaussian_blur_invalid_kernel() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        let mut dst = img.clone();
        assert_eq!(
            gaussian_blur(&img, &mut dst, (4, 3), (1.0, 1.0), BorderMode::Constant),
            Err(ImageError::InvalidKernelSize(4))
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_spatial_gradient_vertical_step() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::new(
            [4, 3].into(),
            vec![
                0.0, 0.0, 10.0, 10.0,
                0.0, 0.0, 10.0, 10.0,
                0.0, 0.0, 10.0, 10.0,
            ],
        )?;
        let mut dx = Image::from_size_val(img.size(), 0.0f32)?;
        let mut dy = Image::from_size_val(img.size(), 0.0f32)?;

        spatial_gradient(&img, &mut dx, &mut dy)?;

        // columns 1 and 2 straddle the step: 4 * 10 with the [1, 2, 1] smoothing
        assert_eq!(dx.as_slice()[4 + 1], 40.0);
        assert_eq!(dx.as_slice()[4 + 2], 40.0);
        assert_eq!(dx.as_slice()[4], 0.0);
        assert!(dy.as_slice().iter().all(|&v| v == 0.0));

        Ok(())
    }
}
