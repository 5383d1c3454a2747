use lanesight_image::ImageError;

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, must be odd.
/// * `sigma` - The sigma of the gaussian kernel. A non-positive sigma is
///   derived from the kernel size as `0.3 * ((kernel_size - 1) * 0.5 - 1) + 0.8`.
///
/// # Returns
///
/// A normalized vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Result<Vec<f32>, ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    let mut kernel = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - mean;
            (-(x * x) / (2.0 * sigma_sq)).exp()
        })
        .collect::<Vec<_>>();

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);

    Ok(kernel)
}

/// Create the 3x3 sobel kernel as a pair of separable 1d kernels.
///
/// # Returns
///
/// The derivative and the smoothing kernels, in that order.
pub fn sobel_kernel_1d() -> ([f32; 3], [f32; 3]) {
    ([-1.0, 0.0, 1.0], [1.0, 2.0, 1.0])
}
