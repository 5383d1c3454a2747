use lanesight_image::ImageError;

// below this magnitude a homogeneous divisor is treated as zero
const EPSILON: f64 = 1e-12;

/// Map a 2D point through a row-major 3x3 perspective matrix.
///
/// The point is lifted to `[x, y, 1]`, multiplied by `m` and divided by the
/// resulting homogeneous coordinate.
///
/// # Arguments
///
/// * `point` - The point to transform as `[x, y]`.
/// * `m` - The 3x3 perspective transformation matrix in row-major order.
///
/// # Errors
///
/// [`ImageError::DegeneratePerspective`] when the homogeneous coordinate is
/// zero or the mapped point is not finite.
///
/// # Example
///
/// ```
/// use lanesight_imgproc::warp::perspective_transform_point;
///
/// let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
/// let p = perspective_transform_point([1.0, 1.0], &m).unwrap();
/// assert_eq!(p, [0.0, 2.0]);
/// ```
pub fn perspective_transform_point(point: [f64; 2], m: &[f64; 9]) -> Result<[f64; 2], ImageError> {
    let [x, y] = point;
    let w = m[6] * x + m[7] * y + m[8];

    if w.abs() < EPSILON {
        return Err(ImageError::DegeneratePerspective(x, y));
    }

    let xw = (m[0] * x + m[1] * y + m[2]) / w;
    let yw = (m[3] * x + m[4] * y + m[5]) / w;

    if !(xw.is_finite() && yw.is_finite()) {
        return Err(ImageError::DegeneratePerspective(x, y));
    }

    Ok([xw, yw])
}
