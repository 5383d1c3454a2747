use crate::parallel;
use lanesight_image::{Image, ImageError};

/// Extract the HSV value channel of an RGB8 image.
///
/// The value channel is `V = max(R, G, B)` and is returned in the range [0, 255].
/// Lane paint is bright in every colour channel, so the value channel keeps
/// both white and yellow markings while discarding hue.
///
/// # Arguments
///
/// * `src` - The input RGB image.
/// * `dst` - The output single channel image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use lanesight_image::{Image, ImageSize};
/// use lanesight_imgproc::color::value_from_rgb;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 1,
///         height: 1,
///     },
///     vec![10, 200, 30],
/// )
/// .unwrap();
///
/// let mut value = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
/// value_from_rgb(&image, &mut value).unwrap();
///
/// assert_eq!(value.as_slice(), &[200.0]);
/// ```
pub fn value_from_rgb(src: &Image<u8, 3>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let max = src_pixel[0].max(src_pixel[1]).max(src_pixel[2]);
        dst_pixel[0] = max as f32;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use lanesight_image::{Image, ImageError, ImageSize};

    #[test]
    fn value_from_rgb() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![
                0, 128, 255, 255, 128, 0, 128, 255, 0, 255, 0, 128, 0, 0, 0, 12, 13, 11,
            ],
        )?;

        let mut value = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
        super::value_from_rgb(&image, &mut value)?;

        assert_eq!(value.as_slice(), &[255.0, 255.0, 255.0, 255.0, 0.0, 13.0]);

        Ok(())
    }
}
