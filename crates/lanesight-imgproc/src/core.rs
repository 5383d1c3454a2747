use lanesight_image::{Image, ImageError};

use crate::parallel;

/// Keep the pixels of a single channel image where a mask is set.
///
/// The mask is a binary image where the value 0 is considered as False
/// and any other value is considered as True. Pixels under a False mask
/// value are set to zero in the output.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `mask` - The binary mask to apply to the image.
/// * `dst` - The output image.
///
/// # Example
///
/// ```
/// use lanesight_image::{Image, ImageSize};
/// use lanesight_imgproc::core::bitwise_and_mask;
///
/// let size = ImageSize {
///     width: 2,
///     height: 2,
/// };
///
/// let image = Image::<u8, 1>::new(size, vec![10, 20, 30, 40]).unwrap();
/// let mask = Image::<u8, 1>::new(size, vec![255, 0, 255, 0]).unwrap();
/// let mut output = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// bitwise_and_mask(&image, &mask, &mut output).unwrap();
///
/// assert_eq!(output.as_slice(), &[10, 0, 30, 0]);
/// ```
pub fn bitwise_and_mask(
    src: &Image<u8, 1>,
    mask: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
) -> Result<(), ImageError> {
    if src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            mask.width(),
            mask.height(),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    parallel::par_iter_rows_val_two(src, mask, dst, |&s, &m, d| {
        *d = if m != 0 { s } else { 0 };
    });

    Ok(())
}
