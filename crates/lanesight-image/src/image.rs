use crate::error::ImageError;

/// Width and height of an image in pixels.
///
/// ```
/// use lanesight_image::ImageSize;
///
/// let size: ImageSize = [1242, 375].into();
/// assert_eq!(size.width, 1242);
/// assert_eq!(size.height, 375);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from([width, height]: [usize; 2]) -> Self {
        Self { width, height }
    }
}

/// An owned image with `CHANNELS` interleaved channels per pixel.
///
/// Rows are stored top to bottom, so the buffer layout is (H, W, C).
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Wrap a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidChannelShape`] when `data` does not hold
    /// exactly `width * height * CHANNELS` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use lanesight_image::Image;
    ///
    /// let rgb = Image::<u8, 3>::new([4, 2].into(), vec![0; 24])?;
    /// assert_eq!(rgb.num_channels(), 3);
    /// # Ok::<(), lanesight_image::ImageError>(())
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.area() * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }
        Ok(Self { size, data })
    }

    /// An image of the given size with every value set to `val`.
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Self::new(size, vec![val; size.area() * CHANNELS])
    }

    /// The image size.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Alias of [`Image::cols`].
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Alias of [`Image::rows`].
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Number of channels per pixel.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// The raw buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The raw buffer, mutable.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The value at column `x`, row `y`, channel `ch`.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<&T, ImageError> {
        let idx = self.offset(x, y, ch)?;
        Ok(&self.data[idx])
    }

    /// Overwrite the value at column `x`, row `y`, channel `ch`.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        let idx = self.offset(x, y, ch)?;
        self.data[idx] = val;
        Ok(())
    }

    fn offset(&self, x: usize, y: usize, ch: usize) -> Result<usize, ImageError> {
        let (w, h) = (self.size.width, self.size.height);
        if x >= w || y >= h {
            return Err(ImageError::PixelIndexOutOfBounds(x, y, w, h));
        }
        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }
        Ok((y * w + x) * CHANNELS + ch)
    }
}
