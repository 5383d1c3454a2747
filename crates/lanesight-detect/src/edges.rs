use lanesight_image::{Image, ImageError};
use lanesight_imgproc::{
    color::{gray_from_rgb, value_from_rgb},
    features::canny,
    filter::gaussian_blur,
};

use crate::config::{EdgeChannel, EdgeConfig};

/// Turns a color frame into a binary edge map.
pub trait EdgeExtractor {
    /// Extract the edges of an RGB image as a single channel image with values 0 or 255.
    fn extract(&self, image: &Image<u8, 3>) -> Result<Image<u8, 1>, ImageError>;
}

/// Gaussian smoothing followed by the Canny detector on a single channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CannyEdgeExtractor {
    config: EdgeConfig,
}

impl CannyEdgeExtractor {
    /// Create the extractor from its parameters.
    pub fn new(config: EdgeConfig) -> Self {
        Self { config }
    }

    /// The extraction parameters.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}

impl EdgeExtractor for CannyEdgeExtractor {
    fn extract(&self, image: &Image<u8, 3>) -> Result<Image<u8, 1>, ImageError> {
        let config = &self.config;

        let mut channel = Image::from_size_val(image.size(), 0.0f32)?;
        match config.channel {
            EdgeChannel::Value => value_from_rgb(image, &mut channel)?,
            EdgeChannel::Luminance => gray_from_rgb(image, &mut channel)?,
        }

        let mut blurred = Image::from_size_val(image.size(), 0.0f32)?;
        gaussian_blur(
            &channel,
            &mut blurred,
            (config.kernel_size, config.kernel_size),
            (config.sigma, config.sigma),
            config.border,
        )?;

        let mut edges = Image::from_size_val(image.size(), 0u8)?;
        canny(
            &blurred,
            &mut edges,
            config.low_threshold,
            config.high_threshold,
        )?;

        Ok(edges)
    }
}
