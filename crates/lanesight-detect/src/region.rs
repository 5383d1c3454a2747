use lanesight_image::{Image, ImageError, ImageSize};
use lanesight_imgproc::{core::bitwise_and_mask, draw::fill_polygon};
use serde::{Deserialize, Serialize};

/// A polygonal region of the image where lane edges are searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    /// Polygon vertices as (x, y) pixel coordinates.
    pub vertices: Vec<[i32; 2]>,
}

impl Default for RegionOfInterest {
    /// The road area of the left color camera of the KITTI road benchmark.
    fn default() -> Self {
        Self {
            vertices: vec![[398, 375], [493, 181], [1231, 357]],
        }
    }
}

impl RegionOfInterest {
    /// Create a region from its polygon vertices.
    pub fn new(vertices: Vec<[i32; 2]>) -> Self {
        Self { vertices }
    }

    /// A region covering every pixel of an image.
    pub fn full_frame(size: ImageSize) -> Self {
        let (w, h) = (size.width as i32, size.height as i32);
        Self::new(vec![[0, 0], [w, 0], [w, h], [0, h]])
    }

    /// Rasterize the region into a binary mask with values 0 or 255.
    pub fn mask(&self, size: ImageSize) -> Result<Image<u8, 1>, ImageError> {
        let mut mask = Image::from_size_val(size, 0u8)?;
        fill_polygon(&mut mask, &self.vertices, [255]);

        if mask.as_slice().iter().all(|&v| v == 0) {
            log::warn!(
                "region of interest {:?} does not cover any pixel of a {size} image",
                self.vertices
            );
        }

        Ok(mask)
    }

}

/// Suppress the edges outside a region mask built by [`RegionOfInterest::mask`].
pub fn mask_edges(edges: &Image<u8, 1>, mask: &Image<u8, 1>) -> Result<Image<u8, 1>, ImageError> {
    let mut masked = Image::from_size_val(edges.size(), 0u8)?;
    bitwise_and_mask(edges, mask, &mut masked)?;
    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_frame_keeps_everything() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 7,
            height: 5,
        };
        let edges = Image::new(size, (0..35).map(|v| v as u8).collect())?;
        let mask = RegionOfInterest::full_frame(size).mask(size)?;

        assert!(mask.as_slice().iter().all(|&v| v == 255));
        assert_eq!(mask_edges(&edges, &mask)?, edges);

        Ok(())
    }

    #[test]
    fn triangle_suppresses_outside() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 10,
            height: 10,
        };
        let edges = Image::from_size_val(size, 255u8)?;
        let roi = RegionOfInterest::new(vec![[0, 0], [10, 0], [0, 10]]);

        let masked = mask_edges(&edges, &roi.mask(size)?)?;
        // top left corner is inside, bottom right corner is outside
        assert_eq!(masked.get_pixel(0, 0, 0)?, &255);
        assert_eq!(masked.get_pixel(9, 9, 0)?, &0);

        Ok(())
    }

    #[test]
    fn default_region_outside_small_image() -> Result<(), ImageError> {
        let mask = RegionOfInterest::default().mask([64, 48].into())?;
        assert!(mask.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn mask_edges_size_mismatch() -> Result<(), ImageError> {
        let edges = Image::from_size_val([8, 4].into(), 255u8)?;
        let mask = RegionOfInterest::default().mask([4, 4].into())?;
        assert!(matches!(
            mask_edges(&edges, &mask),
            Err(ImageError::InvalidImageSize(8, 4, 4, 4))
        ));
        Ok(())
    }
}
