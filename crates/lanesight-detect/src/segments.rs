use lanesight_image::{Image, ImageError};
use lanesight_imgproc::features::{hough_lines_p, HoughParams};

use crate::segment::LineSegment;

/// Finds straight line segments in a binary edge map.
pub trait SegmentDetector {
    /// Detect segments ordered by descending confidence.
    fn detect(&self, edges: &Image<u8, 1>) -> Result<Vec<LineSegment>, ImageError>;
}

/// The probabilistic Hough transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoughSegmentDetector {
    params: HoughParams,
}

impl HoughSegmentDetector {
    /// Create the detector from its parameters.
    pub fn new(params: HoughParams) -> Self {
        Self { params }
    }

    /// The search parameters.
    pub fn params(&self) -> &HoughParams {
        &self.params
    }
}

impl SegmentDetector for HoughSegmentDetector {
    fn detect(&self, edges: &Image<u8, 1>) -> Result<Vec<LineSegment>, ImageError> {
        let segments = hough_lines_p(edges, &self.params)?;
        Ok(segments.into_iter().map(LineSegment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanesight_imgproc::draw::draw_line;

    #[test]
    fn vertical_line() -> Result<(), ImageError> {
        let mut edges = Image::from_size_val([120, 80].into(), 0u8)?;
        draw_line(&mut edges, (30, 10), (30, 70), [255], 1);

        let segments = HoughSegmentDetector::default().detect(&edges)?;
        assert_eq!(segments.len(), 1, "{segments:?}");

        let s = segments[0];
        assert!(s.is_vertical());
        assert_eq!(s.x1, 30.0);
        assert_eq!((s.y1.min(s.y2), s.y1.max(s.y2)), (10.0, 70.0));

        Ok(())
    }

    #[test]
    fn empty_edges() -> Result<(), ImageError> {
        let edges = Image::from_size_val([64, 48].into(), 0u8)?;
        assert!(HoughSegmentDetector::default().detect(&edges)?.is_empty());
        Ok(())
    }
}
