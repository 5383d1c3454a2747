use lanesight_image::Image;

use crate::angle::lane_angle;
use crate::calibration::{CameraIntrinsics, CameraToRoadExtrinsics};
use crate::classifier::{select_lane_segments, LaneSide};
use crate::config::DetectorConfig;
use crate::edges::{CannyEdgeExtractor, EdgeExtractor};
use crate::error::LaneDetectorError;
use crate::observer::{NoopObserver, PipelineObserver};
use crate::projector::RoadPlaneProjector;
use crate::region::{mask_edges, RegionOfInterest};
use crate::segment::LineSegment;
use crate::segments::{HoughSegmentDetector, SegmentDetector};

/// The lane angles found in a single frame.
///
/// An angle is only meaningful when the matching flag is set, unresolved
/// sides carry `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaneDetectorOutput {
    /// Whether a left lane boundary was found.
    pub is_left_found: bool,
    /// Whether a right lane boundary was found.
    pub is_right_found: bool,
    /// Angle of the left boundary in the road plane, radians in `[0, pi)`.
    pub left_angle: f64,
    /// Angle of the right boundary in the road plane, radians in `[0, pi)`.
    pub right_angle: f64,
}

impl LaneDetectorOutput {
    /// The left angle, if found.
    pub fn left(&self) -> Option<f64> {
        self.is_left_found.then_some(self.left_angle)
    }

    /// The right angle, if found.
    pub fn right(&self) -> Option<f64> {
        self.is_right_found.then_some(self.right_angle)
    }
}

/// Estimates the road-plane angles of the left and right lane boundaries.
///
/// The calibration is validated once at construction, a detector then
/// processes any number of frames through `&self`.
///
/// # Example
///
/// ```
/// use lanesight_detect::{
///     CameraIntrinsics, CameraToRoadExtrinsics, DetectorConfig, LaneDetector,
/// };
/// use lanesight_image::Image;
///
/// let k = CameraIntrinsics::from_row_major([
///     [721.5, 0.0, 609.5],
///     [0.0, 721.5, 172.8],
///     [0.0, 0.0, 1.0],
/// ])?;
/// let rt = CameraToRoadExtrinsics::from_row_major([
///     [1.0, 0.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0, 1.65],
///     [0.0, 0.0, 1.0, 0.0],
/// ])?;
///
/// let detector = LaneDetector::new(&k, &rt, DetectorConfig::default())?;
///
/// let frame = Image::<u8, 3>::from_size_val([1242, 375].into(), 0)?;
/// let output = detector.run(&frame)?;
/// assert_eq!(output.left(), None);
/// assert_eq!(output.right(), None);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct LaneDetector<E = CannyEdgeExtractor, S = HoughSegmentDetector> {
    projector: RoadPlaneProjector,
    roi: RegionOfInterest,
    edge_extractor: E,
    segment_detector: S,
}

impl LaneDetector {
    /// Create a detector with the Canny edge extractor and the Hough segment detector.
    pub fn new(
        intrinsics: &CameraIntrinsics,
        extrinsics: &CameraToRoadExtrinsics,
        config: DetectorConfig,
    ) -> Result<Self, LaneDetectorError> {
        let DetectorConfig { edges, roi, hough } = config;
        Self::with_collaborators(
            intrinsics,
            extrinsics,
            roi,
            CannyEdgeExtractor::new(edges),
            HoughSegmentDetector::new(hough),
        )
    }
}

impl<E: EdgeExtractor, S: SegmentDetector> LaneDetector<E, S> {
    /// Create a detector with custom edge and segment stages.
    pub fn with_collaborators(
        intrinsics: &CameraIntrinsics,
        extrinsics: &CameraToRoadExtrinsics,
        roi: RegionOfInterest,
        edge_extractor: E,
        segment_detector: S,
    ) -> Result<Self, LaneDetectorError> {
        Ok(Self {
            projector: RoadPlaneProjector::new(intrinsics, extrinsics)?,
            roi,
            edge_extractor,
            segment_detector,
        })
    }

    /// The road plane projector built from the calibration.
    pub fn projector(&self) -> &RoadPlaneProjector {
        &self.projector
    }

    /// The region where lane edges are searched.
    pub fn roi(&self) -> &RegionOfInterest {
        &self.roi
    }

    /// Estimate the lane angles of an RGB frame.
    pub fn run(&self, image: &Image<u8, 3>) -> Result<LaneDetectorOutput, LaneDetectorError> {
        self.run_observed(image, &mut NoopObserver)
    }

    /// Estimate the lane angles of an RGB frame, reporting each stage to `observer`.
    pub fn run_observed<O>(
        &self,
        image: &Image<u8, 3>,
        observer: &mut O,
    ) -> Result<LaneDetectorOutput, LaneDetectorError>
    where
        O: PipelineObserver + ?Sized,
    {
        let size = image.size();

        let edges = self.edge_extractor.extract(image)?;
        observer.on_edges(&edges);

        let mask = self.roi.mask(size)?;
        observer.on_roi_mask(&mask);

        let masked = mask_edges(&edges, &mask)?;
        observer.on_masked_edges(&masked);

        let segments = self.segment_detector.detect(&masked)?;
        observer.on_segments(&segments);

        let selection = select_lane_segments(segments.iter().copied(), size);
        observer.on_selection(&selection);

        let mut output = LaneDetectorOutput::default();

        if let Some(segment) = selection.left {
            output.left_angle = self.lane_angle(LaneSide::Left, &segment, observer)?;
            output.is_left_found = true;
        }

        if let Some(segment) = selection.right {
            output.right_angle = self.lane_angle(LaneSide::Right, &segment, observer)?;
            output.is_right_found = true;
        }

        log::debug!(
            "lanes: left {:?}, right {:?} from {} candidates",
            output.left(),
            output.right(),
            segments.len()
        );

        Ok(output)
    }

    fn lane_angle<O>(
        &self,
        side: LaneSide,
        segment: &LineSegment,
        observer: &mut O,
    ) -> Result<f64, LaneDetectorError>
    where
        O: PipelineObserver + ?Sized,
    {
        let (start, end) = self.projector.project_segment(segment)?;
        observer.on_projected(side, &start, &end);
        Ok(lane_angle(&start, &end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanesight_image::{ImageError, ImageSize};

    struct NoEdges;

    impl EdgeExtractor for NoEdges {
        fn extract(&self, image: &Image<u8, 3>) -> Result<Image<u8, 1>, ImageError> {
            Image::from_size_val(image.size(), 0)
        }
    }

    struct FixedSegments(Vec<LineSegment>);

    impl SegmentDetector for FixedSegments {
        fn detect(&self, _edges: &Image<u8, 1>) -> Result<Vec<LineSegment>, ImageError> {
            Ok(self.0.clone())
        }
    }

    fn level_camera() -> Result<(CameraIntrinsics, CameraToRoadExtrinsics), LaneDetectorError> {
        let k = CameraIntrinsics::from_row_major([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])?;
        let rt = CameraToRoadExtrinsics::from_row_major([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 5.0],
            [0.0, 0.0, 1.0, 0.0],
        ])?;
        Ok((k, rt))
    }

    #[test]
    fn output_accessors() {
        let output = LaneDetectorOutput {
            is_left_found: true,
            is_right_found: false,
            left_angle: 0.25,
            right_angle: 0.0,
        };
        assert_eq!(output.left(), Some(0.25));
        assert_eq!(output.right(), None);
    }

    #[test]
    fn one_side_only() -> Result<(), LaneDetectorError> {
        let (k, rt) = level_camera()?;
        let size = ImageSize {
            width: 200,
            height: 100,
        };
        let detector = LaneDetector::with_collaborators(
            &k,
            &rt,
            RegionOfInterest::full_frame(size),
            NoEdges,
            FixedSegments(vec![LineSegment::new([80.0, 50.0], [160.0, 100.0])]),
        )?;

        let output = detector.run(&Image::from_size_val(size, 0)?)?;
        assert!(!output.is_left_found);
        assert!(output.is_right_found);
        assert_eq!(output.left_angle, 0.0);
        approx::assert_relative_eq!(output.right_angle, 0.0, epsilon = 1e-9);

        Ok(())
    }

    #[test]
    fn degenerate_projection_is_an_error() -> Result<(), LaneDetectorError> {
        let (k, rt) = level_camera()?;
        let size = ImageSize {
            width: 200,
            height: 100,
        };
        // the start point lies on the horizon row of a level camera
        let detector = LaneDetector::with_collaborators(
            &k,
            &rt,
            RegionOfInterest::full_frame(size),
            NoEdges,
            FixedSegments(vec![LineSegment::new([20.0, 0.0], [10.0, 50.0])]),
        )?;

        assert!(matches!(
            detector.run(&Image::from_size_val(size, 0)?),
            Err(LaneDetectorError::DegenerateProjection(_, _))
        ));

        Ok(())
    }
}
