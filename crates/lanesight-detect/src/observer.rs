use lanesight_image::Image;

use crate::classifier::{LaneSelection, LaneSide};
use crate::projector::RoadPoint;
use crate::segment::LineSegment;

/// Receives the intermediate results of a detector run.
///
/// Every hook defaults to doing nothing, implementors override the stages
/// they care about.
pub trait PipelineObserver {
    /// The binary edge map of the whole frame.
    fn on_edges(&mut self, _edges: &Image<u8, 1>) {}

    /// The rasterized region of interest.
    fn on_roi_mask(&mut self, _mask: &Image<u8, 1>) {}

    /// The edge map restricted to the region of interest.
    fn on_masked_edges(&mut self, _edges: &Image<u8, 1>) {}

    /// The candidate segments, ordered by descending confidence.
    fn on_segments(&mut self, _segments: &[LineSegment]) {}

    /// The segment chosen for each side.
    fn on_selection(&mut self, _selection: &LaneSelection) {}

    /// The road points of a selected segment.
    fn on_projected(&mut self, _side: LaneSide, _start: &RoadPoint, _end: &RoadPoint) {}
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// An observer that reports every stage through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

fn count_set(image: &Image<u8, 1>) -> usize {
    image.as_slice().iter().filter(|&&v| v != 0).count()
}

impl PipelineObserver for LoggingObserver {
    fn on_edges(&mut self, edges: &Image<u8, 1>) {
        log::debug!("edges: {} pixels in a {} frame", count_set(edges), edges.size());
    }

    fn on_roi_mask(&mut self, mask: &Image<u8, 1>) {
        log::debug!("roi: {} pixels", count_set(mask));
    }

    fn on_masked_edges(&mut self, edges: &Image<u8, 1>) {
        log::debug!("edges inside roi: {} pixels", count_set(edges));
    }

    fn on_segments(&mut self, segments: &[LineSegment]) {
        log::debug!("segments: {} candidates", segments.len());
        for s in segments {
            log::trace!("  ({}, {}) -> ({}, {})", s.x1, s.y1, s.x2, s.y2);
        }
    }

    fn on_selection(&mut self, selection: &LaneSelection) {
        log::debug!("left: {:?}", selection.left);
        log::debug!("right: {:?}", selection.right);
    }

    fn on_projected(&mut self, side: LaneSide, start: &RoadPoint, end: &RoadPoint) {
        log::debug!("{side:?} lane on the road: {start:?} -> {end:?}");
    }
}
