use std::ops::ControlFlow;

use lanesight_image::ImageSize;

use crate::segment::LineSegment;

/// The side of the road a lane boundary belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneSide {
    /// Left of the image center column.
    Left,
    /// Right of, or exactly on, the image center column.
    Right,
    /// The segment never reaches the bottom row.
    Unknown,
}

#[inline]
fn mid_column(n_cols: usize) -> f64 {
    (n_cols as f64 - 1.0) / 2.0
}

#[inline]
fn side_of_column(x: f64, n_cols: usize) -> LaneSide {
    // a line crossing exactly at the center goes right
    if x < mid_column(n_cols) {
        LaneSide::Left
    } else {
        LaneSide::Right
    }
}

/// Decide the side of a line from where it crosses the bottom image row.
///
/// The line `y = slope * x + intercept` is extended to `y = n_rows` and the
/// crossing column is compared against `(n_cols - 1) / 2`.
///
/// # Arguments
///
/// * `slope` - The line slope in image coordinates.
/// * `intercept` - The row where the line crosses column zero.
/// * `n_rows` - The image height in pixels.
/// * `n_cols` - The image width in pixels.
///
/// # Returns
///
/// [`LaneSide::Unknown`] for a horizontal or non-finite line.
pub fn check_lane_side(slope: f64, intercept: f64, n_rows: usize, n_cols: usize) -> LaneSide {
    if slope == 0.0 || !slope.is_finite() {
        return LaneSide::Unknown;
    }

    let x_at_bottom = (n_rows as f64 - intercept) / slope;
    if !x_at_bottom.is_finite() {
        return LaneSide::Unknown;
    }

    side_of_column(x_at_bottom, n_cols)
}

/// Classify a segment into a road side.
///
/// Vertical segments are classified from their column directly.
pub fn classify_segment(segment: &LineSegment, size: ImageSize) -> LaneSide {
    match (segment.slope(), segment.y_intercept()) {
        (Some(slope), Some(intercept)) => {
            check_lane_side(slope, intercept, size.height, size.width)
        }
        _ => side_of_column(segment.x1, size.width),
    }
}

/// The first segment found for each side of the road.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaneSelection {
    /// The left lane boundary, if any.
    pub left: Option<LineSegment>,
    /// The right lane boundary, if any.
    pub right: Option<LineSegment>,
}

impl LaneSelection {
    /// Whether both sides are resolved.
    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    fn offer(mut self, side: LaneSide, segment: LineSegment) -> Self {
        match side {
            LaneSide::Left => {
                self.left.get_or_insert(segment);
            }
            LaneSide::Right => {
                self.right.get_or_insert(segment);
            }
            LaneSide::Unknown => {}
        }
        self
    }
}

/// Pick one segment per side from a confidence ordered sequence.
///
/// The first segment classified to a side wins. The scan stops as soon as
/// both sides are resolved, so later segments are never classified.
pub fn select_lane_segments<I>(segments: I, size: ImageSize) -> LaneSelection
where
    I: IntoIterator<Item = LineSegment>,
{
    let flow = segments
        .into_iter()
        .try_fold(LaneSelection::default(), |selection, segment| {
            let side = classify_segment(&segment, size);
            log::trace!("segment {segment:?} classified as {side:?}");

            let selection = selection.offer(side, segment);
            if selection.is_complete() {
                ControlFlow::Break(selection)
            } else {
                ControlFlow::Continue(selection)
            }
        });

    match flow {
        ControlFlow::Break(selection) | ControlFlow::Continue(selection) => selection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: ImageSize = ImageSize {
        width: 200,
        height: 100,
    };

    #[test]
    fn bottom_crossing() {
        // crosses the bottom row at x = 40 and x = 160
        assert_eq!(check_lane_side(2.5, 0.0, 100, 200), LaneSide::Left);
        assert_eq!(check_lane_side(0.625, 0.0, 100, 200), LaneSide::Right);
        assert_eq!(check_lane_side(-1.0, 150.0, 100, 200), LaneSide::Left);
    }

    #[test]
    fn tie_goes_right() {
        // x at bottom is exactly 99.5 for a 200 column image
        assert_eq!(check_lane_side(1.0, 0.5, 100, 200), LaneSide::Right);
        assert_eq!(check_lane_side(1.0, 0.5 + 1e-9, 100, 200), LaneSide::Left);

        // odd width, the center is an actual column
        assert_eq!(check_lane_side(2.0, 0.0, 100, 101), LaneSide::Right);
    }

    #[test]
    fn horizontal_is_unknown() {
        assert_eq!(check_lane_side(0.0, 50.0, 100, 200), LaneSide::Unknown);
        assert_eq!(check_lane_side(-0.0, 50.0, 100, 200), LaneSide::Unknown);
        assert_eq!(check_lane_side(f64::NAN, 0.0, 100, 200), LaneSide::Unknown);
        assert_eq!(check_lane_side(f64::INFINITY, 0.0, 100, 200), LaneSide::Unknown);

        let s = LineSegment::new([10.0, 40.0], [90.0, 40.0]);
        assert_eq!(classify_segment(&s, SIZE), LaneSide::Unknown);
    }

    #[test]
    fn vertical_segment() {
        let left = LineSegment::new([99.0, 10.0], [99.0, 90.0]);
        let center = LineSegment::new([99.5, 10.0], [99.5, 90.0]);
        let right = LineSegment::new([100.0, 10.0], [100.0, 90.0]);
        assert_eq!(classify_segment(&left, SIZE), LaneSide::Left);
        assert_eq!(classify_segment(&center, SIZE), LaneSide::Right);
        assert_eq!(classify_segment(&right, SIZE), LaneSide::Right);
    }

    #[test]
    fn first_segment_wins() {
        let left_a = LineSegment::new([40.0, 100.0], [20.0, 50.0]);
        let left_b = LineSegment::new([30.0, 100.0], [10.0, 50.0]);
        let flat = LineSegment::new([0.0, 10.0], [50.0, 10.0]);
        let right_a = LineSegment::new([80.0, 50.0], [160.0, 100.0]);
        let right_b = LineSegment::new([90.0, 50.0], [170.0, 100.0]);

        let selection = select_lane_segments([flat, left_a, left_b, right_a, right_b], SIZE);
        assert_eq!(selection.left, Some(left_a));
        assert_eq!(selection.right, Some(right_a));
    }

    #[test]
    fn stops_when_both_sides_found() {
        let left = LineSegment::new([40.0, 100.0], [20.0, 50.0]);
        let right = LineSegment::new([80.0, 50.0], [160.0, 100.0]);

        let mut visited = 0;
        let segments = [left, right, left, right].into_iter().inspect(|_| visited += 1);
        let selection = select_lane_segments(segments, SIZE);

        assert!(selection.is_complete());
        assert_eq!(visited, 2);
    }

    #[test]
    fn one_side_only() {
        let right = LineSegment::new([80.0, 50.0], [160.0, 100.0]);
        let selection = select_lane_segments([right], SIZE);
        assert_eq!(selection.left, None);
        assert_eq!(selection.right, Some(right));

        let selection = select_lane_segments(std::iter::empty(), SIZE);
        assert_eq!(selection, LaneSelection::default());
    }
}
