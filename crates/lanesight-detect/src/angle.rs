use std::f64::consts::PI;

use crate::projector::RoadPoint;

/// Fold an angle into `[0, pi)`.
///
/// A line has no direction, so `theta` and `theta + pi` map to the same value.
pub fn canonicalize_angle(theta: f64) -> f64 {
    let a = theta.rem_euclid(PI);
    // rem_euclid may round up to pi, and keeps the sign of a negative zero
    if a >= PI || a == 0.0 {
        0.0
    } else {
        a
    }
}

/// The in-plane angle of the line through two road points, in `[0, pi)`.
///
/// Only the forward and lateral components are used, the height is the same
/// for both points.
pub fn lane_angle(start: &RoadPoint, end: &RoadPoint) -> f64 {
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    canonicalize_angle(dy.atan2(dx))
}
