use glam::{DMat4, DVec3, DVec4};
use lanesight_imgproc::warp::perspective_transform_point;

use crate::calibration::{CameraIntrinsics, CameraToRoadExtrinsics};
use crate::error::LaneDetectorError;
use crate::segment::LineSegment;

// determinant and divisor magnitudes below this are treated as zero
const EPSILON: f64 = 1e-12;

/// A point in the bird's-eye road frame.
///
/// `x` points forward along the road, `y` is lateral and `z` is the camera
/// height, constant for every point under the flat road assumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadPoint {
    /// Forward coordinate.
    pub x: f64,
    /// Lateral coordinate.
    pub y: f64,
    /// Height coordinate.
    pub z: f64,
}

impl From<DVec3> for RoadPoint {
    fn from(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Projects image pixels onto the road plane of a calibrated camera.
///
/// Everything that depends only on the calibration is solved once in
/// [`RoadPlaneProjector::new`], projecting a pixel is then a perspective
/// mapping followed by a 4x4 multiply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadPlaneProjector {
    // rows [r2, r0, r1] of the camera-to-road rotation, row-major
    cam_to_bev: [f64; 9],
    camera_height: f64,
    intrinsics_inv: DMat4,
}

impl RoadPlaneProjector {
    /// Build the projector from the camera calibration.
    ///
    /// # Errors
    ///
    /// * [`LaneDetectorError::SingularRotation`] if the road origin cannot be solved.
    /// * [`LaneDetectorError::ZeroCameraHeight`] if the camera lies on the road plane.
    /// * [`LaneDetectorError::SingularIntrinsics`] if the intrinsic matrix is not invertible.
    pub fn new(
        intrinsics: &CameraIntrinsics,
        extrinsics: &CameraToRoadExtrinsics,
    ) -> Result<Self, LaneDetectorError> {
        let rotation = extrinsics.rotation();
        let translation = extrinsics.translation();

        let det_r = rotation.determinant();
        if det_r.abs() < EPSILON {
            return Err(LaneDetectorError::SingularRotation(det_r));
        }

        // road origin in camera coordinates: R * p = t
        let r = nalgebra::Matrix3::from_fn(|i, j| rotation.row(i)[j]);
        let t = nalgebra::Vector3::new(translation.x, translation.y, translation.z);
        let p = r
            .col_piv_qr()
            .solve(&t)
            .ok_or(LaneDetectorError::SingularRotation(det_r))?;

        let camera_height = p.y;
        if camera_height.abs() < EPSILON {
            return Err(LaneDetectorError::ZeroCameraHeight(camera_height));
        }

        let mut cam_to_bev = [0.0; 9];
        for (dst, src) in cam_to_bev.chunks_exact_mut(3).zip([2, 0, 1]) {
            dst.copy_from_slice(&rotation.row(src).to_array());
        }

        let intrinsics_4x4 = DMat4::from_mat3(intrinsics.matrix());
        let det_k = intrinsics_4x4.determinant();
        if det_k.abs() < EPSILON {
            return Err(LaneDetectorError::SingularIntrinsics(det_k));
        }

        log::debug!("road plane projector: camera height {camera_height:.4}, det(R) {det_r:.4}");

        Ok(Self {
            cam_to_bev,
            camera_height,
            intrinsics_inv: intrinsics_4x4.inverse(),
        })
    }

    /// The height of the camera above the road, in extrinsic units.
    pub fn camera_height(&self) -> f64 {
        self.camera_height
    }

    /// The bird's-eye rotation in row-major order.
    pub fn cam_to_bev(&self) -> [f64; 9] {
        self.cam_to_bev
    }

    /// Project an image pixel `[x, y]` onto the road plane.
    pub fn project(&self, pixel: [f64; 2]) -> Result<RoadPoint, LaneDetectorError> {
        let degenerate = || LaneDetectorError::DegenerateProjection(pixel[0], pixel[1]);

        let [bx, by] =
            perspective_transform_point(pixel, &self.cam_to_bev).map_err(|_| degenerate())?;

        // the last coordinate is the inverse depth of the flat road
        let homogeneous = self.intrinsics_inv * DVec4::new(bx, by, 1.0, 1.0 / self.camera_height);
        if homogeneous.w.abs() < EPSILON {
            return Err(degenerate());
        }

        let point = homogeneous.truncate() / homogeneous.w;
        if !point.is_finite() {
            return Err(degenerate());
        }

        Ok(point.into())
    }

    /// Project both endpoints of a segment onto the road plane.
    pub fn project_segment(
        &self,
        segment: &LineSegment,
    ) -> Result<(RoadPoint, RoadPoint), LaneDetectorError> {
        Ok((self.project(segment.start())?, self.project(segment.end())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const IDENTITY: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    fn level_camera(height: f64) -> Result<RoadPlaneProjector, LaneDetectorError> {
        let k = CameraIntrinsics::from_row_major(IDENTITY)?;
        let rt = CameraToRoadExtrinsics::from_row_major([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, height],
            [0.0, 0.0, 1.0, 0.0],
        ])?;
        RoadPlaneProjector::new(&k, &rt)
    }

    #[test]
    fn level_camera_ground_point() -> Result<(), LaneDetectorError> {
        let projector = level_camera(5.0)?;
        assert_eq!(projector.camera_height(), 5.0);

        #[rustfmt::skip]
        let expected = [
            0.0, 0.0, 1.0,
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
        ];
        assert_eq!(projector.cam_to_bev(), expected);

        // a ground point at depth 0.05 and lateral offset 2 is seen at (40, 100)
        let p = projector.project([40.0, 100.0])?;
        assert_relative_eq!(p.x, 0.05, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn scaled_intrinsics() -> Result<(), LaneDetectorError> {
        let k = CameraIntrinsics::from_row_major([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]])?;
        let rt = CameraToRoadExtrinsics::from_slice(&[
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0, 0.0, 0.0, 1.0, 0.0,
        ])?;
        let projector = RoadPlaneProjector::new(&k, &rt)?;

        let p = projector.project([40.0, 100.0])?;
        assert_relative_eq!(p.x, 0.025, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn project_segment_endpoints() -> Result<(), LaneDetectorError> {
        let projector = level_camera(5.0)?;
        let (start, end) = projector.project_segment(&LineSegment::new([40.0, 100.0], [20.0, 50.0]))?;
        assert_relative_eq!(start.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(end.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(end.x, 0.1, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn singular_rotation() -> Result<(), LaneDetectorError> {
        let k = CameraIntrinsics::from_row_major(IDENTITY)?;
        let rt = CameraToRoadExtrinsics::from_row_major([
            [1.0, 0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 5.0],
            [0.0, 0.0, 1.0, 0.0],
        ])?;
        assert!(matches!(
            RoadPlaneProjector::new(&k, &rt),
            Err(LaneDetectorError::SingularRotation(_))
        ));
        Ok(())
    }

    #[test]
    fn zero_camera_height() {
        assert!(matches!(
            level_camera(0.0),
            Err(LaneDetectorError::ZeroCameraHeight(_))
        ));
    }

    #[test]
    fn singular_intrinsics() -> Result<(), LaneDetectorError> {
        let k = CameraIntrinsics::from_row_major([[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]])?;
        let rt = CameraToRoadExtrinsics::from_row_major([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 5.0],
            [0.0, 0.0, 1.0, 0.0],
        ])?;
        assert!(matches!(
            RoadPlaneProjector::new(&k, &rt),
            Err(LaneDetectorError::SingularIntrinsics(_))
        ));
        Ok(())
    }

    #[test]
    fn pixel_on_horizon() -> Result<(), LaneDetectorError> {
        // row zero is the horizon of a level camera with K = I
        let projector = level_camera(5.0)?;
        assert!(matches!(
            projector.project([12.0, 0.0]),
            Err(LaneDetectorError::DegenerateProjection(x, y)) if x == 12.0 && y == 0.0
        ));
        Ok(())
    }
}
