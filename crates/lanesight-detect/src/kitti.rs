use std::path::Path;

use crate::calibration::{CameraIntrinsics, CameraToRoadExtrinsics};
use crate::error::CalibrationError;

type Mat3x4 = [[f64; 4]; 3];

/// Calibration matrices of a KITTI road sequence.
///
/// A calibration file holds one `KEY: v1 v2 ...` record per line with the
/// projection matrices of the four cameras, the rectifying rotation and the
/// rigid transformations between the sensors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KittiCalibration {
    projections: [Option<Mat3x4>; 4],
    r0_rect: Option<[[f64; 3]; 3]>,
    velo_to_cam: Option<Mat3x4>,
    imu_to_velo: Option<Mat3x4>,
    cam_to_road: Option<Mat3x4>,
}

impl KittiCalibration {
    /// The 3x4 projection matrix `P<camera>`.
    pub fn projection(&self, camera: usize) -> Result<Mat3x4, CalibrationError> {
        const KEYS: [&str; 4] = ["P0", "P1", "P2", "P3"];
        let slot = self
            .projections
            .get(camera)
            .ok_or(CalibrationError::InvalidCamera(camera))?;
        slot.ok_or(CalibrationError::MissingKey(KEYS[camera]))
    }

    /// The intrinsics of a camera, the left 3x3 block of `P<camera>`.
    pub fn intrinsics(&self, camera: usize) -> Result<CameraIntrinsics, CalibrationError> {
        CameraIntrinsics::from_projection_matrix(self.projection(camera)?)
    }

    /// The camera-to-road transformation `Tr_cam_to_road`.
    pub fn camera_to_road(&self) -> Result<CameraToRoadExtrinsics, CalibrationError> {
        let rows = self
            .cam_to_road
            .ok_or(CalibrationError::MissingKey("Tr_cam_to_road"))?;
        CameraToRoadExtrinsics::from_row_major(rows)
    }

    /// The rectifying rotation `R0_rect`, if present.
    ///
    /// Not read by the lane pipeline, kept so every record of a road
    /// calibration file is accessible.
    pub fn r0_rect(&self) -> Option<[[f64; 3]; 3]> {
        self.r0_rect
    }

    /// The lidar-to-camera transformation `Tr_velo_to_cam`, if present.
    ///
    /// Not read by the lane pipeline, kept so every record of a road
    /// calibration file is accessible.
    pub fn velo_to_cam(&self) -> Option<Mat3x4> {
        self.velo_to_cam
    }

    /// The imu-to-lidar transformation `Tr_imu_to_velo`, if present.
    ///
    /// Not read by the lane pipeline, kept so every record of a road
    /// calibration file is accessible.
    pub fn imu_to_velo(&self) -> Option<Mat3x4> {
        self.imu_to_velo
    }
}

fn parse_values<const N: usize>(
    tokens: &[&str],
    line: usize,
) -> Result<[f64; N], CalibrationError> {
    if tokens.len() != N {
        return Err(CalibrationError::MalformedLine {
            line,
            reason: format!("expected {N} values, got {}", tokens.len()),
        });
    }

    let mut values = [0.0; N];
    for (v, token) in values.iter_mut().zip(tokens) {
        *v = token.parse().map_err(|source| CalibrationError::ParseFloat {
            line,
            value: token.to_string(),
            source,
        })?;
    }

    Ok(values)
}

fn parse_mat3x4(tokens: &[&str], line: usize) -> Result<Mat3x4, CalibrationError> {
    let v = parse_values::<12>(tokens, line)?;
    Ok([
        [v[0], v[1], v[2], v[3]],
        [v[4], v[5], v[6], v[7]],
        [v[8], v[9], v[10], v[11]],
    ])
}

/// Parse the contents of a KITTI road calibration file.
///
/// Blank lines are skipped. Unknown keys are rejected.
///
/// # Example
///
/// ```
/// use lanesight_detect::kitti::parse_kitti_calibration;
///
/// let calib = parse_kitti_calibration(
///     "P2: 721.5 0 609.5 44.8 0 721.5 172.8 0.2 0 0 1 0.002\n\
///      Tr_cam_to_road: 1 0 0 0 0 1 0 -1.65 0 0 1 0\n",
/// )?;
///
/// let k = calib.intrinsics(2)?;
/// assert_eq!(k.to_row_major()[0], [721.5, 0.0, 609.5]);
/// # Ok::<(), lanesight_detect::CalibrationError>(())
/// ```
pub fn parse_kitti_calibration(contents: &str) -> Result<KittiCalibration, CalibrationError> {
    let mut calib = KittiCalibration::default();

    for (idx, raw) in contents.lines().enumerate() {
        let line = idx + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let (key, rest) = raw
            .split_once(':')
            .ok_or_else(|| CalibrationError::MalformedLine {
                line,
                reason: "missing `:` after the key".to_string(),
            })?;
        let tokens = rest.split_whitespace().collect::<Vec<_>>();

        match key.trim() {
            "P0" => calib.projections[0] = Some(parse_mat3x4(&tokens, line)?),
            "P1" => calib.projections[1] = Some(parse_mat3x4(&tokens, line)?),
            "P2" => calib.projections[2] = Some(parse_mat3x4(&tokens, line)?),
            "P3" => calib.projections[3] = Some(parse_mat3x4(&tokens, line)?),
            "R0_rect" => {
                let v = parse_values::<9>(&tokens, line)?;
                calib.r0_rect = Some([[v[0], v[1], v[2]], [v[3], v[4], v[5]], [v[6], v[7], v[8]]]);
            }
            "Tr_velo_to_cam" => calib.velo_to_cam = Some(parse_mat3x4(&tokens, line)?),
            "Tr_imu_to_velo" => calib.imu_to_velo = Some(parse_mat3x4(&tokens, line)?),
            "Tr_cam_to_road" => calib.cam_to_road = Some(parse_mat3x4(&tokens, line)?),
            other => {
                return Err(CalibrationError::UnknownKey {
                    key: other.to_string(),
                    line,
                })
            }
        }
    }

    log::debug!(
        "parsed kitti calibration: cameras {:?}, cam_to_road {}",
        calib.projections.iter().map(Option::is_some).collect::<Vec<_>>(),
        calib.cam_to_road.is_some()
    );

    Ok(calib)
}

/// Read a KITTI road calibration file from disk.
///
/// # Arguments
///
/// * `path` - The path to the calibration file, e.g. `calib/um_000000.txt`.
pub fn read_kitti_calibration(path: impl AsRef<Path>) -> Result<KittiCalibration, CalibrationError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_kitti_calibration(&contents)
}
