use glam::{DMat3, DVec3};

use crate::error::CalibrationError;

fn check_finite<'a>(
    name: &'static str,
    values: impl IntoIterator<Item = &'a f64>,
) -> Result<(), CalibrationError> {
    match values.into_iter().position(|v| !v.is_finite()) {
        Some(index) => Err(CalibrationError::NonFinite { name, index }),
        None => Ok(()),
    }
}

/// The pinhole intrinsic matrix of a camera.
///
/// ```text
/// | fx  s  cx |
/// |  0 fy  cy |
/// |  0  0   1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    matrix: DMat3,
}

impl CameraIntrinsics {
    /// Create the intrinsics from a row-major 3x3 matrix.
    pub fn from_row_major(rows: [[f64; 3]; 3]) -> Result<Self, CalibrationError> {
        check_finite("intrinsics", rows.iter().flatten())?;
        Ok(Self {
            matrix: DMat3::from_cols_array_2d(&rows).transpose(),
        })
    }

    /// Create the intrinsics from the left 3x3 block of a 3x4 projection matrix.
    pub fn from_projection_matrix(rows: [[f64; 4]; 3]) -> Result<Self, CalibrationError> {
        Self::from_row_major(rows.map(|r| [r[0], r[1], r[2]]))
    }

    /// The intrinsic matrix.
    pub fn matrix(&self) -> DMat3 {
        self.matrix
    }

    /// The intrinsic matrix in row-major order.
    pub fn to_row_major(&self) -> [[f64; 3]; 3] {
        self.matrix.transpose().to_cols_array_2d()
    }
}

/// The camera-to-road transformation `[R | t]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraToRoadExtrinsics {
    rotation: DMat3,
    translation: DVec3,
}

impl CameraToRoadExtrinsics {
    /// Create the extrinsics from a row-major 3x4 matrix.
    pub fn from_row_major(rows: [[f64; 4]; 3]) -> Result<Self, CalibrationError> {
        check_finite("camera_to_road", rows.iter().flatten())?;
        let rotation = DMat3::from_cols_array_2d(&rows.map(|r| [r[0], r[1], r[2]])).transpose();
        let translation = DVec3::new(rows[0][3], rows[1][3], rows[2][3]);
        Ok(Self {
            rotation,
            translation,
        })
    }

    /// Create the extrinsics from 12 values of a 3x4 matrix in row-major order.
    pub fn from_slice(values: &[f64]) -> Result<Self, CalibrationError> {
        if values.len() != 12 {
            return Err(CalibrationError::InvalidLength {
                name: "camera_to_road",
                expected: 12,
                actual: values.len(),
            });
        }

        let mut rows = [[0.0; 4]; 3];
        for (row, chunk) in rows.iter_mut().zip(values.chunks_exact(4)) {
            row.copy_from_slice(chunk);
        }

        Self::from_row_major(rows)
    }

    /// The camera-to-road rotation `R`.
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    /// The camera-to-road translation `t`.
    pub fn translation(&self) -> DVec3 {
        self.translation
    }
}
