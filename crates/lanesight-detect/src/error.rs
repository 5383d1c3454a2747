use lanesight_image::ImageError;

/// An error raised while building calibration matrices.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    /// A matrix was built from the wrong number of values.
    #[error("Calibration matrix `{name}` expects {expected} values, got {actual}")]
    InvalidLength {
        /// Name of the matrix being built
        name: &'static str,
        /// Number of values required
        expected: usize,
        /// Number of values provided
        actual: usize,
    },

    /// A matrix entry is NaN or infinite.
    #[error("Calibration matrix `{name}` has a non-finite entry at index {index}")]
    NonFinite {
        /// Name of the matrix being built
        name: &'static str,
        /// Row-major index of the offending entry
        index: usize,
    },

    /// A calibration file names a matrix that is not understood.
    #[error("Unknown calibration key `{key}` on line {line}")]
    UnknownKey {
        /// The key as it appears in the file
        key: String,
        /// 1-based line number
        line: usize,
    },

    /// A required matrix is absent from a calibration file.
    #[error("Missing calibration key `{0}`")]
    MissingKey(&'static str),

    /// A calibration line is not of the form `KEY: v1 v2 ...`.
    #[error("Malformed calibration line {line}: {reason}")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// What is wrong with the line
        reason: String,
    },

    /// A calibration value is not a number.
    #[error("Failed to parse `{value}` on line {line}")]
    ParseFloat {
        /// 1-based line number
        line: usize,
        /// The token that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: std::num::ParseFloatError,
    },

    /// The requested camera index does not exist.
    #[error("Camera index {0} is out of range, expected 0..=3")]
    InvalidCamera(usize),

    /// Failed to read a calibration file.
    #[error("Failed to read calibration file. {0}")]
    Io(#[from] std::io::Error),
}

/// An error raised by the lane detector.
#[derive(thiserror::Error, Debug)]
pub enum LaneDetectorError {
    /// The camera-to-road rotation cannot be solved for the road origin.
    #[error("Camera-to-road rotation is singular (det = {0:e})")]
    SingularRotation(f64),

    /// The 4x4 intrinsic matrix is not invertible.
    #[error("Camera intrinsic matrix is singular (det = {0:e})")]
    SingularIntrinsics(f64),

    /// The camera lies on the road plane.
    #[error("Camera height above the road is zero ({0:e})")]
    ZeroCameraHeight(f64),

    /// An image point cannot be projected to the road plane.
    #[error("Pixel ({0}, {1}) cannot be projected onto the road plane")]
    DegenerateProjection(f64, f64),

    /// Malformed calibration data.
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// An image operation failed.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// A configuration file could not be decoded.
    #[error("Failed to decode detector configuration. {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("Failed to read detector configuration. {0}")]
    Io(#[from] std::io::Error),
}
