#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Pipeline
//!
//! A [`LaneDetector`] turns an RGB frame into the road-plane angles of the
//! left and right lane boundaries:
//!
//! 1. edges are extracted from a single channel ([`edges`]),
//! 2. edges outside the region of interest are suppressed ([`region`]),
//! 3. line segments are searched in the remaining edges ([`segments`]),
//! 4. the first segment of each side is selected ([`classifier`]),
//! 5. its endpoints are projected onto the road plane ([`projector`]),
//! 6. the direction of the projected segment gives the angle ([`angle`]).

/// Angles of lines in the road plane.
pub mod angle;

/// Camera calibration matrices.
pub mod calibration;

/// Left and right lane classification.
pub mod classifier;

/// Detector configuration.
pub mod config;

/// The lane detection pipeline.
pub mod detector;

/// Edge extraction stage.
pub mod edges;

/// Error types of the crate.
pub mod error;

/// KITTI calibration files.
pub mod kitti;

/// Observers of the intermediate pipeline results.
pub mod observer;

/// Projection of image points onto the road plane.
pub mod projector;

/// Region of interest masking.
pub mod region;

/// Image line segments.
pub mod segment;

/// Line segment detection stage.
pub mod segments;

pub use crate::calibration::{CameraIntrinsics, CameraToRoadExtrinsics};
pub use crate::config::DetectorConfig;
pub use crate::detector::{LaneDetector, LaneDetectorOutput};
pub use crate::error::{CalibrationError, LaneDetectorError};
