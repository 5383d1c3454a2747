use std::path::Path;

use lanesight_imgproc::{features::HoughParams, filter::BorderMode};
use serde::{Deserialize, Serialize};

use crate::error::LaneDetectorError;
use crate::region::RegionOfInterest;

/// The single channel the edges are extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeChannel {
    /// The HSV value, `max(r, g, b)`.
    #[default]
    Value,
    /// The weighted luminance of the RGB channels.
    Luminance,
}

/// Parameters of the edge extraction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// The channel the edges are extracted from.
    pub channel: EdgeChannel,
    /// Size of the square gaussian kernel, odd.
    pub kernel_size: usize,
    /// Standard deviation of the gaussian kernel.
    pub sigma: f32,
    /// Border extrapolation of the gaussian blur.
    pub border: BorderMode,
    /// Hysteresis low threshold of the Canny detector.
    pub low_threshold: f32,
    /// Hysteresis high threshold of the Canny detector.
    pub high_threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            channel: EdgeChannel::Value,
            kernel_size: 5,
            sigma: 1.0,
            border: BorderMode::Replicate,
            low_threshold: 130.0,
            high_threshold: 200.0,
        }
    }
}

/// Configuration of the lane detection pipeline.
///
/// Every field falls back to its default when absent from a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Edge extraction parameters.
    pub edges: EdgeConfig,
    /// Region where lane edges are searched.
    pub roi: RegionOfInterest,
    /// Line segment search parameters.
    pub hough: HoughParams,
}

impl DetectorConfig {
    /// Parse a configuration from a JSON string.
    ///
    /// # Example
    ///
    /// ```
    /// use lanesight_detect::DetectorConfig;
    ///
    /// let config = DetectorConfig::from_json_str(r#"{ "hough": { "threshold": 25 } }"#)?;
    /// assert_eq!(config.hough.threshold, 25);
    /// assert_eq!(config.edges.kernel_size, 5);
    /// # Ok::<(), lanesight_detect::LaneDetectorError>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, LaneDetectorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LaneDetectorError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.edges.channel, EdgeChannel::Value);
        assert_eq!(config.edges.low_threshold, 130.0);
        assert_eq!(config.edges.high_threshold, 200.0);
        assert_eq!(config.roi.vertices.len(), 3);
        assert_eq!(config.hough.min_line_length, 20);
        assert_eq!(config.hough.max_line_gap, 10);
    }

    #[test]
    fn partial_json() -> Result<(), LaneDetectorError> {
        let config = DetectorConfig::from_json_str(
            r#"{
                "edges": { "channel": "luminance", "border": "constant", "sigma": 1.5 },
                "roi": { "vertices": [[0, 0], [100, 0], [50, 80]] }
            }"#,
        )?;

        assert_eq!(config.edges.channel, EdgeChannel::Luminance);
        assert_eq!(config.edges.border, BorderMode::Constant);
        assert_eq!(config.edges.sigma, 1.5);
        assert_eq!(config.edges.kernel_size, 5);
        assert_eq!(config.roi.vertices, vec![[0, 0], [100, 0], [50, 80]]);
        assert_eq!(config.hough, HoughParams::default());

        Ok(())
    }

    #[test]
    fn json_round_trip() -> Result<(), LaneDetectorError> {
        let config = DetectorConfig::default();
        let json = serde_json::to_string(&config)?;
        assert_eq!(DetectorConfig::from_json_str(&json)?, config);
        Ok(())
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            DetectorConfig::from_json_str(r#"{ "edges": { "channel": "red" } }"#),
            Err(LaneDetectorError::Config(_))
        ));
    }

    #[test]
    fn from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{ "hough": { "seed": 7, "max_lines": 12 } }"#)?;

        let config = DetectorConfig::from_json_file(file.path())?;
        assert_eq!(config.hough.seed, 7);
        assert_eq!(config.hough.max_lines, Some(12));

        Ok(())
    }
}
