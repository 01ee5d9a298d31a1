use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds for association, deduplication and crossing capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineCrossingConfig {
    /// Pixels; a detection matches a track only when strictly closer.
    pub distance_threshold: f64,
    /// Seconds during which a repeat crossing of the same id is suppressed.
    pub cooldown: f64,
    /// Line height as a fraction of the frame height.
    pub line_position: f64,
    pub process_every_n_frames: u32,
    pub crop_padding: u32,
    /// Crops shorter than this, after padding and clamping, are dropped.
    pub min_crop_height: u32,
}

impl Default for LineCrossingConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 100.0,
            cooldown: 2.0,
            line_position: 0.8,
            process_every_n_frames: 2,
            crop_padding: 20,
            min_crop_height: 500,
        }
    }
}

impl LineCrossingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.distance_threshold.is_finite() && self.distance_threshold > 0.0) {
            return Err(ConfigError::InvalidDistanceThreshold(self.distance_threshold));
        }
        if !(self.cooldown.is_finite() && self.cooldown >= 0.0) {
            return Err(ConfigError::InvalidCooldown(self.cooldown));
        }
        if !(0.0..=1.0).contains(&self.line_position) {
            return Err(ConfigError::InvalidLinePosition(self.line_position));
        }
        if self.process_every_n_frames == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        Ok(())
    }

    /// Pixel row of the crossing line for a frame of the given height.
    pub fn line_y(&self, frame_height: u32) -> i32 {
        (f64::from(frame_height) * self.line_position) as i32
    }
}
