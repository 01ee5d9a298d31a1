use std::collections::HashMap;

use tracing::{debug, warn};

use crate::crossing::record::CrossingRecord;
use crate::error::{ConfigError, CrossingError};
use crate::tracker::IdentifiedDetection;

/// Emits one crossing per identifier per cool-down window.
///
/// The test is level-triggered: any centroid at or below `line_y` counts,
/// whether or not the object was ever seen above the line.
#[derive(Debug, Clone)]
pub struct CrossingDeduplicator {
    cooldown: HashMap<u64, f64>,
    cooldown_duration: f64,
    last_timestamp: Option<f64>,
}

impl CrossingDeduplicator {
    /// `cooldown_duration` is in seconds and must be finite and non-negative.
    pub fn new(cooldown_duration: f64) -> Result<Self, ConfigError> {
        if !(cooldown_duration.is_finite() && cooldown_duration >= 0.0) {
            return Err(ConfigError::InvalidCooldown(cooldown_duration));
        }
        Ok(Self {
            cooldown: HashMap::new(),
            cooldown_duration,
            last_timestamp: None,
        })
    }

    pub fn cooldown_duration(&self) -> f64 {
        self.cooldown_duration
    }

    /// Evict expired cool-downs, then record every identifier whose centroid
    /// is at or below `line_y` and is not cooling down.
    ///
    /// Timestamps must be finite, may repeat, and must not go backwards. A
    /// rejected call leaves the cool-down table untouched.
    pub fn check_crossings(
        &mut self,
        detections: &[IdentifiedDetection],
        line_y: i32,
        now: f64,
    ) -> Result<Vec<CrossingRecord>, CrossingError> {
        if !now.is_finite() {
            return Err(CrossingError::InvalidTimestamp);
        }
        if let Some(previous) = self.last_timestamp {
            if now < previous {
                warn!(previous, now, "rejecting out-of-order timestamp");
                return Err(CrossingError::TimestampRegression { previous, now });
            }
        }
        self.last_timestamp = Some(now);

        let duration = self.cooldown_duration;
        self.cooldown.retain(|_, recorded| now - *recorded < duration);

        let mut crossings = Vec::new();
        for det in detections {
            if det.centroid.y < line_y || self.cooldown.contains_key(&det.track_id) {
                continue;
            }
            self.cooldown.insert(det.track_id, now);
            debug!(
                track_id = det.track_id,
                x = det.centroid.x,
                y = det.centroid.y,
                "crossed line"
            );
            crossings.push(CrossingRecord::new(det, now));
        }

        Ok(crossings)
    }

    pub fn is_cooling_down(&self, track_id: u64) -> bool {
        self.cooldown.contains_key(&track_id)
    }

    /// Number of live cool-down entries.
    pub fn len(&self) -> usize {
        self.cooldown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cooldown.is_empty()
    }
}
