use serde::{Deserialize, Serialize};

use crate::tracker::{BBox, IdentifiedDetection};

/// A single crossing event, carrying enough to crop and report the object
/// without consulting tracker state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingRecord {
    pub track_id: u64,
    /// Stream time in seconds
    pub timestamp: f64,
    pub score: f32,
    pub bbox: BBox,
}

impl CrossingRecord {
    pub fn new(detection: &IdentifiedDetection, timestamp: f64) -> Self {
        Self {
            track_id: detection.track_id,
            timestamp,
            score: detection.score(),
            bbox: detection.bbox(),
        }
    }
}
