//! Matching utilities for centroid tracking.

use serde::{Deserialize, Serialize};

use crate::tracker::rect::{BBox, Centroid};
use crate::tracker::track::Track;

/// Detection input for the associator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    pub bbox: BBox,
    /// Detection confidence score
    pub score: f32,
    /// Identifier reported by an upstream tracker, if any
    #[serde(default)]
    pub track_id: Option<u64>,
}

impl Detection {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32, score: f32) -> Self {
        Self {
            bbox: BBox::new(x1, y1, x2, y2),
            score,
            track_id: None,
        }
    }

    pub fn from_bbox(bbox: BBox, score: f32) -> Self {
        Self {
            bbox,
            score,
            track_id: None,
        }
    }

    /// Attach an upstream track identifier. It overrides proximity matching.
    pub fn with_track_id(mut self, track_id: u64) -> Self {
        self.track_id = Some(track_id);
        self
    }

    #[inline]
    pub fn centroid(&self) -> Centroid {
        self.bbox.centroid()
    }
}

/// A detection resolved to a stable track identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifiedDetection {
    pub detection: Detection,
    pub track_id: u64,
    pub centroid: Centroid,
}

impl IdentifiedDetection {
    #[inline]
    pub fn bbox(&self) -> BBox {
        self.detection.bbox
    }

    #[inline]
    pub fn score(&self) -> f32 {
        self.detection.score
    }
}

/// Find the track whose centroid is closest to `centroid` and strictly
/// closer than `threshold`.
///
/// Ties resolve to the first minimum in slice order.
pub fn nearest_track(tracks: &[Track], centroid: &Centroid, threshold: f64) -> Option<u64> {
    let mut best: Option<(u64, f64)> = None;
    for track in tracks {
        let dist = centroid.distance(&track.centroid);
        // NaN never matches
        if !(dist < threshold) {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((track.track_id, dist)),
        }
    }
    best.map(|(id, _)| id)
}
