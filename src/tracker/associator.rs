//! Greedy centroid association of per-frame detections to live tracks.

use std::collections::HashSet;

use tracing::debug;

use crate::error::ConfigError;
use crate::tracker::matching::{self, Detection, IdentifiedDetection};
use crate::tracker::rect::Centroid;
use crate::tracker::track::{Track, TrackIdAllocator};

/// Assigns stable identifiers to detections frame by frame.
///
/// The track table keeps insertion order: an existing track keeps its slot
/// when its centroid is overwritten and new tracks are appended. Nearest
/// neighbour ties therefore resolve to the longest-lived slot.
#[derive(Debug, Clone)]
pub struct TrackAssociator {
    tracks: Vec<Track>,
    ids: TrackIdAllocator,
    distance_threshold: f64,
}

impl TrackAssociator {
    /// `distance_threshold` is in pixels; matches must be strictly closer.
    /// It must be positive and finite.
    pub fn new(distance_threshold: f64) -> Result<Self, ConfigError> {
        if !(distance_threshold.is_finite() && distance_threshold > 0.0) {
            return Err(ConfigError::InvalidDistanceThreshold(distance_threshold));
        }
        Ok(Self {
            tracks: Vec::new(),
            ids: TrackIdAllocator::new(),
            distance_threshold,
        })
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    /// Resolve an identifier for every detection of one frame, in input order.
    ///
    /// Each resolved centroid is written to the table before the next
    /// detection is examined, so later detections in the same frame match
    /// against it. Once the frame is done, every track that was not resolved
    /// this frame is dropped.
    pub fn associate(&mut self, detections: &[Detection]) -> Vec<IdentifiedDetection> {
        let mut identified = Vec::with_capacity(detections.len());
        let mut seen = HashSet::with_capacity(detections.len());

        for det in detections {
            let centroid = det.centroid();

            let track_id = match det.track_id {
                Some(external) => external,
                None => {
                    match matching::nearest_track(&self.tracks, &centroid, self.distance_threshold)
                    {
                        Some(id) => id,
                        None => {
                            let id = self.ids.next_id();
                            debug!(track_id = id, x = centroid.x, y = centroid.y, "new track");
                            id
                        }
                    }
                }
            };

            self.upsert(track_id, centroid);
            seen.insert(track_id);
            identified.push(IdentifiedDetection {
                detection: det.clone(),
                track_id,
                centroid,
            });
        }

        let before = self.tracks.len();
        self.tracks.retain(|t| seen.contains(&t.track_id));
        if self.tracks.len() < before {
            debug!(evicted = before - self.tracks.len(), live = self.tracks.len(), "evicted tracks");
        }

        identified
    }

    fn upsert(&mut self, track_id: u64, centroid: Centroid) {
        match self.tracks.iter_mut().find(|t| t.track_id == track_id) {
            Some(track) => track.centroid = centroid,
            None => self.tracks.push(Track::new(track_id, centroid)),
        }
    }

    /// Number of live tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn is_live(&self, track_id: u64) -> bool {
        self.tracks.iter().any(|t| t.track_id == track_id)
    }

    /// Live identifiers in table order.
    pub fn live_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.tracks.iter().map(|t| t.track_id)
    }

    /// Highest identifier allocated by this associator, 0 if none.
    pub fn last_allocated_id(&self) -> u64 {
        self.ids.last_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(cx: i32, cy: i32) -> Detection {
        Detection::new(cx - 20, cy - 20, cx + 20, cy + 20, 0.9)
    }

    #[test]
    fn test_smooth_motion_keeps_id() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        let mut ids = Vec::new();
        for step in 0..10 {
            let out = assoc.associate(&[det(100 + step * 30, 100 + step * 30)]);
            ids.push(out[0].track_id);
        }
        assert!(ids.iter().all(|&id| id == 1));
        assert_eq!(assoc.len(), 1);
    }

    #[test]
    fn test_far_detection_gets_new_id() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        assoc.associate(&[det(100, 100)]);
        let out = assoc.associate(&[det(100, 100), det(500, 500)]);
        assert_eq!(out[0].track_id, 1);
        assert_eq!(out[1].track_id, 2);
        assert_eq!(assoc.last_allocated_id(), 2);
    }

    #[test]
    fn test_external_id_bypasses_matching() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        assoc.associate(&[det(100, 100)]);
        let out = assoc.associate(&[det(101, 101).with_track_id(42)]);
        assert_eq!(out[0].track_id, 42);
        // Track 1 was not confirmed this frame
        assert!(!assoc.is_live(1));
        assert!(assoc.is_live(42));
        assert_eq!(assoc.last_allocated_id(), 1);
    }

    #[test]
    fn test_missing_for_one_frame_evicts() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        assoc.associate(&[det(100, 100)]);
        assoc.associate(&[]);
        assert!(assoc.is_empty());
        let out = assoc.associate(&[det(100, 100)]);
        assert_eq!(out[0].track_id, 2);
    }

    #[test]
    fn test_same_frame_detections_can_share_id() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        assoc.associate(&[det(100, 100)]);
        let out = assoc.associate(&[det(110, 100), det(90, 100)]);
        assert_eq!(out[0].track_id, 1);
        assert_eq!(out[1].track_id, 1);
        assert_eq!(assoc.len(), 1);
    }

    #[test]
    fn test_same_frame_update_seeds_later_match() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        // Fresh track 1 at (100,100) is visible to the second detection
        let out = assoc.associate(&[det(100, 100), det(150, 100)]);
        assert_eq!(out[0].track_id, 1);
        assert_eq!(out[1].track_id, 1);
    }

    #[test]
    fn test_earlier_detection_moves_track_away() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        assoc.associate(&[det(100, 100)]);
        // First detection drags track 1 to (190,100); second is then 140px away
        let out = assoc.associate(&[det(190, 100), det(50, 100)]);
        assert_eq!(out[0].track_id, 1);
        assert_eq!(out[1].track_id, 2);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        assert!(matches!(
            TrackAssociator::new(f64::NAN),
            Err(ConfigError::InvalidDistanceThreshold(_))
        ));
        assert_eq!(
            TrackAssociator::new(0.0).unwrap_err(),
            ConfigError::InvalidDistanceThreshold(0.0)
        );
        assert!(TrackAssociator::new(-5.0).is_err());
        assert!(TrackAssociator::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_distant_jump_is_a_new_object() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        let first = assoc.associate(&[Detection::new(0, 0, 10, 10, 0.9)]);
        let second = assoc.associate(&[Detection::new(5000, 5000, 5010, 5010, 0.9)]);
        assert_eq!(first[0].track_id, 1);
        assert_eq!(second[0].track_id, 2);
    }

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut assoc = TrackAssociator::new(100.0).unwrap();
        assoc.associate(&[det(100, 100), det(400, 100)]);
        let out = assoc.associate(&[det(400, 100), det(100, 100)]);
        assert_eq!(out[0].track_id, 2);
        assert_eq!(out[1].track_id, 1);
        assert_eq!(assoc.live_ids().collect::<Vec<_>>(), vec![1, 2]);
    }
}
