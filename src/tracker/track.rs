//! Live track entries and identifier allocation.

use crate::tracker::rect::Centroid;

/// A live track: an identifier bound to its last observed centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    /// Unique track identifier
    pub track_id: u64,
    /// Centroid from the most recent frame this track was seen in
    pub centroid: Centroid,
}

impl Track {
    pub fn new(track_id: u64, centroid: Centroid) -> Self {
        Self { track_id, centroid }
    }
}

/// Monotonic identifier counter. Issued ids start at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct TrackIdAllocator {
    last: u64,
}

impl TrackIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the next unique track ID.
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Most recently issued id, or 0 if none has been issued.
    pub fn last_id(&self) -> u64 {
        self.last
    }
}
