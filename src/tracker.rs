mod associator;
mod matching;
mod rect;
mod track;

pub use associator::TrackAssociator;
pub use matching::{Detection, IdentifiedDetection, nearest_track};
pub use rect::{BBox, Centroid};
pub use track::{Track, TrackIdAllocator};
