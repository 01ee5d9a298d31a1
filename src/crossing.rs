//! Deduplicated line-crossing events over identified detections.

mod deduplicator;
mod record;

pub use deduplicator::CrossingDeduplicator;
pub use record::CrossingRecord;
