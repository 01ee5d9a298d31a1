//! Centroid track association and deduplicated line-crossing events.
//!
//! Feed each frame's detections through a [`TrackAssociator`] to get stable
//! identifiers, then through a [`CrossingDeduplicator`] to get at most one
//! [`CrossingRecord`] per identifier per cool-down window.
//! [`CrossingPipeline`] wires both behind a [`DetectionSource`].

pub mod crossing;
pub mod integration;
pub mod tracker;

mod config;
mod error;

pub use config::LineCrossingConfig;
pub use crossing::{CrossingDeduplicator, CrossingRecord};
pub use error::{ConfigError, CrossingError, PipelineError};
pub use integration::{
    CapturedCrossing, CropRegion, CrossingPipeline, DetectionBuilder, DetectionSource, FrameOutput,
    IntoDetections,
};
pub use tracker::{BBox, Centroid, Detection, IdentifiedDetection, TrackAssociator};
