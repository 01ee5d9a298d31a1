//! Integration module for connecting detection backends to the crossing core.
//!
//! This module provides the detector seam, a per-frame pipeline that drives
//! association and deduplication, and the crop geometry used for captures.

mod builder;
mod crop;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use crop::CropRegion;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::{CapturedCrossing, CrossingPipeline, FrameOutput};
