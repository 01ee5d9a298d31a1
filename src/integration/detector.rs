//! Trait for object detection inference backends.

use crate::tracker::Detection;

/// Trait for object detection inference backends.
///
/// Implement this trait to feed any detection model into a
/// [`CrossingPipeline`](super::CrossingPipeline). Backends that run their own
/// tracker should fill [`Detection::track_id`]; it takes precedence over
/// centroid matching.
///
/// # Example
///
/// ```ignore
/// use crossline_rs::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on one frame and return its detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// `(x1, y1, x2, y2, confidence, track_id)` tuples, the layout most
/// detector wrappers already emit.
impl IntoDetections for Vec<(i32, i32, i32, i32, f32, Option<u64>)> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .map(|(x1, y1, x2, y2, score, track_id)| Detection {
                track_id,
                ..Detection::new(x1, y1, x2, y2, score)
            })
            .collect()
    }
}
