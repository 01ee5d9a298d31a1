//! CrossingPipeline for combining detection with association and deduplication.

use serde::Serialize;
use tracing::info;

use crate::config::LineCrossingConfig;
use crate::crossing::{CrossingDeduplicator, CrossingRecord};
use crate::error::{ConfigError, PipelineError};
use crate::tracker::{Detection, IdentifiedDetection, TrackAssociator};

use super::{CropRegion, DetectionSource};

/// A crossing together with the frame region to capture for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedCrossing {
    pub record: CrossingRecord,
    /// `None` when the padded box is too short to be worth sending.
    pub crop: Option<CropRegion>,
}

/// Result of one sampled frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// 1-based index of the frame in the stream
    pub frame_index: u64,
    /// Stream time in seconds, `frame_index / fps`
    pub timestamp: f64,
    pub line_y: i32,
    pub detections: Vec<IdentifiedDetection>,
    pub crossings: Vec<CapturedCrossing>,
}

/// Runs detection, association and crossing deduplication frame by frame.
///
/// One pipeline owns the state of one video stream. Frames must be fed in
/// stream order; every call counts as one frame even when it is skipped by
/// the sampling interval.
pub struct CrossingPipeline<D: DetectionSource> {
    detector: D,
    associator: TrackAssociator,
    deduplicator: CrossingDeduplicator,
    config: LineCrossingConfig,
    fps: f64,
    frame_index: u64,
}

impl<D: DetectionSource> CrossingPipeline<D> {
    /// Create a new pipeline for a stream running at `fps` frames per second.
    pub fn new(detector: D, config: LineCrossingConfig, fps: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        if !(fps.is_finite() && fps > 0.0) {
            return Err(ConfigError::InvalidFrameRate(fps));
        }
        Ok(Self {
            detector,
            associator: TrackAssociator::new(config.distance_threshold)?,
            deduplicator: CrossingDeduplicator::new(config.cooldown)?,
            config,
            fps,
            frame_index: 0,
        })
    }

    /// Create a new pipeline with the default configuration.
    pub fn with_default_config(detector: D, fps: f64) -> Result<Self, ConfigError> {
        Self::new(detector, LineCrossingConfig::default(), fps)
    }

    /// Advance one frame. Returns `Ok(None)` for frames skipped by the
    /// sampling interval; the detector is not invoked for those.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Option<FrameOutput>, PipelineError<D::Error>> {
        self.frame_index += 1;
        if self.frame_index % u64::from(self.config.process_every_n_frames) != 0 {
            return Ok(None);
        }

        let detections = self
            .detector
            .detect(input, width, height)
            .map_err(PipelineError::Detection)?;
        self.track(detections, width, height).map(Some)
    }

    fn track(
        &mut self,
        detections: Vec<Detection>,
        width: u32,
        height: u32,
    ) -> Result<FrameOutput, PipelineError<D::Error>> {
        let timestamp = self.frame_index as f64 / self.fps;
        let line_y = self.config.line_y(height);

        let identified = self.associator.associate(&detections);
        let records = self
            .deduplicator
            .check_crossings(&identified, line_y, timestamp)?;

        let crossings = records
            .into_iter()
            .map(|record| {
                info!(
                    track_id = record.track_id,
                    timestamp = record.timestamp,
                    "object crossed line"
                );
                let crop = CropRegion::around(
                    &record.bbox,
                    width,
                    height,
                    self.config.crop_padding,
                    self.config.min_crop_height,
                );
                if crop.is_none() {
                    info!(track_id = record.track_id, "crossing crop rejected, region too small");
                }
                CapturedCrossing { record, crop }
            })
            .collect();

        Ok(FrameOutput {
            frame_index: self.frame_index,
            timestamp,
            line_y,
            detections: identified,
            crossings,
        })
    }

    /// Number of frames seen so far, sampled or not.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn config(&self) -> &LineCrossingConfig {
        &self.config
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Read-only view of the association state.
    pub fn associator(&self) -> &TrackAssociator {
        &self.associator
    }

    /// Read-only view of the cool-down state.
    pub fn deduplicator(&self) -> &CrossingDeduplicator {
        &self.deduplicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct MockDetector {
        frames: VecDeque<Vec<Detection>>,
        calls: usize,
    }

    impl MockDetector {
        fn new(frames: Vec<Vec<Detection>>) -> Self {
            Self {
                frames: frames.into(),
                calls: 0,
            }
        }
    }

    impl DetectionSource for MockDetector {
        type Error = std::convert::Infallible;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<Detection>, Self::Error> {
            self.calls += 1;
            Ok(self.frames.pop_front().unwrap_or_default())
        }
    }

    struct FailingDetector;

    impl DetectionSource for FailingDetector {
        type Error = String;

        fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<Vec<Detection>, Self::Error> {
            Err("model not loaded".to_string())
        }
    }

    fn every_frame() -> LineCrossingConfig {
        LineCrossingConfig {
            process_every_n_frames: 1,
            min_crop_height: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_sampling_skips_detector() {
        let detector = MockDetector::new(vec![vec![], vec![]]);
        let mut pipeline = CrossingPipeline::with_default_config(detector, 30.0).unwrap();

        assert!(pipeline.process_frame(&[], 640, 480).unwrap().is_none());
        let out = pipeline.process_frame(&[], 640, 480).unwrap().unwrap();
        assert_eq!(out.frame_index, 2);
        assert!(pipeline.process_frame(&[], 640, 480).unwrap().is_none());
        assert_eq!(pipeline.detector().calls, 1);
    }

    #[test]
    fn test_timestamp_and_line_derivation() {
        let detector = MockDetector::new(vec![vec![Detection::new(100, 380, 140, 420, 0.9)]]);
        let mut pipeline = CrossingPipeline::new(detector, every_frame(), 10.0).unwrap();

        let out = pipeline.process_frame(&[], 640, 500).unwrap().unwrap();
        assert!((out.timestamp - 0.1).abs() < 1e-12);
        assert_eq!(out.line_y, 400);
        assert_eq!(out.detections[0].track_id, 1);
        assert_eq!(out.crossings.len(), 1);
        assert_eq!(out.crossings[0].record.track_id, 1);
        assert_eq!(
            out.crossings[0].crop,
            Some(CropRegion {
                x: 80,
                y: 360,
                width: 80,
                height: 80
            })
        );
    }

    #[test]
    fn test_small_crop_is_dropped_but_crossing_kept() {
        let detector = MockDetector::new(vec![vec![Detection::new(100, 380, 140, 420, 0.9)]]);
        let mut pipeline = CrossingPipeline::with_default_config(detector, 1.0).unwrap();

        pipeline.process_frame(&[], 640, 500).unwrap();
        let out = pipeline.process_frame(&[], 640, 500).unwrap().unwrap();
        assert_eq!(out.crossings.len(), 1);
        assert_eq!(out.crossings[0].crop, None);
        assert!(pipeline.deduplicator().is_cooling_down(1));
    }

    #[test]
    fn test_detector_error_is_propagated() {
        let mut pipeline = CrossingPipeline::new(FailingDetector, every_frame(), 30.0).unwrap();
        let err = pipeline.process_frame(&[], 640, 480).unwrap_err();
        assert!(matches!(err, PipelineError::Detection(ref msg) if msg == "model not loaded"));
        assert!(pipeline.associator().is_empty());
    }

    #[test]
    fn test_rejects_bad_frame_rate() {
        let detector = MockDetector::new(vec![]);
        assert!(matches!(
            CrossingPipeline::with_default_config(detector, 0.0),
            Err(ConfigError::InvalidFrameRate(_))
        ));
    }
}
