use crate::tracker::{BBox, Detection};

/// Builds a [`Detection`] from a detector's float output.
///
/// Coordinates snap to the nearest pixel on `build`.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    corners: [f32; 4],
    score: f32,
    track_id: Option<u64>,
}

impl DetectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corners as (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.corners = [x1, y1, x2, y2];
        self
    }

    /// Centre and size, the layout YOLO heads emit.
    pub fn xywh(self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        let (hw, hh) = (w / 2.0, h / 2.0);
        self.tlbr(cx - hw, cy - hh, cx + hw, cy + hh)
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Identifier from an upstream tracker, if it reported one.
    pub fn track_id(mut self, track_id: Option<u64>) -> Self {
        self.track_id = track_id;
        self
    }

    pub fn build(self) -> Detection {
        let [x1, y1, x2, y2] = self.corners.map(|v| v.round() as i32);
        Detection {
            bbox: BBox::new(x1, y1, x2, y2),
            score: self.score,
            track_id: self.track_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tlbr_passes_through() {
        let det = DetectionBuilder::new()
            .tlbr(10.0, 20.0, 50.0, 80.0)
            .score(0.95)
            .build();

        assert_eq!(det.score, 0.95);
        assert_eq!(det.bbox, BBox::new(10, 20, 50, 80));
        assert_eq!(det.track_id, None);
    }

    #[test]
    fn test_xywh_rounds_to_pixels() {
        let det = DetectionBuilder::new()
            .xywh(120.0, 400.0, 40.4, 40.0)
            .track_id(Some(42))
            .build();

        assert_eq!(det.bbox, BBox::new(100, 380, 140, 420));
        assert_eq!(det.track_id, Some(42));
    }
}
