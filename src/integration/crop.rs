use serde::{Deserialize, Serialize};

use crate::tracker::BBox;

/// Pixel region to cut from a frame when capturing a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Pad `bbox` by `padding` on every side and clamp it to the frame.
    ///
    /// Returns `None` when the clamped region is shorter than `min_height`
    /// or has no area.
    pub fn around(
        bbox: &BBox,
        frame_width: u32,
        frame_height: u32,
        padding: u32,
        min_height: u32,
    ) -> Option<Self> {
        let pad = i64::from(padding);
        let x1 = (i64::from(bbox.x1) - pad).max(0);
        let y1 = (i64::from(bbox.y1) - pad).max(0);
        let x2 = (i64::from(bbox.x2) + pad).min(i64::from(frame_width));
        let y2 = (i64::from(bbox.y2) + pad).min(i64::from(frame_height));

        let width = u32::try_from(x2 - x1).ok()?;
        let height = u32::try_from(y2 - y1).ok()?;
        if width == 0 || height == 0 || height < min_height {
            return None;
        }

        Some(Self {
            x: u32::try_from(x1).ok()?,
            y: u32::try_from(y1).ok()?,
            width,
            height,
        })
    }

    pub fn to_bbox(&self) -> BBox {
        BBox::from_tlwh(
            self.x as i32,
            self.y as i32,
            self.width as i32,
            self.height as i32,
        )
    }
}
