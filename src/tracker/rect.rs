use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Integer pixel bounding box.
///
/// Coordinates follow the TLBR layout produced by detectors:
/// - `x1`, `y1`: top-left corner
/// - `x2`, `y2`: bottom-right corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    /// Top-left x coordinate
    pub x1: i32,
    /// Top-left y coordinate
    pub y1: i32,
    /// Bottom-right x coordinate
    pub x2: i32,
    /// Bottom-right y coordinate
    pub y2: i32,
}

impl BBox {
    /// Create a box from TLBR coordinates. No ordering checks are made.
    #[inline]
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a box from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn from_tlwh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [i32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Integer midpoint of the box, rounded toward negative infinity.
    #[inline]
    pub fn centroid(&self) -> Centroid {
        Centroid {
            x: midpoint(self.x1, self.x2),
            y: midpoint(self.y1, self.y2),
        }
    }
}

// Summed in i64; the midpoint of two i32 values always fits i32.
#[inline]
fn midpoint(a: i32, b: i32) -> i32 {
    (i64::from(a) + i64::from(b)).div_euclid(2) as i32
}

/// Integer midpoint of a [`BBox`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
}

impl Centroid {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_point(self) -> Point2<f64> {
        Point2::new(f64::from(self.x), f64::from(self.y))
    }

    /// Euclidean distance in pixels.
    #[inline]
    pub fn distance(&self, other: &Centroid) -> f64 {
        nalgebra::distance(&self.to_point(), &other.to_point())
    }
}
