use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Lower bound (exclusive) of the accepted width/height ratio.
pub const MIN_ASPECT_RATIO: f64 = 0.5;
/// Upper bound (exclusive) of the accepted width/height ratio.
pub const MAX_ASPECT_RATIO: f64 = 2.0;

/// Bounding box in the original image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Width divided by height, `None` for a zero-height box
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }

    /// `[x, y, w, h]`, the layout used in the manifest
    pub fn to_array(&self) -> [u32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// Whether a ratio falls strictly inside the icon range
pub fn is_icon_ratio(ratio: f64) -> bool {
    ratio > MIN_ASPECT_RATIO && ratio < MAX_ASPECT_RATIO
}

/// External boundary of one foreground region, as polyline vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point<u32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<u32>>) -> Self {
        Self { points }
    }

    /// Smallest axis-aligned rectangle enclosing every point.
    /// Extents are inclusive, so a single point yields a 1x1 box.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }
}

/// One accepted icon as written to the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRecord {
    pub image_path: String,
    pub bounds: [u32; 4],
}

impl IconRecord {
    pub fn new(image_path: impl Into<String>, bbox: &BoundingBox) -> Self {
        Self {
            image_path: image_path.into(),
            bounds: bbox.to_array(),
        }
    }
}
