use crate::error::{ExtractError, Result};
use crate::models::BoundingBox;

/// Aspect ratio of a box, failing on a zero-height box
pub fn checked_aspect_ratio(bbox: &BoundingBox) -> Result<f64> {
    bbox.aspect_ratio().ok_or(ExtractError::DegenerateBounds { x: bbox.x, y: bbox.y })
}
