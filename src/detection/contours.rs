use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::models::Contour;

/// Copy of `mask` inside a one-pixel background frame.
/// The tracer only starts an outer border after a background pixel, so
/// regions touching column 0 need the frame to be found.
fn pad_with_background(mask: &GrayImage) -> GrayImage {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    for (x, y, p) in mask.enumerate_pixels() {
        padded.put_pixel(x + 1, y + 1, *p);
    }
    padded
}

/// Find the outermost borders of the foreground (non-zero) regions.
///
/// Holes and any region nested inside a hole are dropped. Contours come back
/// in the order the tracer meets their first pixel in a raster scan.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<u32>(&pad_with_background(mask))
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            // back to mask coordinates; frame pixels are never foreground
            let points: Vec<_> = c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect();
            Contour::new(compress_chain(&points))
        })
        .collect()
}

fn step(from: Point<u32>, to: Point<u32>) -> (i64, i64) {
    (
        (to.x as i64 - from.x as i64).signum(),
        (to.y as i64 - from.y as i64).signum(),
    )
}

/// Collapse straight runs of a closed boundary to their end points.
///
/// A point survives when the direction into it differs from the direction out
/// of it. Consecutive duplicates (including last == first) are merged first.
pub fn compress_chain(points: &[Point<u32>]) -> Vec<Point<u32>> {
    let mut chain: Vec<Point<u32>> = Vec::with_capacity(points.len());
    for &p in points {
        if chain.last() != Some(&p) {
            chain.push(p);
        }
    }
    while chain.len() > 1 && chain.first() == chain.last() {
        chain.pop();
    }

    let n = chain.len();
    if n < 3 {
        return chain;
    }

    (0..n)
        .filter(|&i| {
            let prev = chain[(i + n - 1) % n];
            let next = chain[(i + 1) % n];
            step(prev, chain[i]) != step(chain[i], next)
        })
        .map(|i| chain[i])
        .collect()
}
