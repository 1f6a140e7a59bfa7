use image::DynamicImage;
use tracing::debug;

use crate::detection::filter::checked_aspect_ratio;
use crate::detection::{contours, preprocessing};
use crate::error::Result;
use crate::models::is_icon_ratio;
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| item.with_image(DynamicImage::ImageLuma8(preprocessing::to_grayscale(&item.image))))
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Inverted Otsu binarization: dark content becomes foreground
pub struct ThresholdStep;

impl PipelineStep for ThresholdStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::with_capacity(data.len());
        for item in data {
            let (binary, level) = preprocessing::otsu_binarize_inv(&item.image.to_luma8());
            debug!("otsu level: {}", level);

            result.push(
                item.with_image(DynamicImage::ImageLuma8(binary))
                    .with_metadata("threshold_level", MetadataValue::Int(level as i64)),
            );
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Find external contours in a binary mask - splits one image into many regions
pub struct ContourDetectionStep;

impl PipelineStep for ContourDetectionStep {
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let detected = contours::find_external_contours(&item.image.to_luma8());
            debug!("found {} external contours", detected.len());

            // Each contour becomes its own PipelineData, cropped from the original
            for contour in detected {
                let Some(bbox) = contour.bounding_box() else {
                    continue;
                };
                if context.verbose {
                    debug!(
                        "  contour at ({}, {}) {}x{}, {} vertices",
                        bbox.x, bbox.y, bbox.width, bbox.height, contour.vertex_count()
                    );
                }

                let cropped = item.original.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height);
                let vertex_count = contour.vertex_count() as i64;

                result.push(
                    PipelineData::from_region(cropped, item.original.clone(), bbox, contour)
                        .with_metadata("vertex_count", MetadataValue::Int(vertex_count)),
                );
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Contour Detection"
    }
}

/// Keep regions whose bounding box ratio is strictly between 0.5 and 2.0
pub struct AspectRatioFilterStep;

impl PipelineStep for AspectRatioFilterStep {
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            // Full-image items never went through contour detection
            let Some(bbox) = item.bbox else {
                continue;
            };

            let aspect_ratio = checked_aspect_ratio(&bbox)?;
            if is_icon_ratio(aspect_ratio) {
                result.push(item.with_metadata("aspect_ratio", MetadataValue::Float(aspect_ratio)));
            } else if context.verbose {
                debug!("  rejected ({}, {}): aspect ratio {:.2}", bbox.x, bbox.y, aspect_ratio);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Aspect Ratio Filtering"
    }
}
