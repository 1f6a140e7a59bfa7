use image::DynamicImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ExtractError, Result};
use crate::models::{BoundingBox, Contour};

/// Data that flows through the pipeline
/// Each PipelineData represents a single image region with associated metadata
#[derive(Clone)]
pub struct PipelineData {
    /// The image data (grayscale, binary mask or color crop depending on the step)
    pub image: DynamicImage,

    /// Reference to the original image (shared efficiently via Arc)
    pub original: Arc<DynamicImage>,

    /// Bounding box in the original image (None means full image)
    pub bbox: Option<BoundingBox>,

    /// Contour this region was cut from
    pub contour: Option<Contour>,

    /// Metadata for tracking properties (e.g., "aspect_ratio", "threshold_level")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Float(f64),
    Int(i64),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            bbox: None,
            contour: None,
            metadata: HashMap::new(),
        }
    }

    /// Create PipelineData for a region of an image
    pub fn from_region(
        image: DynamicImage,
        original: Arc<DynamicImage>,
        bbox: BoundingBox,
        contour: Contour,
    ) -> Self {
        Self {
            image,
            original,
            bbox: Some(bbox),
            contour: Some(contour),
            metadata: HashMap::new(),
        }
    }

    /// Same region with a different image, metadata carried over
    pub fn with_image(&self, image: DynamicImage) -> Self {
        Self {
            image,
            original: self.original.clone(),
            bbox: self.bbox,
            contour: self.contour.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    fn save_images(&self, dir_name: &str, data: &[PipelineData]) -> Result<()> {
        let step_dir = self.output_dir.join(dir_name);
        std::fs::create_dir_all(&step_dir)?;

        for (idx, item) in data.iter().enumerate() {
            let output_path = step_dir.join(format!("{:02}.png", idx + 1));
            item.image.save(&output_path)?;
        }

        debug!("debug: saved {} images to {}/", data.len(), dir_name);
        Ok(())
    }
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    /// Log per-region decisions, not just step summaries
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in logs and debug directory names)
    fn name(&self) -> &str;
}

fn step_dir_name(step_idx: usize, step_name: &str) -> String {
    format!("{:02}_{}", step_idx + 1, step_name.to_lowercase().replace(' ', "_"))
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.next().is_some() {
                return Err(ExtractError::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience)
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    /// Run every step sequentially on an input image
    pub fn run(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<Vec<PipelineData>> {
        let mut data = vec![PipelineData::from_image(input)];

        if let Some(debug_config) = &self.context.debug {
            debug_config.save_images("00_input", &data)?;
        }

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            debug!("running step: {} (processing {} items)", step.name(), data.len());

            data = step.process(data, &self.context)?;

            if let Some(debug_config) = &self.context.debug {
                debug_config.save_images(&step_dir_name(step_idx, step.name()), &data)?;
            }

            debug!("  → {} items", data.len());
        }

        info!("pipeline finished with {} regions", data.len());
        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Duplicates every item, to exercise 1 → many steps
    struct SplitStep;

    impl PipelineStep for SplitStep {
        fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
            Ok(data
                .into_iter()
                .flat_map(|item| [item.clone(), item.with_metadata("copy", MetadataValue::Int(1))])
                .collect())
        }

        fn name(&self) -> &str {
            "Split Step"
        }
    }

    fn input() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([7u8])))
    }

    #[test]
    fn test_run_applies_steps_in_order() -> anyhow::Result<()> {
        let pipeline = Pipeline::new()
            .add_step_boxed(Box::new(SplitStep))
            .add_step(Arc::new(SplitStep));

        let result = pipeline.run(input())?;
        assert_eq!(result.len(), 4);
        assert_eq!(result.iter().filter(|d| d.get_int("copy") == Some(1)).count(), 3);
        Ok(())
    }

    #[test]
    fn test_run_partial_stops_early() -> anyhow::Result<()> {
        let pipeline = Pipeline::new()
            .add_step_boxed(Box::new(SplitStep))
            .add_step_boxed(Box::new(SplitStep));

        assert_eq!(pipeline.run_partial(input(), 1)?.len(), 2);
        assert_eq!(pipeline.run_partial(input(), 0)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_debug_mode_writes_step_directories() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let debug_dir = dir.path().join("debug");

        let pipeline = Pipeline::new()
            .with_debug(&debug_dir)?
            .add_step_boxed(Box::new(SplitStep));
        pipeline.run(input())?;

        assert!(debug_dir.join("00_input/01.png").exists());
        assert!(debug_dir.join("01_split_step/01.png").exists());
        assert!(debug_dir.join("01_split_step/02.png").exists());
        Ok(())
    }

    #[test]
    fn test_debug_dir_must_be_empty() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        std::fs::write(dir.path().join("leftover.txt"), "x")?;

        let result = Pipeline::new().with_debug(dir.path());
        assert!(matches!(result, Err(ExtractError::DebugDirNotEmpty(_))));
        Ok(())
    }

    #[test]
    fn test_metadata_accessors() {
        let data = PipelineData::from_image(input())
            .with_metadata("ratio", MetadataValue::Float(1.5))
            .with_metadata("count", MetadataValue::Int(4));

        assert_eq!(data.get_float("ratio"), Some(1.5));
        assert_eq!(data.get_int("count"), Some(4));
        assert_eq!(data.get_float("count"), None);
        assert!(data.bbox.is_none());
    }
}
