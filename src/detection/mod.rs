pub mod contours;
pub mod filter;
pub mod preprocessing;
pub mod steps;

use image::{DynamicImage, ImageError, ImageReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::error::{ExtractError, Result};
use crate::export;
use crate::models::IconRecord;
use crate::pipeline::{Pipeline, PipelineData};

/// Where icons and the manifest are written
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub manifest_name: String,
}

impl OutputConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(&self.manifest_name)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            manifest_name: "icons.json".to_string(),
        }
    }
}

/// Decode an image, guessing the format from its content, as 8-bit RGB
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let load_err = |source: ImageError| ExtractError::Load {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| load_err(ImageError::IoError(e)))?
        .decode()
        .map_err(load_err)?;

    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Build the icon extraction pipeline: grayscale, inverted Otsu threshold,
/// external contours, aspect ratio filter
pub fn build_standard_pipeline(verbose: bool) -> Pipeline {
    use crate::detection::steps::*;

    Pipeline::new()
        .with_verbose(verbose)
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(ThresholdStep))
        .add_step(Arc::new(ContourDetectionStep))
        .add_step(Arc::new(AspectRatioFilterStep))
}

/// Main icon extraction orchestrator
pub struct IconExtractor {
    pub output: OutputConfig,
    pub verbose: bool,
    pub debug_dir: Option<PathBuf>,
}

impl IconExtractor {
    pub fn new(output: OutputConfig) -> Self {
        Self {
            output,
            verbose: false,
            debug_dir: None,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Dump every step's images under `dir` (must be empty or absent)
    pub fn with_debug(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    fn pipeline(&self) -> Result<Pipeline> {
        let pipeline = build_standard_pipeline(self.verbose);
        match &self.debug_dir {
            Some(dir) => pipeline.with_debug(dir),
            None => Ok(pipeline),
        }
    }

    /// Run the pipeline on an image and return the accepted regions, cropped
    pub fn extract(&self, img: DynamicImage) -> Result<Vec<PipelineData>> {
        self.pipeline()?.run(img)
    }

    /// Load, extract, write `icon_<k>.png` files and the JSON manifest
    pub fn run(&self, input: impl AsRef<Path>) -> Result<Vec<IconRecord>> {
        let input = input.as_ref();
        let img = load_image(input)?;
        info!("loaded {}: {}x{}", input.display(), img.width(), img.height());

        let regions = self.extract(img)?;
        let records = export::write_icons(&regions, &self.output.dir)?;
        export::write_manifest(&records, self.output.manifest_path())?;

        Ok(records)
    }
}

impl Default for IconExtractor {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
