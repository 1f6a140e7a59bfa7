pub mod detection;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;

pub use detection::{IconExtractor, OutputConfig, build_standard_pipeline, load_image};
pub use error::{ExtractError, Result};
pub use export::{write_icons, write_manifest};
pub use models::{BoundingBox, Contour, IconRecord};
pub use pipeline::{MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep};
