use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to load image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to write icon {}: {source}", .path.display())]
    WriteIcon {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Degenerate bounding box at ({x}, {y}): height is zero")]
    DegenerateBounds { x: u32, y: u32 },

    #[error("Debug directory is not empty: {}", .0.display())]
    DebugDirNotEmpty(PathBuf),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
