use image::ImageFormat;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::{ExtractError, Result};
use crate::models::{BoundingBox, IconRecord};
use crate::pipeline::PipelineData;

pub fn icon_file_name(k: usize) -> String {
    format!("icon_{}.png", k)
}

/// Write each region's image as `icon_<k>.png` (k from 1) into `dir`.
///
/// Existing files are overwritten. Files written before a failure are left
/// in place.
pub fn write_icons(regions: &[PipelineData], dir: impl AsRef<Path>) -> Result<Vec<IconRecord>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut records = Vec::with_capacity(regions.len());
    for (idx, region) in regions.iter().enumerate() {
        let name = icon_file_name(idx + 1);
        let path = dir.join(&name);

        region
            .image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| ExtractError::WriteIcon {
                path: path.clone(),
                source,
            })?;

        let bbox = region.bbox.unwrap_or(BoundingBox {
            x: 0,
            y: 0,
            width: region.image.width(),
            height: region.image.height(),
        });
        records.push(IconRecord::new(name, &bbox));
    }

    info!("wrote {} icons to {}", records.len(), dir.display());
    Ok(records)
}

/// Serialize records as a JSON array with 4-space indentation
pub fn manifest_json(records: &[IconRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut ser)?;
    Ok(buf)
}

/// Write the manifest, replacing any existing file
pub fn write_manifest(records: &[IconRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = manifest_json(records)?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&json)?;
    writer.flush()?;

    info!("wrote manifest {}", path.display());
    Ok(())
}
