use icon_extract::{IconExtractor, IconRecord, OutputConfig};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Background of the synthetic screenshots
pub const LIGHT: Rgb<u8> = Rgb([235, 235, 235]);
pub const DARK: Rgb<u8> = Rgb([25, 40, 60]);

/// A light screenshot of the given size
pub fn blank_screenshot(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, LIGHT)
}

/// Paint a filled rectangle
pub fn draw_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..y + h {
        for px in x..x + w {
            img.put_pixel(px, py, color);
        }
    }
}

/// Save `img` as a PNG named like the real input inside `dir`
pub fn save_input(img: &RgbImage, dir: &Path) -> PathBuf {
    let path = dir.join("Equity Portfolio.png");
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test screenshot");
    path
}

/// Creates a temp working directory holding `img` as the input.
/// Returns the directory (keep it alive) and the input path.
pub fn workspace_with(img: &RgbImage) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = save_input(img, dir.path());
    (dir, input)
}

/// Extractor writing into `dir` with the default manifest name
pub fn extractor_for(dir: &Path) -> IconExtractor {
    IconExtractor::new(OutputConfig::new(dir))
}

/// Parse the manifest written into `dir`
pub fn read_manifest(dir: &Path) -> anyhow::Result<Vec<IconRecord>> {
    let text = std::fs::read_to_string(dir.join("icons.json"))?;
    Ok(serde_json::from_str(&text)?)
}

/// Names of the icon_*.png files present in `dir`, sorted
pub fn icon_files(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.starts_with("icon_") && name.ends_with(".png") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
