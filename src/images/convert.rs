use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// File name (without extension) used for an entity's mirrored image
pub fn file_stem(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Decode `bytes`, flatten to RGB and write a WebP file at `dest`.
///
/// `dest` is only created once encoding has succeeded.
pub fn convert_to_webp(bytes: &[u8], dest: &Path) -> Result<()> {
    let decoded = image::load_from_memory(bytes).context("Failed to decode image")?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut encoded = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut encoded), ImageFormat::WebP)
        .context("Failed to encode WebP")?;

    fs::write(dest, encoded).with_context(|| format!("Failed to write {:?}", dest))?;
    Ok(())
}
