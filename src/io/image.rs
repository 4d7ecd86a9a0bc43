//! PNG loading of source images and export of engraving layers

use crate::engrave::{EngravedResult, MaskedLayer};
use crate::io::error::{EngravingError, Result};
use crate::raster::SourceImage;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Load an image and flatten it into a source image
///
/// Transparent pixels are flattened onto the default background colour.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or decoded
/// - The image has no pixels or exceeds the canvas limit
pub fn load_source_image(path: &Path) -> Result<SourceImage> {
    let pixels = image::open(path)
        .map_err(|e| EngravingError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .to_rgba8();
    SourceImage::new(pixels)
}

/// Save an RGBA buffer as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn save_png(pixels: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EngravingError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    pixels
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| EngravingError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write the flattened result and, if present, the engraving-only layer
///
/// # Errors
///
/// Returns an error if either file cannot be written
pub fn export_result(
    result: &EngravedResult,
    flattened_path: &Path,
    engraving_path: &Path,
) -> Result<()> {
    save_png(&result.flatten(), flattened_path)?;
    if let Some(engraving) = result.engraving() {
        save_png(&engraving.pixels, engraving_path)?;
    }
    Ok(())
}

/// Write each masked band layer to the path produced by `path_for(index)`
///
/// Returns the written paths in band order.
///
/// # Errors
///
/// Returns an error if any band cannot be written
pub fn export_bands(
    layers: &[MaskedLayer],
    path_for: impl Fn(usize) -> PathBuf,
) -> Result<Vec<PathBuf>> {
    layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            let path = path_for(index);
            save_png(layer.pixels(), &path)?;
            Ok(path)
        })
        .collect()
}
