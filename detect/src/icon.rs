//! Icon detection and PNG to ICO conversion.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, warn};

use crate::error::{DetectError, Result};

/// Edge length of converted icons unless told otherwise.
pub const DEFAULT_ICON_SIZE: u32 = 64;

/// Largest edge length an ICO entry can store.
pub const MAX_ICON_SIZE: u32 = 256;

/// Picks the icon for `folder`.
///
/// Tries `favicon.ico`, then the only `.ico` file, then the only `.png`
/// file converted to `.ico` at `size`, then `fallback`. A failed conversion
/// is logged and skipped.
///
/// # Errors
///
/// Returns [`DetectError::Io`] if the folder cannot be listed.
pub fn detect_icon(folder: &Path, fallback: &Path, size: u32) -> Result<PathBuf> {
    let favicon = folder.join("favicon.ico");
    if favicon.is_file() {
        return Ok(std::path::absolute(favicon)?);
    }

    if let [only] = crate::files_with_extension(folder, "ico")?.as_slice() {
        return Ok(std::path::absolute(only)?);
    }

    if let [png] = crate::files_with_extension(folder, "png")?.as_slice() {
        match png_to_ico(png, None, size) {
            Ok(ico) => return Ok(std::path::absolute(ico)?),
            Err(err) => warn!(png = %png.display(), error = %err, "Failed to convert icon"),
        }
    }

    debug!(folder = %folder.display(), fallback = %fallback.display(), "Using fallback icon");
    Ok(std::path::absolute(fallback)?)
}

/// Writes a `size`x`size` ICO version of `png`.
///
/// The icon goes to `ico_path`, or next to the PNG with an `.ico` extension.
/// Returns the path written.
///
/// # Errors
///
/// [`DetectError::InvalidIconSize`] for sizes outside `1..=256`,
/// [`DetectError::Image`] when the PNG cannot be read or the icon cannot be
/// written.
pub fn png_to_ico(png: &Path, ico_path: Option<&Path>, size: u32) -> Result<PathBuf> {
    if !(1..=MAX_ICON_SIZE).contains(&size) {
        return Err(DetectError::InvalidIconSize(size));
    }
    let target = ico_path.map_or_else(|| png.with_extension("ico"), Path::to_path_buf);

    let img = image::open(png)?;
    let resized = img.resize_exact(size, size, FilterType::Lanczos3);
    DynamicImage::ImageRgba8(resized.to_rgba8()).save_with_format(&target, ImageFormat::Ico)?;

    info!(size, path = %target.display(), "Wrote icon");
    Ok(target)
}
