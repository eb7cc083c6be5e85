//! PNG export of finished composites.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use photobooth_common::error::{BoothError, BoothResult};

use crate::compositor::CompositeResult;

/// Suggested file name for an exported composite.
pub const DEFAULT_EXPORT_FILENAME: &str = "photobooth.png";

/// Encode a composite as PNG.
pub fn encode_png(result: &CompositeResult) -> BoothResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    result
        .image()
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| BoothError::export(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Write a composite as PNG and return the path written.
///
/// If `path` is an existing directory the file is named
/// [`DEFAULT_EXPORT_FILENAME`] inside it. Missing parent directories are
/// created.
pub fn write_png(result: &CompositeResult, path: &Path) -> BoothResult<PathBuf> {
    let target = if path.is_dir() {
        path.join(DEFAULT_EXPORT_FILENAME)
    } else {
        path.to_path_buf()
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let bytes = encode_png(result)?;
    std::fs::write(&target, &bytes)?;

    let (width, height) = result.pixel_size();
    tracing::info!(
        output = %target.display(),
        width,
        height,
        bytes = bytes.len(),
        "Composite exported"
    );
    Ok(target)
}
