//! Resolution of the image to recognize: an explicit file or the clipboard.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Source of clipboard images.
pub trait ImageGrabber {
    /// Writes the clipboard image to `dest` as PNG.
    ///
    /// Returns `false` when the clipboard holds no image.
    fn grab_png(&self, dest: &Path) -> Result<bool>;
}

/// Clipboard access through `arboard`.
pub struct SystemImageGrabber;

impl ImageGrabber for SystemImageGrabber {
    fn grab_png(&self, dest: &Path) -> Result<bool> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| anyhow::anyhow!("Clipboard unavailable: {}", e))?;
        let img = match clipboard.get_image() {
            Ok(img) => img,
            Err(arboard::Error::ContentNotAvailable) => return Ok(false),
            Err(e) => anyhow::bail!("Failed to read image from clipboard: {}", e),
        };

        save_rgba_png(img.width, img.height, img.bytes.into_owned(), dest)?;
        Ok(true)
    }
}

/// Encodes a raw RGBA buffer as PNG at `dest`.
fn save_rgba_png(width: usize, height: usize, bytes: Vec<u8>, dest: &Path) -> Result<()> {
    let w = u32::try_from(width).with_context(|| format!("Clipboard image too wide: {}", width))?;
    let h = u32::try_from(height).with_context(|| format!("Clipboard image too tall: {}", height))?;
    tracing::debug!("Clipboard image {}x{}", w, h);
    let Some(rgba) = image::RgbaImage::from_raw(w, h, bytes) else {
        anyhow::bail!("Clipboard returned an invalid RGBA buffer");
    };

    rgba.save_with_format(dest, image::ImageFormat::Png)
        .with_context(|| format!("Failed to save clipboard image: {}", dest.display()))
}

/// Returns the image to send, or `None` when there is nothing to recognize.
///
/// An explicit path is returned as given; the caller checks that it exists.
/// Clipboard failures are logged and treated as "no image".
pub fn resolve_image(
    explicit: Option<&Path>,
    grabber: &dyn ImageGrabber,
    temp_image: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    match grabber.grab_png(temp_image) {
        Ok(true) => Some(temp_image.to_path_buf()),
        Ok(false) => {
            tracing::debug!("No image on the clipboard");
            None
        }
        Err(e) => {
            tracing::warn!("Could not grab clipboard image: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/image_source_tests.rs"]
mod tests;
