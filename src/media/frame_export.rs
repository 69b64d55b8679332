// SPDX-License-Identifier: MPL-2.0
//! Saving emitted frames as image files.
//!
//! Consumers receive frames as [`RawImage`] RGBA buffers; this module encodes
//! them to PNG, JPEG or WebP using the `image` crate.

use crate::domain::media::RawImage;
use crate::error::{Error, Result};
use image_rs::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use std::path::Path;

/// Supported export formats for frame capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// PNG format (lossless, best quality).
    #[default]
    Png,
    /// JPEG format (lossy, no alpha).
    Jpeg,
    /// WebP format (lossless encoder).
    WebP,
}

impl ExportFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::WebP => "webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::WebP => ImageFormat::WebP,
        }
    }

    /// Returns all supported formats.
    #[must_use]
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::WebP]
    }

    /// Detects format from a file extension, case-insensitively.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<ExportFormat> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "webp" => Some(ExportFormat::WebP),
            _ => None,
        }
    }

    /// Detects format from a file path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<ExportFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Writes `image` to `path`.
///
/// Without an explicit `format`, the path's extension decides, falling back
/// to PNG. JPEG output drops the alpha channel.
///
/// # Errors
///
/// Returns [`Error::Export`] if the image cannot be encoded or written.
pub fn export_frame<P: AsRef<Path>>(
    image: &RawImage,
    path: P,
    format: Option<ExportFormat>,
) -> Result<()> {
    let path = path.as_ref();
    let format = format
        .or_else(|| ExportFormat::from_path(path))
        .unwrap_or_default();

    let buffer: ImageBuffer<Rgba<u8>, _> =
        ImageBuffer::from_raw(image.width(), image.height(), image.rgba_bytes().to_vec())
            .ok_or_else(|| Error::Export("frame data does not match its dimensions".into()))?;

    if format == ExportFormat::Jpeg {
        DynamicImage::ImageRgba8(buffer)
            .to_rgb8()
            .save_with_format(path, format.image_format())?;
    } else {
        buffer.save_with_format(path, format.image_format())?;
    }

    log::debug!(
        "Exported {}x{} frame to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

/// Generates a default filename for frame export.
///
/// Format: `{video_name}_frame_{MM-SS-mmm}.{ext}`
#[must_use]
pub fn generate_default_filename(
    video_path: &Path,
    position_secs: f64,
    format: ExportFormat,
) -> String {
    let video_name = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_ms = (position_secs.max(0.0) * 1000.0).round() as u64;
    let minutes = total_ms / 60000;
    let seconds = (total_ms % 60000) / 1000;
    let millis = total_ms % 1000;

    format!(
        "{}_frame_{:02}-{:02}-{:03}.{}",
        video_name,
        minutes,
        seconds,
        millis,
        format.extension()
    )
}
