// SPDX-License-Identifier: MPL-2.0
//! Core media types for the domain layer.
//!
//! These types represent pure data without any presentation dependencies.

use std::sync::Arc;

/// Raw image data without presentation dependencies.
///
/// This is the domain representation of a decoded picture, containing only
/// the pure pixel data. Consumers convert this to whatever handle their
/// presentation surface needs.
///
/// Pixel storage is shared through an `Arc`, so cloning a `RawImage` (for
/// example when it is handed from the run loop to the consumer) never
/// copies the pixels.
///
/// # Example
///
/// ```
/// use ethowild::domain::media::RawImage;
/// use std::sync::Arc;
///
/// let pixels = vec![255u8; 100 * 100 * 4]; // 100x100 RGBA
/// let image = RawImage::new(100, 100, Arc::new(pixels));
///
/// assert_eq!(image.width(), 100);
/// assert_eq!(image.height(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    rgba_bytes: Arc<Vec<u8>>,
}

impl RawImage {
    /// Creates a new `RawImage` from dimensions and RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba_bytes: Arc<Vec<u8>>) -> Self {
        let expected_len = (width as usize) * (height as usize) * 4;
        assert_eq!(
            rgba_bytes.len(),
            expected_len,
            "RGBA data length mismatch: expected {expected_len}, got {}",
            rgba_bytes.len()
        );

        Self {
            width,
            height,
            rgba_bytes,
        }
    }

    /// Creates a new `RawImage` from dimensions and owned RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Self {
        Self::new(width, height, Arc::new(rgba_bytes))
    }

    /// Returns the image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Returns the shared reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.rgba_bytes)
    }

    /// Returns the total number of pixels.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl PartialEq for RawImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.rgba_bytes == other.rgba_bytes
    }
}

impl Eq for RawImage {}

/// One decoded picture plus its presentation timestamp.
///
/// Frames are produced once per decode step, moved into the frame buffer
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pts_secs: f64,
    image: RawImage,
}

impl Frame {
    /// Creates a frame presented at `pts_secs` seconds.
    #[must_use]
    pub fn new(pts_secs: f64, image: RawImage) -> Self {
        Self { pts_secs, image }
    }

    /// Presentation timestamp in seconds.
    #[must_use]
    pub fn pts_secs(&self) -> f64 {
        self.pts_secs
    }

    /// The decoded picture.
    #[must_use]
    pub fn image(&self) -> &RawImage {
        &self.image
    }

    /// Splits the frame into its timestamp and picture.
    #[must_use]
    pub fn into_parts(self) -> (f64, RawImage) {
        (self.pts_secs, self.image)
    }
}

/// Video metadata without presentation dependencies.
///
/// Fetched once when the source is opened and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Frames per second.
    pub fps: f64,
}

impl VideoMetadata {
    /// Creates a new `VideoMetadata`.
    #[must_use]
    pub fn new(width: u32, height: u32, duration_secs: f64, fps: f64) -> Self {
        Self {
            width,
            height,
            duration_secs,
            fps,
        }
    }

    /// Returns a copy whose frame rate is guaranteed positive.
    ///
    /// Sources that report a zero, negative or non-finite rate get
    /// `fallback_fps` instead.
    #[must_use]
    pub fn with_fps_fallback(mut self, fallback_fps: f64) -> Self {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            self.fps = fallback_fps;
        }
        self
    }

    /// Returns the total number of frames (approximate).
    ///
    /// Returns 0 for negative durations or frame rates.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_count(&self) -> u64 {
        let frames = self.duration_secs * self.fps;
        if frames < 0.0 || !frames.is_finite() {
            0
        } else {
            frames.round() as u64
        }
    }

    /// Returns the aspect ratio (width / height).
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_image_creation() {
        let pixels = vec![0u8; 10 * 10 * 4];
        let image = RawImage::from_rgba(10, 10, pixels);

        assert_eq!(image.width(), 10);
        assert_eq!(image.height(), 10);
        assert_eq!(image.pixel_count(), 100);
        assert_eq!(image.rgba_bytes().len(), 400);
    }

    #[test]
    #[should_panic(expected = "RGBA data length mismatch")]
    fn test_raw_image_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let _ = RawImage::from_rgba(10, 10, pixels);
    }

    #[test]
    fn test_raw_image_clone_shares_pixels() {
        let image = RawImage::from_rgba(2, 2, vec![7u8; 16]);
        let copy = image.clone();
        assert!(Arc::ptr_eq(&image.rgba_bytes_arc(), &copy.rgba_bytes_arc()));
    }

    #[test]
    fn test_frame_accessors() {
        let frame = Frame::new(1.5, RawImage::from_rgba(1, 1, vec![0u8; 4]));
        assert!((frame.pts_secs() - 1.5).abs() < f64::EPSILON);
        assert_eq!(frame.image().width(), 1);

        let (pts, image) = frame.into_parts();
        assert!((pts - 1.5).abs() < f64::EPSILON);
        assert_eq!(image.height(), 1);
    }

    #[test]
    fn test_fps_fallback_replaces_non_positive_rates() {
        let zero = VideoMetadata::new(640, 480, 10.0, 0.0).with_fps_fallback(30.0);
        assert!((zero.fps - 30.0).abs() < f64::EPSILON);

        let negative = VideoMetadata::new(640, 480, 10.0, -5.0).with_fps_fallback(30.0);
        assert!((negative.fps - 30.0).abs() < f64::EPSILON);

        let nan = VideoMetadata::new(640, 480, 10.0, f64::NAN).with_fps_fallback(30.0);
        assert!((nan.fps - 30.0).abs() < f64::EPSILON);

        let valid = VideoMetadata::new(640, 480, 10.0, 25.0).with_fps_fallback(30.0);
        assert!((valid.fps - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_video_metadata_frame_count() {
        let metadata = VideoMetadata::new(1920, 1080, 10.0, 30.0);
        assert_eq!(metadata.frame_count(), 300);

        let metadata2 = VideoMetadata::new(1920, 1080, 10.5, 24.0);
        assert_eq!(metadata2.frame_count(), 252);
    }

    #[test]
    fn test_video_metadata_aspect_ratio() {
        let metadata_16_9 = VideoMetadata::new(1920, 1080, 10.0, 30.0);
        let expected = 1920.0 / 1080.0;
        assert!((metadata_16_9.aspect_ratio() - expected).abs() < 0.001);

        let degenerate = VideoMetadata::new(1920, 0, 10.0, 30.0);
        assert!((degenerate.aspect_ratio() - 1.0).abs() < f64::EPSILON);
    }
}
