// SPDX-License-Identifier: MPL-2.0
//! Frame source port definition.
//!
//! This module defines the [`FrameSource`] trait the playback engine reads
//! from. Infrastructure adapters (like `FFmpeg`) implement this trait.
//!
//! # Design Notes
//!
//! - The source is **stateful** - it owns the decode cursor
//! - Methods are blocking; the engine calls them from its own run-loop thread
//! - Uses domain types only (`Frame`, `VideoMetadata`, `VideoError`)

use crate::domain::error::VideoError;
use crate::domain::media::{Frame, VideoMetadata};
use std::path::Path;
use std::time::Duration;

// =============================================================================
// FrameSource Trait
// =============================================================================

/// Port for sequential video decoding.
///
/// # Thread Safety
///
/// Implementations must be `Send` so the engine can move them onto its run
/// loop thread. They are **not** required to be `Sync`: exactly one thread
/// ever touches a source.
///
/// # Lifecycle
///
/// 1. Call `open()` once to open a video file and fetch its metadata
/// 2. Call `read_next()` repeatedly to get frames in presentation order
/// 3. Use `seek()` to reposition the decode cursor
/// 4. Call `release()` to free the decode resources (safe to repeat)
///
/// # Example
///
/// ```ignore
/// use ethowild::application::port::FrameSource;
/// use std::path::Path;
///
/// fn first_second(source: &mut impl FrameSource, path: &Path) {
///     let meta = source.open(path).expect("Failed to open");
///     println!("Video: {}x{}, {:.1}s", meta.width, meta.height, meta.duration_secs);
///
///     while let Ok(Some(frame)) = source.read_next() {
///         if frame.pts_secs() >= 1.0 {
///             break;
///         }
///     }
///     source.release();
/// }
/// ```
pub trait FrameSource: Send {
    /// Opens a video container and returns its metadata.
    ///
    /// The decode cursor is placed at the start of the stream.
    ///
    /// # Errors
    ///
    /// Returns a [`VideoError`] if the file is missing, the container is
    /// corrupt, or the codec is unsupported.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, VideoError>;

    /// Decodes the next frame.
    ///
    /// Returns `Ok(Some(frame))` for each decoded frame and `Ok(None)` at
    /// end of stream. Callers treat an `Err` exactly like end of stream.
    ///
    /// # Errors
    ///
    /// Returns a [`VideoError`] if decoding fails.
    fn read_next(&mut self) -> Result<Option<Frame>, VideoError>;

    /// Repositions the decode cursor to the nearest decodable point at or
    /// before `target`. Frame accuracy is container-dependent.
    ///
    /// # Errors
    ///
    /// Returns a [`VideoError`] if the source is not open or the container
    /// refuses the seek.
    fn seek(&mut self, target: Duration) -> Result<(), VideoError>;

    /// Frees the decode resources. Idempotent.
    fn release(&mut self);
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, VideoError> {
        (**self).open(path)
    }

    fn read_next(&mut self) -> Result<Option<Frame>, VideoError> {
        (**self).read_next()
    }

    fn seek(&mut self, target: Duration) -> Result<(), VideoError> {
        (**self).seek(target)
    }

    fn release(&mut self) {
        (**self).release();
    }
}
