// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. These adapters wrap external dependencies.
//!
//! # Available Adapters
//!
//! - [`ffmpeg`]: Video decoding via `FFmpeg` (implements [`FrameSource`])
//!
//! [`FrameSource`]: crate::application::port::FrameSource

pub mod ffmpeg;

// Re-export main types for convenience
pub use ffmpeg::FfmpegFrameSource;
