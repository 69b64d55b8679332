// SPDX-License-Identifier: MPL-2.0
//! `ethowild` is the video playback engine behind the EthoWild annotation
//! tool.
//!
//! It decodes a video file on a dedicated thread, keeps a small buffer of
//! frames ahead of display, and paces frames to a consumer through an event
//! channel. The consumer steers playback with play, pause, seek, speed and
//! stop commands.
//!
//! # Example
//!
//! ```no_run
//! use ethowild::config::EngineConfig;
//! use ethowild::infrastructure::FfmpegFrameSource;
//! use ethowild::video_player::{PlaybackController, PlaybackEvent};
//!
//! let (controller, mut events) = PlaybackController::start(
//!     "burrow.mp4",
//!     FfmpegFrameSource::new(),
//!     EngineConfig::default(),
//! )?;
//! controller.seek(50.0)?;
//! while let Some(event) = events.blocking_recv() {
//!     if let PlaybackEvent::PositionChanged(pts) = event {
//!         if pts > 55.0 {
//!             controller.stop();
//!         }
//!     }
//! }
//! # Ok::<(), ethowild::error::Error>(())
//! ```

#![doc(html_root_url = "https://docs.rs/ethowild/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod media;
pub mod video_player;

#[cfg(test)]
pub(crate) mod test_utils;
