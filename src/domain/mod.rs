// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core playback types with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`error`]: Domain error types ([`VideoError`](error::VideoError))
//! - [`media`]: Media types ([`RawImage`](media::RawImage), [`Frame`](media::Frame),
//!   [`VideoMetadata`](media::VideoMetadata))
//! - [`video`]: Playback types ([`PlaybackState`](video::PlaybackState),
//!   [`PlaybackSpeed`](video::PlaybackSpeed), [`BufferCapacity`](video::BufferCapacity))

pub mod error;
pub mod media;
pub mod video;
