// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the playback engine remains
//! independent of concrete decoding libraries.
//!
//! # Available Ports
//!
//! - [`video`]: Sequential video decoding ([`FrameSource`])
//!
//! # Design Notes
//!
//! - All traits use domain types only (no `FFmpeg` types)
//! - Traits are `Send` so implementations can live on the run-loop thread
//! - Methods return `Result` with domain error types

pub mod video;

// Re-export main types for convenience
pub use video::FrameSource;
