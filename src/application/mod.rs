// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports the playback engine depends on.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The playback engine only ever sees the port traits
//!
//! # Example
//!
//! ```ignore
//! use ethowild::application::port::FrameSource;
//!
//! // Infrastructure implements the port trait
//! struct FfmpegFrameSource { /* ... */ }
//! impl FrameSource for FfmpegFrameSource { /* ... */ }
//! ```

pub mod port;
