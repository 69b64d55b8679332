// SPDX-License-Identifier: MPL-2.0
//! Video playback engine.
//!
//! A [`PlaybackController`] owns a [`FrameSource`](crate::application::port::FrameSource)
//! on a dedicated thread, keeps a small [`FrameBuffer`] of decoded frames
//! ahead of emission, and paces [`PlaybackEvent`]s to the consumer at the
//! source frame rate scaled by the playback speed.

pub mod control;
pub mod controller;
pub mod events;
pub mod frame_buffer;
pub mod pacing;
pub mod time_units;

pub use control::ControlState;
pub use controller::PlaybackController;
pub use events::{PlaybackEvent, PlaybackEvents, TryRecvError};
pub use frame_buffer::FrameBuffer;
pub use pacing::pace_interval;
