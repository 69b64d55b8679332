// SPDX-License-Identifier: MPL-2.0
//! Video playback state machine.
//!
//! ```text
//! Opening --open ok--> Playing <--> Paused
//! Opening --open err-> Error
//! Playing/Paused --seek--> Seeking --applied--> Playing/Paused
//! any --stop--> Stopped
//! ```

/// Represents the current playback state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Metadata is being fetched from the source.
    #[default]
    Opening,
    /// Frames are being emitted.
    Playing,
    /// Emission is suspended; decoding may still fill the buffer.
    Paused,
    /// The buffer is being flushed and the source repositioned.
    Seeking,
    /// The run loop has exited after a stop request.
    Stopped,
    /// The source could not be opened.
    Error,
}

impl PlaybackState {
    /// Returns true if frames are currently being emitted.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if playback is paused.
    #[must_use]
    pub fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns true if a seek is being applied.
    #[must_use]
    pub fn is_seeking(self) -> bool {
        matches!(self, Self::Seeking)
    }

    /// Returns true once no further transition can happen.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Error)
    }

    /// Encodes the state for storage in an atomic.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Opening => 0,
            Self::Playing => 1,
            Self::Paused => 2,
            Self::Seeking => 3,
            Self::Stopped => 4,
            Self::Error => 5,
        }
    }

    /// Decodes a value produced by [`PlaybackState::to_u8`].
    ///
    /// Unknown values map to `Error`.
    #[must_use]
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Opening,
            1 => Self::Playing,
            2 => Self::Paused,
            3 => Self::Seeking,
            4 => Self::Stopped,
            _ => Self::Error,
        }
    }
}
