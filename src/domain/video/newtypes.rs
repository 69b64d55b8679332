// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for playback values,
//! ensuring they are always within valid ranges.

// =============================================================================
// PlaybackSpeed
// =============================================================================

/// Playback speed bounds (0.1x to 8.0x).
pub mod speed_bounds {
    /// Minimum playback speed (0.1x = ten times slower).
    pub const MIN: f64 = 0.1;
    /// Maximum playback speed (8x = eight times faster).
    pub const MAX: f64 = 8.0;
    /// Default playback speed (1.0 = normal speed).
    pub const DEFAULT: f64 = 1.0;
    /// Speed presets offered to the annotator.
    pub const PRESETS: &[f64] = &[0.5, 0.75, 1.0, 1.25, 1.5, 2.0];
}

/// Playback speed factor, guaranteed to be within valid range (0.1x - 8.0x).
///
/// The factor only scales the delay between emitted frames; it never
/// changes how fast the source is decoded.
///
/// # Example
///
/// ```
/// use ethowild::domain::video::PlaybackSpeed;
///
/// let speed = PlaybackSpeed::new(2.0);
/// assert_eq!(speed.value(), 2.0);
///
/// // Values outside range are clamped
/// let too_fast = PlaybackSpeed::new(100.0);
/// assert_eq!(too_fast.value(), 8.0);
///
/// // Zero, negative and non-finite factors are rejected outright
/// assert!(PlaybackSpeed::try_new(0.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSpeed(f64);

impl PlaybackSpeed {
    /// Creates a new playback speed, clamping to valid range.
    ///
    /// Non-finite input falls back to the default speed.
    #[must_use]
    pub fn new(speed: f64) -> Self {
        if speed.is_nan() {
            return Self::default();
        }
        Self(speed.clamp(speed_bounds::MIN, speed_bounds::MAX))
    }

    /// Creates a playback speed from a factor that must be strictly
    /// positive and finite; valid factors are clamped to range.
    #[must_use]
    pub fn try_new(speed: f64) -> Option<Self> {
        (speed.is_finite() && speed > 0.0).then(|| Self::new(speed))
    }

    /// Returns the speed value as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the next higher preset speed, or self if above all presets.
    #[must_use]
    pub fn increase(self) -> Self {
        let next = speed_bounds::PRESETS
            .iter()
            .find(|&&s| s > self.0 + 0.001)
            .copied()
            .unwrap_or(self.0);
        Self(next)
    }

    /// Returns the next lower preset speed, or self if below all presets.
    #[must_use]
    pub fn decrease(self) -> Self {
        let prev = speed_bounds::PRESETS
            .iter()
            .rev()
            .find(|&&s| s < self.0 - 0.001)
            .copied()
            .unwrap_or(self.0);
        Self(prev)
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(speed_bounds::DEFAULT)
    }
}

// =============================================================================
// BufferCapacity
// =============================================================================

/// Frame buffer capacity bounds (1 to 120 frames).
pub mod buffer_capacity_bounds {
    /// Minimum number of buffered frames.
    pub const MIN: usize = 1;
    /// Maximum number of buffered frames.
    pub const MAX: usize = 120;
    /// Default number of buffered frames.
    pub const DEFAULT: usize = 10;
}

/// Maximum number of decoded frames held ahead of emission.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–120 frames).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================
