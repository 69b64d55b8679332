// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all engine configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used by the playback engine. Constants are organized by category.
//!
//! # Categories
//!
//! - **Buffer**: Decode-ahead depth
//! - **Frame Rate**: Fallback when the container reports none
//! - **Polling**: Run-loop sleep intervals

// ==========================================================================
// Buffer Defaults
// ==========================================================================

/// Default number of decoded frames held ahead of emission.
pub const DEFAULT_BUFFER_CAPACITY: usize = 10;

/// Minimum buffer capacity.
pub const MIN_BUFFER_CAPACITY: usize = 1;

/// Maximum buffer capacity.
pub const MAX_BUFFER_CAPACITY: usize = 120;

// ==========================================================================
// Frame Rate Defaults
// ==========================================================================

/// Frame rate substituted when a source reports zero or a negative rate.
pub const DEFAULT_FPS: f64 = 30.0;

// ==========================================================================
// Polling Defaults
// ==========================================================================

/// Sleep between iterations while paused (milliseconds).
pub const DEFAULT_PAUSE_POLL_MS: u64 = 50;

/// Sleep between iterations while the buffer is empty (milliseconds).
pub const DEFAULT_STARVED_POLL_MS: u64 = 5;

/// Minimum poll interval (milliseconds).
pub const MIN_POLL_MS: u64 = 1;

/// Maximum poll interval (milliseconds); bounds stop/pause/seek latency.
pub const MAX_POLL_MS: u64 = 1000;

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Whether reaching end of stream restarts from the beginning.
pub const DEFAULT_LOOP_PLAYBACK: bool = true;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_BUFFER_CAPACITY > 0);
    assert!(MAX_BUFFER_CAPACITY >= MIN_BUFFER_CAPACITY);
    assert!(DEFAULT_BUFFER_CAPACITY >= MIN_BUFFER_CAPACITY);
    assert!(DEFAULT_BUFFER_CAPACITY <= MAX_BUFFER_CAPACITY);

    assert!(DEFAULT_FPS > 0.0);

    assert!(MIN_POLL_MS > 0);
    assert!(MAX_POLL_MS >= MIN_POLL_MS);
    assert!(DEFAULT_PAUSE_POLL_MS >= MIN_POLL_MS);
    assert!(DEFAULT_PAUSE_POLL_MS <= MAX_POLL_MS);
    assert!(DEFAULT_STARVED_POLL_MS >= MIN_POLL_MS);
    assert!(DEFAULT_STARVED_POLL_MS <= DEFAULT_PAUSE_POLL_MS);
};
