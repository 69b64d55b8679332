// SPDX-License-Identifier: MPL-2.0
//! Time unit conversion utilities for video playback.
//!
//! `FFmpeg` expresses container positions in `AV_TIME_BASE` units
//! (microseconds); the engine works in seconds. These helpers convert
//! between the two, plus the millisecond intervals used by the run loop.

use std::time::Duration;

/// Microseconds per second as f64 for calculations.
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Converts PTS seconds to microseconds (i64 for container seeks).
///
/// # Examples
///
/// ```
/// use ethowild::video_player::time_units::pts_to_micros;
///
/// assert_eq!(pts_to_micros(1.0), 1_000_000);
/// assert_eq!(pts_to_micros(0.5), 500_000);
/// ```
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn pts_to_micros(pts_secs: f64) -> i64 {
    (pts_secs * MICROS_PER_SECOND) as i64
}

/// Converts microseconds to PTS seconds (f64).
///
/// # Examples
///
/// ```
/// use ethowild::video_player::time_units::micros_to_pts;
///
/// assert_eq!(micros_to_pts(1_000_000), 1.0);
/// assert_eq!(micros_to_pts(500_000), 0.5);
/// ```
#[inline]
#[allow(clippy::cast_precision_loss)]
pub fn micros_to_pts(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SECOND
}

/// Converts a non-negative seconds value into a `Duration`.
///
/// Negative and non-finite values collapse to zero.
#[inline]
#[must_use]
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}
