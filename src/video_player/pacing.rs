// SPDX-License-Identifier: MPL-2.0
//! Frame pacing.
//!
//! After emitting a frame the run loop sleeps for one frame period scaled
//! by the playback speed: `1 / (fps × speed)` seconds. Speed changes only
//! affect this sleep, never the decode rate.

use std::time::Duration;

use crate::config::DEFAULT_FPS;

/// Computes the sleep that follows one emitted frame.
///
/// A non-positive or non-finite effective rate falls back to the default
/// frame rate at normal speed.
///
/// # Examples
///
/// ```
/// use ethowild::video_player::pacing::pace_interval;
/// use std::time::Duration;
///
/// assert_eq!(pace_interval(25.0, 1.0), Duration::from_millis(40));
/// assert_eq!(pace_interval(25.0, 2.0), Duration::from_millis(20));
/// ```
#[must_use]
pub fn pace_interval(fps: f64, speed: f64) -> Duration {
    let rate = fps * speed;
    if rate.is_finite() && rate > 0.0 {
        Duration::from_secs_f64(1.0 / rate)
    } else {
        Duration::from_secs_f64(1.0 / DEFAULT_FPS)
    }
}

/// Same as [`pace_interval`], in fractional milliseconds.
#[must_use]
pub fn pace_interval_ms(fps: f64, speed: f64) -> f64 {
    pace_interval(fps, speed).as_secs_f64() * 1000.0
}
