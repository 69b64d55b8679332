// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for unit tests.
//!
//! Re-exports the `approx` assertion macros for float comparison and builds
//! small frames so tests do not depend on a decoder.

pub use approx::assert_abs_diff_eq;

use crate::domain::media::{Frame, RawImage};

/// A 2x2 opaque grey frame at `pts_secs`.
pub fn test_frame(pts_secs: f64) -> Frame {
    Frame::new(pts_secs, RawImage::from_rgba(2, 2, [128, 128, 128, 255].repeat(4)))
}
