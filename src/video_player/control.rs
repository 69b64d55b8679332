// SPDX-License-Identifier: MPL-2.0
//! Consumer intent shared with the run loop.
//!
//! Each field is an independent atomic: no invariant spans two of them, so
//! the consumer can write any field at any time and the run loop picks up
//! the latest value on its next iteration (last writer wins).
//!
//! `f64` values are stored as their bit patterns in `AtomicU64`.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

use crate::domain::video::{PlaybackSpeed, PlaybackState};

/// Bit pattern marking "no seek pending". It is a NaN, which is never stored
/// as a real target.
const NO_SEEK: u64 = u64::MAX;

/// Lock-free control block written by the consumer and read by the run loop.
#[derive(Debug)]
pub struct ControlState {
    stop_requested: AtomicBool,
    pause_requested: AtomicBool,
    speed_bits: AtomicU64,
    seek_target_bits: AtomicU64,
    state: AtomicU8,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlState {
    /// Creates a control block: running, unpaused, speed 1.0, no seek,
    /// state `Opening`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            pause_requested: AtomicBool::new(false),
            speed_bits: AtomicU64::new(PlaybackSpeed::default().value().to_bits()),
            seek_target_bits: AtomicU64::new(NO_SEEK),
            state: AtomicU8::new(PlaybackState::Opening.to_u8()),
        }
    }

    // ---------------------------------------------------------------------
    // Stop
    // ---------------------------------------------------------------------

    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // ---------------------------------------------------------------------
    // Pause
    // ---------------------------------------------------------------------

    pub fn set_paused(&self, paused: bool) {
        self.pause_requested.store(paused, Ordering::Release);
    }

    /// Flips the pause request and returns the new value.
    pub fn toggle_paused(&self) -> bool {
        !self.pause_requested.fetch_xor(true, Ordering::AcqRel)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause_requested.load(Ordering::Acquire)
    }

    // ---------------------------------------------------------------------
    // Speed
    // ---------------------------------------------------------------------

    pub fn set_speed(&self, speed: PlaybackSpeed) {
        self.speed_bits
            .store(speed.value().to_bits(), Ordering::Release);
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        f64::from_bits(self.speed_bits.load(Ordering::Acquire))
    }

    // ---------------------------------------------------------------------
    // Seek
    // ---------------------------------------------------------------------

    /// Records a seek target in seconds, replacing any pending one.
    ///
    /// Non-finite targets are ignored; negative targets become zero.
    pub fn request_seek(&self, target_secs: f64) {
        if !target_secs.is_finite() {
            return;
        }
        self.seek_target_bits
            .store(target_secs.max(0.0).to_bits(), Ordering::Release);
    }

    /// Takes the pending seek target, leaving none behind.
    pub fn take_seek(&self) -> Option<f64> {
        let bits = self.seek_target_bits.swap(NO_SEEK, Ordering::AcqRel);
        (bits != NO_SEEK).then(|| f64::from_bits(bits))
    }

    #[must_use]
    pub fn has_pending_seek(&self) -> bool {
        self.seek_target_bits.load(Ordering::Acquire) != NO_SEEK
    }

    // ---------------------------------------------------------------------
    // Published state
    // ---------------------------------------------------------------------

    /// Publishes the run loop's current state.
    pub fn set_state(&self, state: PlaybackState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_u8(self.state.load(Ordering::Acquire))
    }
}
