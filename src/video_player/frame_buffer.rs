// SPDX-License-Identifier: MPL-2.0
//! Bounded FIFO of decoded frames awaiting emission.
//!
//! The run loop is both producer and consumer, but the controller reads the
//! fill level from other threads, so the queue sits behind a mutex. Every
//! operation holds the lock only for a single queue manipulation.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::media::Frame;
use crate::domain::video::BufferCapacity;

/// Thread-safe bounded frame queue.
#[derive(Debug)]
pub struct FrameBuffer {
    frames: Mutex<VecDeque<Frame>>,
    capacity: usize,
}

impl FrameBuffer {
    /// Creates an empty buffer holding at most `capacity` frames.
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let capacity = capacity.value();
        Self {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Frame>> {
        // A panic while holding the lock leaves the queue itself intact
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a frame at the tail.
    ///
    /// # Errors
    ///
    /// Returns the frame back when the buffer is full.
    pub fn try_push(&self, frame: Frame) -> Result<(), Frame> {
        let mut frames = self.lock();
        if frames.len() >= self.capacity {
            return Err(frame);
        }
        frames.push_back(frame);
        Ok(())
    }

    /// Removes and returns the head frame, if any.
    pub fn try_pop(&self) -> Option<Frame> {
        self.lock().pop_front()
    }

    /// Drops every buffered frame.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of frames currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns true when no more frames fit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
