// SPDX-License-Identifier: MPL-2.0
//! Events emitted by the playback engine.
//!
//! The run loop is the single producer and [`PlaybackEvents`] the single
//! consumer of an unbounded channel, so events arrive in emission order and
//! the run loop never blocks on a slow consumer.

use tokio::sync::mpsc;

pub use tokio::sync::mpsc::error::TryRecvError;

use crate::domain::media::{RawImage, VideoMetadata};

/// Notification sent from the run loop to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// The source opened; sent once, before any frame.
    Opened {
        duration_secs: f64,
        fps: f64,
        width: u32,
        height: u32,
    },
    /// A frame to display.
    FrameReady(RawImage),
    /// Timestamp of the frame just sent with `FrameReady`.
    PositionChanged(f64),
    /// The source failed to open. Sent at most once.
    Error(String),
    /// The run loop exited and the source is released. Always the last event.
    Finished,
}

impl PlaybackEvent {
    pub(crate) fn opened(metadata: &VideoMetadata) -> Self {
        Self::Opened {
            duration_secs: metadata.duration_secs,
            fps: metadata.fps,
            width: metadata.width,
            height: metadata.height,
        }
    }

    /// Returns true for the final event of a session.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Producer half, owned by the run loop.
#[derive(Debug)]
pub(crate) struct EventSender {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl EventSender {
    /// Sends an event. A consumer that went away is not an error: playback
    /// keeps running until stopped.
    pub(crate) fn emit(&self, event: PlaybackEvent) {
        if self.tx.send(event).is_err() {
            log::trace!("Event receiver dropped; event discarded");
        }
    }
}

/// Consumer half of the event channel.
#[derive(Debug)]
pub struct PlaybackEvents {
    rx: mpsc::UnboundedReceiver<PlaybackEvent>,
}

impl PlaybackEvents {
    /// Returns the next queued event without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TryRecvError::Empty`] when nothing is queued yet and
    /// [`TryRecvError::Disconnected`] once the run loop has exited and every
    /// event has been received.
    pub fn try_recv(&mut self) -> Result<PlaybackEvent, TryRecvError> {
        self.rx.try_recv()
    }

    /// Waits for the next event. Returns `None` once the run loop has exited
    /// and every event has been received.
    pub async fn recv(&mut self) -> Option<PlaybackEvent> {
        self.rx.recv().await
    }

    /// Blocking variant of [`recv`](Self::recv) for synchronous consumers.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_recv(&mut self) -> Option<PlaybackEvent> {
        self.rx.blocking_recv()
    }

    /// Takes every event queued so far.
    pub fn drain(&mut self) -> Vec<PlaybackEvent> {
        std::iter::from_fn(|| self.try_recv().ok()).collect()
    }
}

/// Creates a connected sender/receiver pair.
pub(crate) fn channel() -> (EventSender, PlaybackEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, PlaybackEvents { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_emission_order() {
        let (sender, mut events) = channel();
        sender.emit(PlaybackEvent::PositionChanged(1.0));
        sender.emit(PlaybackEvent::PositionChanged(2.0));
        sender.emit(PlaybackEvent::Finished);

        assert_eq!(
            events.drain(),
            vec![
                PlaybackEvent::PositionChanged(1.0),
                PlaybackEvent::PositionChanged(2.0),
                PlaybackEvent::Finished,
            ]
        );
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn try_recv_reports_disconnect_after_last_event() {
        let (sender, mut events) = channel();
        sender.emit(PlaybackEvent::Finished);
        drop(sender);

        assert_eq!(events.try_recv(), Ok(PlaybackEvent::Finished));
        assert_eq!(events.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn emit_after_receiver_dropped_is_silent() {
        let (sender, events) = channel();
        drop(events);
        sender.emit(PlaybackEvent::Finished);
    }

    #[test]
    fn blocking_recv_returns_none_after_sender_dropped() {
        let (sender, mut events) = channel();
        sender.emit(PlaybackEvent::Error("boom".into()));
        drop(sender);
        assert_eq!(
            events.blocking_recv(),
            Some(PlaybackEvent::Error("boom".into()))
        );
        assert_eq!(events.blocking_recv(), None);
    }

    #[tokio::test]
    async fn async_recv_yields_events() {
        let (sender, mut events) = channel();
        sender.emit(PlaybackEvent::Finished);
        let event = events.recv().await.expect("event queued");
        assert!(event.is_finished());
    }

    #[test]
    fn opened_copies_metadata() {
        let metadata = VideoMetadata::new(640, 480, 12.0, 25.0);
        assert_eq!(
            PlaybackEvent::opened(&metadata),
            PlaybackEvent::Opened {
                duration_secs: 12.0,
                fps: 25.0,
                width: 640,
                height: 480,
            }
        );
    }
}
