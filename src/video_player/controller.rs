// SPDX-License-Identifier: MPL-2.0
//! Playback controller and its run loop.
//!
//! [`PlaybackController::start`] moves a [`FrameSource`] onto a dedicated
//! thread that runs one loop, in this order per iteration:
//!
//! 1. stop requested: exit
//! 2. seek pending: clear the buffer, reposition the source
//! 3. buffer not full: decode one frame (end of stream restarts at 0)
//! 4. paused: sleep the pause interval without consuming
//! 5. otherwise pop one frame, emit it, sleep one paced frame period
//!    (or the starved interval when nothing is buffered)
//!
//! Sleeps are cut into slices of at most the pause interval so a stop or
//! seek request never waits out a long frame period.
//!
//! Every exit path, a panicking source included, releases the source exactly
//! once on the loop thread and then emits [`PlaybackEvent::Finished`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::application::port::FrameSource;
use crate::config::EngineConfig;
use crate::domain::error::VideoError;
use crate::domain::media::VideoMetadata;
use crate::domain::video::{PlaybackSpeed, PlaybackState};
use crate::error::{Error, Result};

use super::control::ControlState;
use super::events::{self, EventSender, PlaybackEvent, PlaybackEvents};
use super::frame_buffer::FrameBuffer;
use super::pacing::pace_interval;
use super::time_units::secs_to_duration;

const THREAD_NAME: &str = "ethowild-playback";

/// Handle to a running playback session.
///
/// All methods take `&self` except [`join`](Self::join) and are safe to call
/// from the consumer thread while the run loop is active. Commands are
/// requests: they take effect on the loop's next iteration.
///
/// Dropping the controller stops the run loop and waits for it.
#[derive(Debug)]
pub struct PlaybackController {
    control: Arc<ControlState>,
    buffer: Arc<FrameBuffer>,
    metadata: Arc<OnceLock<VideoMetadata>>,
    handle: Option<JoinHandle<()>>,
}

impl PlaybackController {
    /// Spawns the run loop for `path`, reading from `source`.
    ///
    /// Open failures are reported through the returned event stream
    /// ([`PlaybackEvent::Error`] then [`PlaybackEvent::Finished`]), not here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the run-loop thread cannot be spawned.
    pub fn start<S>(
        path: impl Into<PathBuf>,
        source: S,
        config: EngineConfig,
    ) -> Result<(Self, PlaybackEvents)>
    where
        S: FrameSource + 'static,
    {
        let path = path.into();
        let control = Arc::new(ControlState::new());
        let buffer = Arc::new(FrameBuffer::new(config.capacity()));
        let metadata = Arc::new(OnceLock::new());
        let (sender, events) = events::channel();

        let run_loop = RunLoop::new(
            source,
            Arc::clone(&buffer),
            Arc::clone(&control),
            sender,
            config,
        );
        let slot = Arc::clone(&metadata);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run_loop.run(&path, &slot))?;

        Ok((
            Self {
                control,
                buffer,
                metadata,
                handle: Some(handle),
            },
            events,
        ))
    }

    /// Resumes emission.
    pub fn play(&self) {
        self.control.set_paused(false);
    }

    /// Stops emission; decoding continues until the buffer is full.
    pub fn pause(&self) {
        self.control.set_paused(true);
    }

    /// Flips between playing and paused. Returns true if now paused.
    pub fn toggle_pause(&self) -> bool {
        self.control.toggle_paused()
    }

    /// Requests a seek to `seconds`. Negative targets clamp to zero; a
    /// non-finite target is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineStopped`] once the run loop has ended.
    pub fn seek(&self, seconds: f64) -> Result<()> {
        self.ensure_running()?;
        if !seconds.is_finite() {
            log::debug!("Ignoring non-finite seek target {seconds}");
            return Ok(());
        }
        self.control.request_seek(seconds);
        Ok(())
    }

    /// Requests a seek to `fraction` (clamped to `0.0..=1.0`) of the
    /// duration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineStopped`] once the run loop has ended and
    /// [`VideoError::NotOpened`] before the source has opened.
    pub fn seek_fraction(&self, fraction: f64) -> Result<()> {
        self.ensure_running()?;
        let metadata = self
            .metadata
            .get()
            .ok_or(Error::Video(VideoError::NotOpened))?;
        if fraction.is_nan() {
            return Ok(());
        }
        self.seek(fraction.clamp(0.0, 1.0) * metadata.duration_secs)
    }

    /// Sets the speed factor used for pacing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpeed`] for zero, negative or non-finite
    /// factors and [`Error::EngineStopped`] once the run loop has ended.
    pub fn set_speed(&self, factor: f64) -> Result<()> {
        let speed = PlaybackSpeed::try_new(factor).ok_or(Error::InvalidSpeed(factor))?;
        self.ensure_running()?;
        self.control.set_speed(speed);
        log::debug!("Playback speed set to {:.2}x", speed.value());
        Ok(())
    }

    /// Steps the speed up to the next preset. Speeds above every preset are
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineStopped`] once the run loop has ended.
    pub fn increase_speed(&self) -> Result<PlaybackSpeed> {
        self.step_speed(PlaybackSpeed::increase)
    }

    /// Steps the speed down to the previous preset. Speeds below every
    /// preset are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineStopped`] once the run loop has ended.
    pub fn decrease_speed(&self) -> Result<PlaybackSpeed> {
        self.step_speed(PlaybackSpeed::decrease)
    }

    fn step_speed(&self, next: fn(PlaybackSpeed) -> PlaybackSpeed) -> Result<PlaybackSpeed> {
        self.ensure_running()?;
        let speed = next(self.playback_speed());
        self.control.set_speed(speed);
        log::debug!("Playback speed stepped to {:.2}x", speed.value());
        Ok(speed)
    }

    /// Requests termination. Wait for [`PlaybackEvent::Finished`] or call
    /// [`join`](Self::join) before assuming the source is released.
    pub fn stop(&self) {
        self.control.request_stop();
    }

    /// Blocks until the run loop thread has exited. Does not request a stop
    /// by itself.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Playback thread panicked");
            }
        }
    }

    /// State last published by the run loop.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.control.state()
    }

    /// Metadata of the opened source, once known.
    #[must_use]
    pub fn metadata(&self) -> Option<VideoMetadata> {
        self.metadata.get().cloned()
    }

    /// Frames currently decoded but not yet emitted.
    #[must_use]
    pub fn buffered_frames(&self) -> usize {
        self.buffer.len()
    }

    /// Current speed factor.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.control.speed()
    }

    /// Current speed factor as a bounded [`PlaybackSpeed`].
    #[must_use]
    pub fn playback_speed(&self) -> PlaybackSpeed {
        PlaybackSpeed::new(self.control.speed())
    }

    /// Whether a pause has been requested.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.control.is_paused()
    }

    fn ensure_running(&self) -> Result<()> {
        if self.control.state().is_terminal() {
            Err(Error::EngineStopped)
        } else {
            Ok(())
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

// =============================================================================
// Run loop
// =============================================================================

/// What the loop thread does after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Sleep(Duration),
    Exit,
}

/// State owned by the run-loop thread.
pub(crate) struct RunLoop<S: FrameSource> {
    source: S,
    buffer: Arc<FrameBuffer>,
    control: Arc<ControlState>,
    events: EventSender,
    config: EngineConfig,
    fps: f64,
    /// Set at end of stream when looping is disabled; cleared by a seek.
    parked: bool,
}

impl<S: FrameSource> RunLoop<S> {
    pub(crate) fn new(
        source: S,
        buffer: Arc<FrameBuffer>,
        control: Arc<ControlState>,
        events: EventSender,
        config: EngineConfig,
    ) -> Self {
        let fps = config.fallback_fps();
        Self {
            source,
            buffer,
            control,
            events,
            config,
            fps,
            parked: false,
        }
    }

    /// Thread body: open, iterate until stopped. Release and `Finished`
    /// happen when `self` drops, which also covers an unwinding source.
    pub(crate) fn run(mut self, path: &Path, metadata_slot: &OnceLock<VideoMetadata>) {
        if self.open(path, metadata_slot) {
            while let Step::Sleep(interval) = self.step() {
                self.wait(interval);
            }
            self.control.set_state(PlaybackState::Stopped);
            log::info!("Playback stopped");
        }
    }

    /// Sleeps for `interval` in slices no longer than the pause interval,
    /// returning early once a stop or seek is pending.
    pub(crate) fn wait(&self, interval: Duration) {
        let deadline = Instant::now() + interval;
        let slice = self.config.pause_poll_interval();
        loop {
            if self.control.stop_requested() || self.control.has_pending_seek() {
                return;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            thread::sleep(remaining.min(slice));
        }
    }

    /// Opens the source and announces it. Returns false on failure.
    pub(crate) fn open(
        &mut self,
        path: &Path,
        metadata_slot: &OnceLock<VideoMetadata>,
    ) -> bool {
        match self.source.open(path) {
            Ok(metadata) => {
                let metadata = metadata.with_fps_fallback(self.config.fallback_fps());
                self.fps = metadata.fps;
                log::info!(
                    "Opened {}: {}x{}, {:.2}s @ {:.3} fps",
                    path.display(),
                    metadata.width,
                    metadata.height,
                    metadata.duration_secs,
                    metadata.fps
                );
                let opened = PlaybackEvent::opened(&metadata);
                let _ = metadata_slot.set(metadata);
                self.events.emit(opened);
                self.control.set_state(self.running_state());
                true
            }
            Err(e) => {
                log::error!("Failed to open {}: {e}", path.display());
                self.control.set_state(PlaybackState::Error);
                self.events.emit(PlaybackEvent::Error(e.to_string()));
                false
            }
        }
    }

    /// Runs one loop iteration.
    pub(crate) fn step(&mut self) -> Step {
        if self.control.stop_requested() {
            return Step::Exit;
        }

        if let Some(target_secs) = self.control.take_seek() {
            self.apply_seek(target_secs);
        }

        if self.buffer.len() < self.buffer.capacity() && !self.parked {
            self.fill_one();
        }

        if self.control.is_paused() {
            self.control.set_state(PlaybackState::Paused);
            return Step::Sleep(self.config.pause_poll_interval());
        }
        self.control.set_state(PlaybackState::Playing);

        match self.buffer.try_pop() {
            Some(frame) => {
                let (pts_secs, image) = frame.into_parts();
                self.events.emit(PlaybackEvent::FrameReady(image));
                self.events.emit(PlaybackEvent::PositionChanged(pts_secs));
                Step::Sleep(pace_interval(self.fps, self.control.speed()))
            }
            None => Step::Sleep(self.config.starved_poll_interval()),
        }
    }

    fn apply_seek(&mut self, target_secs: f64) {
        self.control.set_state(PlaybackState::Seeking);
        self.buffer.clear();
        self.parked = false;
        match self.source.seek(secs_to_duration(target_secs)) {
            Ok(()) => log::debug!("Seeked to {target_secs:.3}s"),
            Err(e) => log::warn!("Seek to {target_secs:.3}s failed: {e}"),
        }
        self.control.set_state(self.running_state());
    }

    fn fill_one(&mut self) {
        match self.source.read_next() {
            Ok(Some(frame)) => {
                if let Err(frame) = self.buffer.try_push(frame) {
                    log::debug!("Buffer full; dropped frame at {:.3}s", frame.pts_secs());
                }
            }
            Ok(None) => self.end_of_stream(),
            Err(e) => {
                log::debug!("Decode error treated as end of stream: {e}");
                self.end_of_stream();
            }
        }
    }

    fn end_of_stream(&mut self) {
        if !self.config.loop_playback {
            log::debug!("End of stream; holding position");
            self.parked = true;
            return;
        }
        match self.source.seek(Duration::ZERO) {
            Ok(()) => log::debug!("End of stream; restarting from the beginning"),
            Err(e) => log::warn!("Restart at end of stream failed: {e}"),
        }
    }

    fn running_state(&self) -> PlaybackState {
        if self.control.is_paused() {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        }
    }
}

impl<S: FrameSource> Drop for RunLoop<S> {
    fn drop(&mut self) {
        if thread::panicking() {
            log::error!("Playback loop panicked; releasing the source");
            self.control.set_state(PlaybackState::Error);
        } else if !self.control.state().is_terminal() {
            self.control.set_state(PlaybackState::Stopped);
        }
        self.source.release();
        self.events.emit(PlaybackEvent::Finished);
    }
}
