// SPDX-License-Identifier: MPL-2.0
//! Integration tests for the playback controller.
//!
//! These drive the public API end to end on a real run-loop thread, using a
//! scripted in-memory frame source so no video files are needed.

use ethowild::application::port::FrameSource;
use ethowild::config::EngineConfig;
use ethowild::domain::error::VideoError;
use ethowild::domain::media::{Frame, RawImage, VideoMetadata};
use ethowild::domain::video::PlaybackState;
use ethowild::error::Error;
use ethowild::video_player::{PlaybackController, PlaybackEvent, PlaybackEvents, TryRecvError};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct SourceLog {
    opens: AtomicUsize,
    releases: AtomicUsize,
    seeks: Mutex<Vec<f64>>,
}

/// Yields `total` 2x2 frames spaced `1 / fps` seconds apart.
struct ScriptedSource {
    fps: f64,
    total: u32,
    cursor: u32,
    fail_open: bool,
    panic_on_read: bool,
    log: Arc<SourceLog>,
}

impl ScriptedSource {
    fn new(fps: f64, total: u32) -> (Self, Arc<SourceLog>) {
        let log = Arc::new(SourceLog::default());
        (
            Self {
                fps,
                total,
                cursor: 0,
                fail_open: false,
                panic_on_read: false,
                log: Arc::clone(&log),
            },
            log,
        )
    }

    fn failing() -> (Self, Arc<SourceLog>) {
        let (mut source, log) = Self::new(30.0, 0);
        source.fail_open = true;
        (source, log)
    }
}

impl FrameSource for ScriptedSource {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, VideoError> {
        self.log.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(VideoError::FileNotFound(path.display().to_string()));
        }
        Ok(VideoMetadata::new(
            2,
            2,
            f64::from(self.total) / self.fps,
            self.fps,
        ))
    }

    fn read_next(&mut self) -> Result<Option<Frame>, VideoError> {
        assert!(!self.panic_on_read, "decoder crashed");
        if self.cursor >= self.total {
            return Ok(None);
        }
        let pts = f64::from(self.cursor) / self.fps;
        self.cursor += 1;
        Ok(Some(Frame::new(
            pts,
            RawImage::from_rgba(2, 2, vec![128; 16]),
        )))
    }

    fn seek(&mut self, target: Duration) -> Result<(), VideoError> {
        let secs = target.as_secs_f64();
        self.log.seeks.lock().expect("lock").push(secs);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cursor = (secs * self.fps).floor() as u32;
        self.cursor = cursor.min(self.total);
        Ok(())
    }

    fn release(&mut self) {
        self.log.releases.fetch_add(1, Ordering::SeqCst);
    }
}

fn fast_config() -> EngineConfig {
    EngineConfig {
        pause_poll_ms: 10,
        starved_poll_ms: 1,
        ..EngineConfig::default()
    }
}

/// Receives events until `done` holds or the timeout expires.
fn collect_until(
    events: &mut PlaybackEvents,
    mut done: impl FnMut(&[PlaybackEvent]) -> bool,
) -> Vec<PlaybackEvent> {
    let deadline = Instant::now() + TIMEOUT;
    let mut seen = Vec::new();
    while Instant::now() < deadline {
        match events.try_recv() {
            Ok(event) => {
                seen.push(event);
                if done(&seen) {
                    break;
                }
            }
            Err(TryRecvError::Empty) => thread::sleep(Duration::from_millis(1)),
            Err(TryRecvError::Disconnected) => break,
        }
    }
    seen
}

fn positions(events: &[PlaybackEvent]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::PositionChanged(pts) => Some(*pts),
            _ => None,
        })
        .collect()
}

fn count_positions_at_or_after(events: &[PlaybackEvent], secs: f64) -> usize {
    positions(events).iter().filter(|&&p| p >= secs).count()
}

#[test]
fn seek_after_start_lands_on_target() {
    let (source, _log) = ScriptedSource::new(30.0, 3000);
    let (controller, mut events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");
    controller.seek(50.0).expect("seek");
    controller.set_speed(8.0).expect("speed");

    let seen = collect_until(&mut events, |seen| {
        count_positions_at_or_after(seen, 50.0) >= 10
    });

    let emitted = positions(&seen);
    let first_after = emitted
        .iter()
        .position(|&p| p >= 50.0)
        .expect("a frame after the seek target");
    // Anything before the seek took effect came from the very start
    assert!(emitted[..first_after].iter().all(|&p| p < 1.0));
    assert!(emitted[first_after] < 51.0);
    assert!(emitted[first_after..].windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn opened_precedes_frames_and_frames_pair_with_positions() {
    let (source, _log) = ScriptedSource::new(30.0, 300);
    let (controller, mut events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");
    controller.set_speed(8.0).expect("speed");

    let seen = collect_until(&mut events, |seen| positions(seen).len() >= 5);

    assert_eq!(
        seen[0],
        PlaybackEvent::Opened {
            duration_secs: 10.0,
            fps: 30.0,
            width: 2,
            height: 2,
        }
    );
    for pair in seen[1..].chunks(2) {
        assert!(matches!(pair[0], PlaybackEvent::FrameReady(_)));
        if let Some(second) = pair.get(1) {
            assert!(matches!(second, PlaybackEvent::PositionChanged(_)));
        }
    }
    assert_eq!(controller.metadata().map(|m| m.fps), Some(30.0));
}

#[test]
fn stop_releases_once_then_finishes() {
    let (source, log) = ScriptedSource::new(30.0, 300);
    let (mut controller, mut events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");

    collect_until(&mut events, |seen| !positions(seen).is_empty());
    controller.stop();
    let seen = collect_until(&mut events, |seen| {
        seen.last().is_some_and(PlaybackEvent::is_finished)
    });
    controller.join();

    assert!(seen.last().is_some_and(PlaybackEvent::is_finished));
    assert_eq!(log.releases.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(events.try_recv(), Err(TryRecvError::Disconnected));
}

#[test]
fn open_failure_reports_error_and_finishes() {
    let (source, log) = ScriptedSource::failing();
    let (mut controller, mut events) =
        PlaybackController::start("missing.mp4", source, fast_config()).expect("start");
    controller.join();

    let seen = events.drain();
    assert_eq!(seen.len(), 2);
    match &seen[0] {
        PlaybackEvent::Error(message) => assert!(message.contains("missing.mp4")),
        other => panic!("expected Error, got {other:?}"),
    }
    assert!(seen[1].is_finished());
    assert_eq!(log.opens.load(Ordering::SeqCst), 1);
    assert_eq!(log.releases.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state(), PlaybackState::Error);
    assert!(controller.metadata().is_none());
    assert!(matches!(controller.seek(1.0), Err(Error::EngineStopped)));
}

#[test]
fn pause_stops_emission_but_fills_buffer() {
    let (source, _log) = ScriptedSource::new(30.0, 3000);
    let (controller, mut events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");

    collect_until(&mut events, |seen| !positions(seen).is_empty());
    controller.pause();
    thread::sleep(Duration::from_millis(200));
    events.drain();

    thread::sleep(Duration::from_millis(300));
    let while_paused = events.drain();

    assert!(positions(&while_paused).is_empty());
    assert!(!while_paused
        .iter()
        .any(|e| matches!(e, PlaybackEvent::FrameReady(_))));
    assert_eq!(controller.buffered_frames(), 10);
    assert_eq!(controller.state(), PlaybackState::Paused);

    controller.play();
    let resumed = collect_until(&mut events, |seen| !positions(seen).is_empty());
    assert!(!positions(&resumed).is_empty());
}

#[test]
fn toggle_pause_flips_request() {
    let (source, _log) = ScriptedSource::new(30.0, 300);
    let (controller, _events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");

    assert!(controller.toggle_pause());
    assert!(controller.is_paused());
    assert!(!controller.toggle_pause());
    assert!(!controller.is_paused());
}

#[test]
fn slower_speed_stretches_emission_interval() {
    let (source, _log) = ScriptedSource::new(100.0, 10_000);
    let (controller, mut events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");
    controller.set_speed(0.5).expect("speed");

    collect_until(&mut events, |seen| !positions(seen).is_empty());
    let started = Instant::now();
    collect_until(&mut events, |seen| positions(seen).len() >= 10);
    let elapsed = started.elapsed();

    // Each emission is followed by at least 1 / (100 * 0.5) s of sleep
    assert!(
        elapsed >= Duration::from_millis(180),
        "ten frames at half speed took only {elapsed:?}"
    );
}

#[test]
fn end_of_stream_loops_back_to_start() {
    let (source, log) = ScriptedSource::new(30.0, 5);
    let (controller, mut events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");
    controller.set_speed(8.0).expect("speed");

    let seen = collect_until(&mut events, |seen| positions(seen).len() >= 12);

    let emitted = positions(&seen);
    let wrap = emitted
        .windows(2)
        .position(|w| w[1] < w[0])
        .expect("positions wrap at end of stream");
    assert_eq!(emitted[wrap + 1], 0.0);
    assert!(log.seeks.lock().expect("lock").contains(&0.0));
}

#[test]
fn seek_fraction_maps_onto_duration() {
    let (source, _log) = ScriptedSource::new(30.0, 3000);
    let (controller, mut events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");
    controller.set_speed(8.0).expect("speed");

    collect_until(&mut events, |seen| {
        seen.iter().any(|e| matches!(e, PlaybackEvent::Opened { .. }))
    });
    controller.seek_fraction(0.25).expect("seek fraction");

    let seen = collect_until(&mut events, |seen| count_positions_at_or_after(seen, 25.0) >= 1);
    let landed = positions(&seen)
        .into_iter()
        .find(|&p| p >= 25.0)
        .expect("frame after fractional seek");
    assert!(landed < 26.0);
}

#[test]
fn dropped_receiver_does_not_stop_playback() {
    let (source, log) = ScriptedSource::new(30.0, 300);
    let (mut controller, events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");
    drop(events);

    thread::sleep(Duration::from_millis(100));
    assert!(!controller.state().is_terminal());

    controller.stop();
    controller.join();
    assert_eq!(log.releases.load(Ordering::SeqCst), 1);
}

#[test]
fn dropping_controller_releases_source() {
    let (source, log) = ScriptedSource::new(30.0, 300);
    let (controller, mut events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");
    drop(controller);

    assert_eq!(log.releases.load(Ordering::SeqCst), 1);
    let seen = events.drain();
    assert_eq!(seen.iter().filter(|e| e.is_finished()).count(), 1);
    assert!(seen.last().is_some_and(PlaybackEvent::is_finished));
}

#[test]
fn zero_fps_source_is_paced_at_default_rate() {
    struct NoRate(ScriptedSource);
    impl FrameSource for NoRate {
        fn open(&mut self, path: &Path) -> Result<VideoMetadata, VideoError> {
            let meta = self.0.open(path)?;
            Ok(VideoMetadata { fps: 0.0, ..meta })
        }
        fn read_next(&mut self) -> Result<Option<Frame>, VideoError> {
            self.0.read_next()
        }
        fn seek(&mut self, target: Duration) -> Result<(), VideoError> {
            self.0.seek(target)
        }
        fn release(&mut self) {
            self.0.release();
        }
    }

    let (source, _log) = ScriptedSource::new(30.0, 30);
    let (controller, mut events) =
        PlaybackController::start("wild.mp4", NoRate(source), fast_config()).expect("start");

    let seen = collect_until(&mut events, |seen| !seen.is_empty());
    assert!(matches!(seen[0], PlaybackEvent::Opened { fps, .. } if fps == 30.0));
    assert_eq!(controller.metadata().map(|m| m.fps), Some(30.0));
}

#[test]
fn stop_is_prompt_on_a_slow_source() {
    let (source, log) = ScriptedSource::new(0.2, 10);
    let (mut controller, mut events) =
        PlaybackController::start("slow.mp4", source, fast_config()).expect("start");

    collect_until(&mut events, |seen| !positions(seen).is_empty());
    let started = Instant::now();
    controller.stop();
    controller.join();
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_millis(150), "stop took {elapsed:?}");
    assert_eq!(log.releases.load(Ordering::SeqCst), 1);
    assert!(events
        .drain()
        .last()
        .is_some_and(PlaybackEvent::is_finished));
}

#[test]
fn seek_is_applied_during_a_long_frame_period() {
    let (source, log) = ScriptedSource::new(1.0, 100);
    let (controller, mut events) =
        PlaybackController::start("slow.mp4", source, fast_config()).expect("start");

    collect_until(&mut events, |seen| !positions(seen).is_empty());
    let started = Instant::now();
    controller.seek(40.0).expect("seek");
    let seen = collect_until(&mut events, |seen| {
        positions(seen).iter().any(|&pts| pts >= 40.0)
    });

    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(positions(&seen).first(), Some(&40.0));
    assert_eq!(*log.seeks.lock().expect("lock"), vec![40.0]);
}

#[test]
fn panicking_source_releases_and_finishes() {
    let (mut source, log) = ScriptedSource::new(30.0, 300);
    source.panic_on_read = true;
    let (mut controller, mut events) =
        PlaybackController::start("crash.mp4", source, fast_config()).expect("start");
    controller.join();

    let seen = events.drain();
    assert!(matches!(seen.first(), Some(PlaybackEvent::Opened { .. })));
    assert!(seen.last().is_some_and(PlaybackEvent::is_finished));
    assert_eq!(log.releases.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state(), PlaybackState::Error);
    assert!(matches!(controller.seek(1.0), Err(Error::EngineStopped)));
    assert_eq!(events.try_recv(), Err(TryRecvError::Disconnected));
}

#[test]
fn speed_presets_step_up_and_down() {
    let (source, _log) = ScriptedSource::new(30.0, 300);
    let (controller, _events) =
        PlaybackController::start("wild.mp4", source, fast_config()).expect("start");

    assert_eq!(controller.increase_speed().expect("running").value(), 1.25);
    assert_eq!(controller.decrease_speed().expect("running").value(), 1.0);
    assert_eq!(controller.decrease_speed().expect("running").value(), 0.75);
    assert_eq!(controller.speed(), 0.75);
}
