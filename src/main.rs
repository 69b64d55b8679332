// SPDX-License-Identifier: MPL-2.0
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use ethowild::config::{self, EngineConfig};
use ethowild::domain::media::RawImage;
use ethowild::error::Result;
use ethowild::infrastructure::FfmpegFrameSource;
use ethowild::media::{export_frame, generate_default_filename, ExportFormat};
use ethowild::video_player::time_units::secs_to_duration;
use ethowild::video_player::{PlaybackController, PlaybackEvent, TryRecvError};

const HELP: &str = "\
ethowild - headless video playback

USAGE:
  ethowild [OPTIONS] <VIDEO>

OPTIONS:
  --speed <F>        Initial speed factor (> 0)
  --speed-steps <N>  Preset steps applied after --speed (negative is slower)
  --seek <SECS>      Initial seek position in seconds
  --play-for <SECS>  Wall-clock seconds to play before stopping [default: 5]
  --snapshot <PATH>  Save the last displayed frame (file or directory)
  --config <PATH>    Engine config file [default: user config directory]
  -h, --help         Print this help
";

const DEFAULT_PLAY_FOR_SECS: f64 = 5.0;

/// Poll interval of the event pump.
const EVENT_POLL: Duration = Duration::from_millis(5);

struct Args {
    speed: Option<f64>,
    speed_steps: i32,
    seek: Option<f64>,
    play_for: f64,
    snapshot: Option<PathBuf>,
    config: Option<PathBuf>,
    video: PathBuf,
}

fn parse_args() -> std::result::Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let parsed = Args {
        speed: args.opt_value_from_str("--speed")?,
        speed_steps: args.opt_value_from_str("--speed-steps")?.unwrap_or(0),
        seek: args.opt_value_from_str("--seek")?,
        play_for: args
            .opt_value_from_str("--play-for")?
            .unwrap_or(DEFAULT_PLAY_FOR_SECS),
        snapshot: args.opt_value_from_str("--snapshot")?,
        config: args.opt_value_from_str("--config")?,
        video: args.free_from_str()?,
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        log::warn!("Ignoring unused arguments: {remaining:?}");
    }
    Ok(Some(parsed))
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    }
}

/// Counts emitted frames and logs a summary once per second.
struct PositionReport {
    since: Instant,
    frames: u32,
}

impl PositionReport {
    fn new() -> Self {
        Self {
            since: Instant::now(),
            frames: 0,
        }
    }

    fn frame(&mut self, pts_secs: f64, controller: &PlaybackController) {
        self.frames += 1;
        if self.since.elapsed() >= Duration::from_secs(1) {
            log::info!(
                "Position {pts_secs:.2}s ({} frames/s, {} buffered, {:.2}x)",
                self.frames,
                controller.buffered_frames(),
                controller.speed()
            );
            self.since = Instant::now();
            self.frames = 0;
        }
    }
}

/// Plays `args.video` until the deadline, then stops. Returns whether the
/// source opened.
fn run(args: &Args, config: EngineConfig) -> Result<bool> {
    let (mut controller, mut events) =
        PlaybackController::start(&args.video, FfmpegFrameSource::new(), config)?;

    if let Some(speed) = args.speed {
        controller.set_speed(speed)?;
    }
    for _ in 0..args.speed_steps.unsigned_abs() {
        if args.speed_steps > 0 {
            controller.increase_speed()?;
        } else {
            controller.decrease_speed()?;
        }
    }
    if args.speed_steps != 0 {
        log::info!("Playback speed {:.2}x", controller.playback_speed().value());
    }
    if let Some(seek) = args.seek {
        controller.seek(seek)?;
    }

    let deadline = Instant::now() + secs_to_duration(args.play_for);
    let mut report = PositionReport::new();
    let mut pending: Option<RawImage> = None;
    let mut last_shown: Option<(f64, RawImage)> = None;
    let mut opened = false;
    let mut stopping = false;

    loop {
        if !stopping && Instant::now() >= deadline {
            log::info!("Play time elapsed; stopping");
            controller.stop();
            stopping = true;
        }

        let event = match events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => {
                thread::sleep(EVENT_POLL);
                continue;
            }
            Err(TryRecvError::Disconnected) => {
                log::warn!("Playback ended without a final event");
                break;
            }
        };

        match event {
            PlaybackEvent::Opened {
                duration_secs,
                fps,
                width,
                height,
            } => {
                opened = true;
                log::info!("Opened: {width}x{height}, {duration_secs:.2}s @ {fps:.3} fps");
            }
            PlaybackEvent::FrameReady(image) => pending = Some(image),
            PlaybackEvent::PositionChanged(pts_secs) => {
                if let Some(image) = pending.take() {
                    last_shown = Some((pts_secs, image));
                }
                report.frame(pts_secs, &controller);
            }
            PlaybackEvent::Error(message) => log::error!("Playback error: {message}"),
            PlaybackEvent::Finished => break,
        }
    }

    controller.join();
    log::info!("Finished");

    if let Some(target) = &args.snapshot {
        save_snapshot(target, &args.video, last_shown.as_ref())?;
    }
    Ok(opened)
}

fn save_snapshot(target: &Path, video: &Path, frame: Option<&(f64, RawImage)>) -> Result<()> {
    let Some((pts_secs, image)) = frame else {
        log::warn!("No frame was displayed; snapshot skipped");
        return Ok(());
    };

    let path = if target.is_dir() {
        target.join(generate_default_filename(
            video,
            *pts_secs,
            ExportFormat::default(),
        ))
    } else {
        target.to_path_buf()
    };
    export_frame(image, &path, None)?;
    log::info!("Saved frame at {pts_secs:.3}s to {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args, config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
