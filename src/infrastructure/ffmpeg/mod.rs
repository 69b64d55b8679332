// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` adapter implementing the [`FrameSource`] port trait.
//!
//! This module provides [`FfmpegFrameSource`], the production frame source
//! used by the playback engine. It decodes the best video stream of a
//! container into RGBA frames.
//!
//! # Design Notes
//!
//! - All `FFmpeg` contexts live in one internal state value, dropped on
//!   `release()` so the file handle closes deterministically
//! - After a seek, frames that precede the target are decoded and discarded
//!   so the first returned frame lands within one frame of the target
//! - End of stream drains the decoder before reporting exhaustion
//!
//! [`FrameSource`]: crate::application::port::FrameSource

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use crate::application::port::FrameSource;
use crate::config::DEFAULT_FPS;
use crate::domain::error::VideoError;
use crate::domain::media::{Frame, RawImage, VideoMetadata};
use crate::video_player::time_units::{micros_to_pts, pts_to_micros};

/// Frame interval assumed when the container reports no usable rate.
const FALLBACK_FRAME_INTERVAL_SECS: f64 = 1.0 / DEFAULT_FPS;

/// Initialize `FFmpeg` with appropriate log level.
///
/// Safe to call multiple times; initialization only happens once. The
/// library's own log level is set to ERROR to keep container warnings
/// out of the engine's log output.
///
/// # Errors
///
/// Returns [`VideoError::Other`] if `FFmpeg` failed to initialize (the
/// failure is remembered and reported on every later call).
pub fn init_ffmpeg() -> Result<(), VideoError> {
    static FFMPEG_INIT: OnceLock<Result<(), String>> = OnceLock::new();

    FFMPEG_INIT
        .get_or_init(|| {
            ffmpeg_next::init().map_err(|e| format!("FFmpeg initialization failed: {e}"))?;

            // SAFETY: av_log_set_level is thread-safe and only affects logging
            unsafe {
                ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
            }
            log::debug!("FFmpeg initialized");
            Ok(())
        })
        .clone()
        .map_err(VideoError::Other)
}

/// `FFmpeg`-based frame source implementing the [`FrameSource`] trait.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. The playback engine moves it onto
/// its run-loop thread and never shares it.
///
/// # Example
///
/// ```ignore
/// use ethowild::application::port::FrameSource;
/// use ethowild::infrastructure::ffmpeg::FfmpegFrameSource;
///
/// let mut source = FfmpegFrameSource::new();
/// let metadata = source.open(Path::new("video.mp4"))?;
///
/// while let Some(frame) = source.read_next()? {
///     println!("{:.3}s: {}x{}", frame.pts_secs(), frame.image().width(), frame.image().height());
/// }
/// source.release();
/// ```
pub struct FfmpegFrameSource {
    /// Decoder state, present between `open` and `release`.
    state: Option<DecoderState>,
    /// Timestamp of the last decoded frame, used when a frame has no PTS.
    last_pts_secs: f64,
}

/// Internal decoder state that holds the `FFmpeg` contexts.
struct DecoderState {
    /// Input format context.
    input_context: ffmpeg_next::format::context::Input,
    /// Video decoder.
    decoder: ffmpeg_next::decoder::Video,
    /// RGBA converter, reused across frames.
    scaler: ffmpeg_next::software::scaling::Context,
    /// Video stream index.
    video_stream_index: usize,
    /// Time base for PTS conversion.
    time_base_f64: f64,
    /// Nominal distance between frames in seconds.
    frame_interval_secs: f64,
    /// Whether the decoder has been told the packet stream ended.
    eof_sent: bool,
    /// Frames earlier than this (minus half a frame) are discarded.
    skip_until_secs: Option<f64>,
}

// SAFETY: DecoderState contains FFmpeg types with internal raw pointers.
// These are safe to send between threads because:
// 1. FFmpeg's decoder/format/scaling contexts are safe for single-threaded access per instance
// 2. We maintain exclusive access through Rust's ownership model
// 3. The state is only used from one thread at a time (move semantics)
unsafe impl Send for DecoderState {}

impl Default for FfmpegFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegFrameSource {
    /// Creates a new, unopened `FFmpeg` frame source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: None,
            last_pts_secs: 0.0,
        }
    }

    /// Returns true between a successful `open` and `release`.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Extracts RGBA data from a scaled frame, handling stride correctly.
    #[allow(clippy::cast_possible_truncation)] // stride is always < u32::MAX for video frames
    fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
        let width = frame.width();
        let height = frame.height();
        let data = frame.data(0);
        let stride = frame.stride(0);

        let mut rgba_bytes = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            let row_start = (y * stride as u32) as usize;
            let row_end = row_start + (width * 4) as usize;
            rgba_bytes.extend_from_slice(&data[row_start..row_end]);
        }

        rgba_bytes
    }
}

impl DecoderState {
    /// Pulls the next decoded picture, feeding packets as needed.
    fn next_decoded(&mut self) -> Result<Option<ffmpeg_next::frame::Video>, VideoError> {
        let mut decoded = ffmpeg_next::frame::Video::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return Ok(Some(decoded));
            }
            if self.eof_sent {
                return Ok(None);
            }

            let video_stream_index = self.video_stream_index;
            let packet = self
                .input_context
                .packets()
                .find(|(stream, _)| stream.index() == video_stream_index)
                .map(|(_, packet)| packet);

            match packet {
                Some(packet) => self
                    .decoder
                    .send_packet(&packet)
                    .map_err(|e| VideoError::DecodingFailed(format!("Packet send failed: {e}")))?,
                None => {
                    self.decoder
                        .send_eof()
                        .map_err(|e| VideoError::DecodingFailed(format!("Drain failed: {e}")))?;
                    self.eof_sent = true;
                }
            }
        }
    }

    /// Converts a decoded picture to RGBA.
    fn convert_frame(&mut self, decoded: &ffmpeg_next::frame::Video) -> Result<RawImage, VideoError> {
        let mut rgba_frame = ffmpeg_next::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgba_frame)
            .map_err(|e| VideoError::DecodingFailed(format!("Scaling failed: {e}")))?;

        let rgba_data = FfmpegFrameSource::extract_rgba_data(&rgba_frame);
        Ok(RawImage::from_rgba(
            rgba_frame.width(),
            rgba_frame.height(),
            rgba_data,
        ))
    }
}

impl FrameSource for FfmpegFrameSource {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, VideoError> {
        if !path.exists() {
            return Err(VideoError::FileNotFound(path.display().to_string()));
        }

        init_ffmpeg()?;

        let input_context = ffmpeg_next::format::input(path)
            .map_err(|e| VideoError::from_message(&e.to_string()))?;

        let video_stream = input_context
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(VideoError::NoVideoStream)?;
        let video_stream_index = video_stream.index();

        let duration_secs = if input_context.duration() > 0 {
            micros_to_pts(input_context.duration())
        } else {
            0.0
        };

        // Zero when the container does not know; the engine substitutes its default
        let rate = video_stream.avg_frame_rate();
        let fps = if rate.denominator() != 0 {
            f64::from(rate.numerator()) / f64::from(rate.denominator())
        } else {
            0.0
        };

        let context_decoder =
            ffmpeg_next::codec::context::Context::from_parameters(video_stream.parameters())
                .map_err(|e| VideoError::from_message(&format!("codec context: {e}")))?;
        let decoder = context_decoder
            .decoder()
            .video()
            .map_err(|e| VideoError::from_message(&format!("decoder: {e}")))?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(VideoError::UnsupportedCodec(format!(
                "invalid dimensions {width}x{height}"
            )));
        }

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| VideoError::Other(format!("Failed to create scaler: {e}")))?;

        let time_base = video_stream.time_base();
        let time_base_f64 = f64::from(time_base.numerator()) / f64::from(time_base.denominator());

        self.state = Some(DecoderState {
            input_context,
            decoder,
            scaler,
            video_stream_index,
            time_base_f64,
            frame_interval_secs: if fps > 0.0 {
                1.0 / fps
            } else {
                FALLBACK_FRAME_INTERVAL_SECS
            },
            eof_sent: false,
            skip_until_secs: None,
        });
        self.last_pts_secs = 0.0;

        log::debug!(
            "Opened {}: {width}x{height}, {duration_secs:.2}s @ {fps:.3} fps",
            path.display()
        );

        Ok(VideoMetadata::new(width, height, duration_secs, fps))
    }

    fn read_next(&mut self) -> Result<Option<Frame>, VideoError> {
        let state = self.state.as_mut().ok_or(VideoError::NotOpened)?;

        loop {
            let Some(decoded) = state.next_decoded()? else {
                return Ok(None);
            };

            #[allow(clippy::cast_precision_loss)]
            let pts_secs = decoded.timestamp().map_or(
                self.last_pts_secs + state.frame_interval_secs,
                |pts| pts as f64 * state.time_base_f64,
            );
            self.last_pts_secs = pts_secs;

            if let Some(target) = state.skip_until_secs {
                if pts_secs + state.frame_interval_secs / 2.0 < target {
                    continue;
                }
                state.skip_until_secs = None;
            }

            let image = state.convert_frame(&decoded)?;
            return Ok(Some(Frame::new(pts_secs, image)));
        }
    }

    fn seek(&mut self, target: Duration) -> Result<(), VideoError> {
        let state = self.state.as_mut().ok_or(VideoError::NotOpened)?;

        let target_secs = target.as_secs_f64();
        let timestamp = pts_to_micros(target_secs);

        // RangeTo lets FFmpeg land on the keyframe at or before the target
        state
            .input_context
            .seek(timestamp, ..timestamp)
            .map_err(|e| VideoError::DecodingFailed(format!("Seek failed: {e}")))?;

        state.decoder.flush();
        state.eof_sent = false;
        state.skip_until_secs = (target_secs > 0.0).then_some(target_secs);
        self.last_pts_secs = target_secs;
        Ok(())
    }

    fn release(&mut self) {
        if self.state.take().is_some() {
            log::debug!("FFmpeg frame source released");
        }
    }
}
