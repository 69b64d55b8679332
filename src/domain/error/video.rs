// SPDX-License-Identifier: MPL-2.0
//! Video source error classification.

use std::fmt;

/// Why a video source could not be opened or decoded.
///
/// Only failures raised while opening a source ever reach the consumer; a
/// decode failure in the middle of a stream is folded into end-of-stream
/// by the run loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    /// The file does not exist or cannot be read.
    FileNotFound(String),

    /// Container format is not recognised.
    UnsupportedFormat,

    /// Video codec is not supported by the system's `FFmpeg`.
    UnsupportedCodec(String),

    /// File appears corrupted or has invalid data.
    CorruptedFile,

    /// File exists but contains no video stream.
    NoVideoStream,

    /// Decoding or repositioning failed.
    DecodingFailed(String),

    /// An operation was attempted before `open` succeeded.
    NotOpened,

    /// Generic error with raw message.
    Other(String),
}

impl VideoError {
    /// Attempts to parse a raw decoder-library message into a specific
    /// `VideoError` kind.
    #[must_use]
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Codec/decoder errors first (they might contain "not found")
        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return VideoError::UnsupportedCodec(codec);
            } else if msg_lower.contains("not found") || msg_lower.contains("unsupported") {
                return VideoError::DecodingFailed(msg.to_string());
            }
        }

        if msg_lower.contains("no such file")
            || (msg_lower.contains("not found") && !msg_lower.contains("decoder"))
            || msg_lower.contains("permission denied")
            || msg_lower.contains("i/o error")
        {
            return VideoError::FileNotFound(msg.to_string());
        }

        if msg_lower.contains("no video stream") || msg_lower.contains("no video track") {
            return VideoError::NoVideoStream;
        }

        if msg_lower.contains("invalid data found") || msg_lower.contains("unknown format") {
            return VideoError::UnsupportedFormat;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
        {
            return VideoError::CorruptedFile;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("scaling")
            || msg_lower.contains("seek")
            || msg_lower.contains("decode")
        {
            return VideoError::DecodingFailed(msg.to_string());
        }

        VideoError::Other(msg.to_string())
    }

    /// Tries to extract a codec name from an error message.
    fn extract_codec_name(msg: &str) -> Option<String> {
        // Common patterns: "codec 'xyz' not found", "decoder xyz not found"
        let codecs = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2",
        ];
        codecs
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::FileNotFound(msg) => write!(f, "Video file not found: {msg}"),
            VideoError::UnsupportedFormat => write!(f, "Unsupported video format"),
            VideoError::UnsupportedCodec(codec) => write!(f, "Unsupported video codec: {codec}"),
            VideoError::CorruptedFile => write!(f, "Video file is corrupted"),
            VideoError::NoVideoStream => write!(f, "No video stream found"),
            VideoError::DecodingFailed(msg) => write!(f, "Decoding failed: {msg}"),
            VideoError::NotOpened => write!(f, "Video source is not open"),
            VideoError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_message_detects_missing_file() {
        let err = VideoError::from_message("No such file or directory");
        assert!(matches!(err, VideoError::FileNotFound(_)));
    }

    #[test]
    fn from_message_detects_missing_stream() {
        let err = VideoError::from_message("No video stream found in file");
        assert_eq!(err, VideoError::NoVideoStream);
    }

    #[test]
    fn from_message_extracts_codec() {
        let err = VideoError::from_message("Decoder h264 not found");
        assert!(matches!(err, VideoError::UnsupportedCodec(codec) if codec == "H264"));
    }

    #[test]
    fn from_message_detects_unknown_container() {
        let err = VideoError::from_message("Invalid data found when processing input");
        assert_eq!(err, VideoError::UnsupportedFormat);
    }

    #[test]
    fn from_message_detects_corruption() {
        let err = VideoError::from_message("File is corrupt or malformed");
        assert_eq!(err, VideoError::CorruptedFile);
    }

    #[test]
    fn from_message_falls_back_to_other() {
        let err = VideoError::from_message("something odd");
        assert_eq!(err, VideoError::Other("something odd".to_string()));
    }

    #[test]
    fn display_includes_detail() {
        let err = VideoError::UnsupportedCodec("VP9".to_string());
        assert!(err.to_string().contains("VP9"));
        assert_eq!(VideoError::NotOpened.to_string(), "Video source is not open");
    }
}
