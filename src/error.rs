// SPDX-License-Identifier: MPL-2.0
use std::fmt;

pub use crate::domain::error::VideoError;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    Video(VideoError),
    /// Speed factor that is zero, negative or not finite.
    InvalidSpeed(f64),
    Export(String),
    /// A control command arrived after the run loop exited.
    EngineStopped,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Video(e) => write!(f, "Video Error: {}", e),
            Error::InvalidSpeed(speed) => {
                write!(f, "Invalid playback speed: {} (must be > 0)", speed)
            }
            Error::Export(e) => write!(f, "Export Error: {}", e),
            Error::EngineStopped => write!(f, "Playback engine has stopped"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Video(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VideoError> for Error {
    fn from(err: VideoError) -> Self {
        Error::Video(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
