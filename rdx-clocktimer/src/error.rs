//! Error types for timer, alert and configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by timer transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// A fresh start was requested with a total duration of zero seconds.
    #[error("timer duration must be greater than zero")]
    InvalidDuration,
}

/// Errors raised while playing the completion sound.
///
/// These never leave the alert boundary; they are logged and dropped.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("alert sound asset {path} is missing")]
    MissingAsset { path: PathBuf },

    #[error("failed to open alert sound {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode alert sound {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device available")]
    NoOutputDevice {
        #[source]
        source: rodio::StreamError,
    },

    #[error("audio output rejected the alert sound")]
    Output {
        #[source]
        source: rodio::PlayError,
    },

    #[error("terminal bell failed")]
    Bell {
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load {
        #[source]
        source: config::ConfigError,
    },

    #[error("invalid configuration: {reason}")]
    Invalid { reason: String },
}
