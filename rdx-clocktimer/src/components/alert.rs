//! Completion side effects: the alert sound and the completion notice.
//!
//! Both sinks sit behind traits so the presentation layer can swap them. The
//! sound is best effort: it plays on its own thread and a `PlaybackError` is
//! logged there and never travels further.

use crate::config::AlertConfig;
use crate::error::PlaybackError;
use crate::events::{CompletionNotice, TimerEvent};
use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Plays the fixed alert sound. Implementations may block until playback ends.
pub trait AlertSound: Send + Sync {
    fn play(&self) -> Result<(), PlaybackError>;
}

/// Receives the "timer complete" notice.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &CompletionNotice);
}

/// Decodes the configured asset and plays it on the default output device.
///
/// When the host has no output device the terminal bell is rung instead.
pub struct AssetSound {
    path: PathBuf,
    volume: u8,
}

impl AssetSound {
    pub fn new(path: impl Into<PathBuf>, volume: u8) -> Self {
        Self {
            path: path.into(),
            volume: volume.min(100),
        }
    }

    fn decode(&self) -> Result<Decoder<BufReader<File>>, PlaybackError> {
        if !self.path.is_file() {
            return Err(PlaybackError::MissingAsset {
                path: self.path.clone(),
            });
        }
        let file = File::open(&self.path).map_err(|source| PlaybackError::Open {
            path: self.path.clone(),
            source,
        })?;
        Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

impl AlertSound for AssetSound {
    fn play(&self) -> Result<(), PlaybackError> {
        let source = self.decode()?;

        // The stream must outlive the sink, so it stays bound until the end.
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(output) => output,
            Err(source) => {
                let e = PlaybackError::NoOutputDevice { source };
                warn!(error = %e, "Falling back to the terminal bell.");
                return ring_bell();
            }
        };
        let sink = Sink::try_new(&handle).map_err(|source| PlaybackError::Output { source })?;
        sink.set_volume(f32::from(self.volume) / 100.0);
        sink.append(source);
        debug!(path = %self.path.display(), "Playing alert sound.");
        sink.sleep_until_end();
        Ok(())
    }
}

fn ring_bell() -> Result<(), PlaybackError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(b"\x07")
        .and_then(|_| stdout.flush())
        .map_err(|source| PlaybackError::Bell { source })
}

/// Used when sound is disabled in the configuration.
pub struct Muted;

impl AlertSound for Muted {
    fn play(&self) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// Publishes notices on the engine's timer event stream.
pub struct ChannelNotifier {
    sender: broadcast::Sender<TimerEvent>,
}

impl ChannelNotifier {
    pub fn new(sender: broadcast::Sender<TimerEvent>) -> Self {
        Self { sender }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: &CompletionNotice) {
        info!(title = %notice.title, "{}", notice.message);
        self.sender.send(TimerEvent::Notice(notice.clone())).ok();
    }
}

/// The completion side effect, fired by the engine exactly once per countdown.
pub struct CompletionAlert {
    sound: Arc<dyn AlertSound>,
    notifier: Box<dyn Notifier>,
    notice: CompletionNotice,
}

impl CompletionAlert {
    pub fn new(
        sound: Arc<dyn AlertSound>,
        notifier: Box<dyn Notifier>,
        notice: CompletionNotice,
    ) -> Self {
        Self {
            sound,
            notifier,
            notice,
        }
    }

    /// Builds the default alert from configuration.
    pub fn from_config(config: &AlertConfig, sender: broadcast::Sender<TimerEvent>) -> Self {
        let sound: Arc<dyn AlertSound> = if config.sound_enabled {
            Arc::new(AssetSound::new(config.sound_path.clone(), config.volume))
        } else {
            Arc::new(Muted)
        };
        Self::new(
            sound,
            Box::new(ChannelNotifier::new(sender)),
            CompletionNotice {
                title: config.title.clone(),
                message: config.message.clone(),
            },
        )
    }

    /// Starts the sound on its own thread, then raises the notice.
    ///
    /// Returns the playback thread; callers are free to drop it.
    pub fn fire(&self) -> JoinHandle<()> {
        let sound = Arc::clone(&self.sound);
        let playback = std::thread::spawn(move || {
            if let Err(e) = sound.play() {
                warn!(error = %e, "Error playing alert sound.");
            }
        });
        self.notifier.notify(&self.notice);
        playback
    }
}
