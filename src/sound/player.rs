//! Sound player implementation using rodio.
//!
//! rodio's output stream must stay on the thread that created it, so the
//! player owns a dedicated audio thread and sends it requests over a
//! crossbeam channel. Files are read and decoded on that thread too, so
//! `play` never touches the disk. The player itself is `Send + Sync` and can
//! be called from the tick task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Sender};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{chime, load_file, BoxedSource, SoundSource};

/// Work for the audio thread, handled strictly in order.
enum AudioRequest {
    /// Play one alert to the end.
    Play { source: SoundSource, volume: f32 },
    /// Answer once every earlier alert has finished.
    Flush(Sender<()>),
}

/// A sound player that uses rodio for audio playback.
///
/// `play` returns immediately; the alert plays on the audio thread.
/// [`RodioSoundPlayer::wait_idle`] blocks until queued alerts are done.
pub struct RodioSoundPlayer {
    request_tx: Sender<AudioRequest>,
    volume: f32,
    disabled: AtomicBool,
}

impl RodioSoundPlayer {
    /// Creates a new sound player and its audio thread.
    ///
    /// # Arguments
    ///
    /// * `volume` - Linear gain applied to every alert (1.0 = unchanged).
    /// * `disabled` - If true, all sound playback will be silently skipped.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(volume: f32, disabled: bool) -> Result<Self, SoundError> {
        let request_tx = spawn_audio_thread()?;
        debug!(volume, "Audio output stream initialized");

        Ok(Self {
            request_tx,
            volume,
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Queues a sound from the given source.
    ///
    /// If a file source cannot be read or decoded, the built-in chime is
    /// played instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio thread has stopped.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Sound playback disabled, skipping");
            return Ok(());
        }

        debug!("Playing sound: {}", source.name());
        self.request_tx
            .send(AudioRequest::Play {
                source: source.clone(),
                volume: self.volume,
            })
            .map_err(|_| SoundError::PlaybackError("audio thread stopped".to_string()))
    }

    /// Blocks until every queued alert has finished playing.
    ///
    /// Returns false if playback was still going when `timeout` elapsed.
    /// A stopped audio thread has nothing left to play and counts as idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let (done_tx, done_rx) = bounded(1);
        if self.request_tx.send(AudioRequest::Flush(done_tx)).is_err() {
            return true;
        }
        done_rx.recv_timeout(timeout).is_ok()
    }

    /// Returns true if sound playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Enables sound playback.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    /// Disables sound playback.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("volume", &self.volume)
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Starts the audio thread and waits until its output stream is open.
fn spawn_audio_thread() -> Result<Sender<AudioRequest>, SoundError> {
    let (request_tx, request_rx) = unbounded::<AudioRequest>();
    let (ready_tx, ready_rx) = bounded::<Result<(), String>>(1);

    thread::Builder::new()
        .name("pomodorik-audio".to_string())
        .spawn(move || {
            let (_stream, stream_handle) = match OutputStream::try_default() {
                Ok(pair) => {
                    let _ = ready_tx.send(Ok(()));
                    pair
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };

            for request in request_rx {
                match request {
                    AudioRequest::Play { source, volume } => {
                        play_to_end(&stream_handle, &source, volume);
                    }
                    AudioRequest::Flush(done_tx) => {
                        let _ = done_tx.send(());
                    }
                }
            }
            debug!("Audio thread exiting");
        })
        .map_err(|e| SoundError::StreamError(e.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(request_tx),
        Ok(Err(message)) => Err(SoundError::DeviceNotAvailable(message)),
        Err(_) => Err(SoundError::DeviceNotAvailable(
            "audio thread exited during startup".to_string(),
        )),
    }
}

/// Decodes `source` and plays it on a fresh sink, blocking until it ends.
fn play_to_end(stream_handle: &OutputStreamHandle, source: &SoundSource, volume: f32) {
    let sink = match Sink::try_new(stream_handle) {
        Ok(sink) => sink,
        Err(e) => {
            warn!("Failed to create audio sink: {}", e);
            return;
        }
    };
    sink.set_volume(volume);
    for decoded in resolve(source) {
        sink.append(decoded);
    }
    sink.sleep_until_end();
}

/// Loads the sources for one alert, falling back to the chime.
fn resolve(source: &SoundSource) -> Vec<BoxedSource> {
    match source {
        SoundSource::File { path } => match load_file(path) {
            Ok(decoded) => vec![decoded],
            Err(e) if !e.should_fallback_to_chime() => {
                warn!("Skipping sound '{}': {}", source.name(), e);
                Vec::new()
            }
            Err(e) => {
                warn!(
                    "Failed to load sound '{}': {}, falling back to chime",
                    source.name(),
                    e
                );
                chime()
            }
        },
        SoundSource::Chime => chime(),
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(volume: f32) -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new(volume, false) {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
