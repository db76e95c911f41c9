//! Audio Sink
//!
//! Fire-and-forget playback of the kiosk's two sounds. A dedicated
//! thread owns the rodio output stream (which is not `Send`), fed
//! through a std mpsc channel; sound files are preloaded into memory at
//! startup so playback never touches the filesystem. Every failure along
//! the way (missing device, missing file, decode error) is logged and
//! swallowed: the presentation continues without sound.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::mpsc::{self, Sender};
use std::thread;

use rodio::{Decoder, OutputStream, Sink};
use tracing::{debug, info, warn};

use telop_core::config::AudioConfig;
use telop_core::SoundId;

/// Handle for requesting playback from any task.
#[derive(Clone)]
pub struct AudioPlayer {
    tx: Option<Sender<SoundId>>,
}

impl AudioPlayer {
    /// Spawn the playback thread and preload the configured sounds.
    ///
    /// With audio disabled (or no sounds configured) this returns an
    /// inert player whose [`play`](Self::play) is a no-op.
    #[must_use]
    pub fn new(config: &AudioConfig) -> Self {
        if !config.enabled {
            info!("Audio disabled by configuration");
            return Self { tx: None };
        }

        let mut sounds: HashMap<SoundId, Vec<u8>> = HashMap::new();
        let configured = [
            (SoundId::Chime, config.chime_path.as_ref()),
            (SoundId::Alarm, config.alarm_path.as_ref()),
        ];
        for (sound, path) in configured {
            let Some(path) = path else {
                debug!(sound = %sound, "No sound file configured");
                continue;
            };
            match std::fs::read(path) {
                Ok(bytes) => {
                    info!(sound = %sound, path = %path.display(), bytes = bytes.len(), "Preloaded sound");
                    sounds.insert(sound, bytes);
                }
                Err(err) => {
                    warn!(sound = %sound, path = %path.display(), error = %err, "Failed to preload sound");
                }
            }
        }
        if sounds.is_empty() {
            info!("No sounds loaded; audio inert");
            return Self { tx: None };
        }

        let (tx, rx) = mpsc::channel::<SoundId>();
        thread::spawn(move || {
            let mut output = OutputStream::try_default().ok();
            if output.is_none() {
                warn!("Audio output unavailable; sounds disabled until a device appears");
            }
            let mut active_sinks: Vec<Sink> = Vec::new();

            while let Ok(sound) = rx.recv() {
                active_sinks.retain(|sink| !sink.empty());

                let Some(bytes) = sounds.get(&sound) else {
                    debug!(sound = %sound, "Sound not loaded, skipping");
                    continue;
                };

                // Retry the device lazily; it may have appeared since.
                if output.is_none() {
                    output = OutputStream::try_default().ok();
                    if output.is_none() {
                        continue;
                    }
                }
                let Some((_, handle)) = output.as_ref() else {
                    continue;
                };

                let decoder = match Decoder::new(Cursor::new(bytes.clone())) {
                    Ok(decoder) => decoder,
                    Err(err) => {
                        warn!(sound = %sound, error = %err, "Failed decoding sound");
                        continue;
                    }
                };
                match Sink::try_new(handle) {
                    Ok(sink) => {
                        sink.append(decoder);
                        active_sinks.push(sink);
                    }
                    Err(err) => {
                        warn!(sound = %sound, error = %err, "Failed to create audio sink");
                        output = None;
                    }
                }
            }
        });
        Self { tx: Some(tx) }
    }

    /// Request playback. Never blocks, never fails visibly.
    pub fn play(&self, sound: SoundId) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(sound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_audio_is_inert() {
        let config = AudioConfig {
            enabled: false,
            chime_path: None,
            alarm_path: None,
        };
        let player = AudioPlayer::new(&config);
        // No thread, no channel; play is a no-op.
        player.play(SoundId::Chime);
        player.play(SoundId::Alarm);
    }

    #[test]
    fn missing_sound_files_leave_the_player_inert() {
        let config = AudioConfig {
            enabled: true,
            chime_path: Some("/nonexistent/chime.wav".into()),
            alarm_path: None,
        };
        let player = AudioPlayer::new(&config);
        player.play(SoundId::Chime);
    }
}
