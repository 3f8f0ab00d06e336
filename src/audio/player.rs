use std::sync::mpsc::{self, SendError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Handle to the audio thread. All playback mutations go through `send`;
/// the shared `PlaybackHandle` is the read side.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(base_url: String, initial_volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle =
            spawn_audio_thread(base_url, rx, playback_info.clone(), initial_volume);

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn quit(&self) {
        let _ = self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
