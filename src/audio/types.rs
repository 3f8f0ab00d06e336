//! Audio-side types: commands, playback info and shared handles.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::library::SourceLocator;

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Load a track into a fresh sink; start playing it when `autoplay`.
    Load {
        name: String,
        source: SourceLocator,
        autoplay: bool,
    },
    /// Toggle pause/resume for the loaded track.
    TogglePause,
    /// Jump to an absolute position inside the loaded track.
    SeekTo(Duration),
    /// Set the playback volume (0.0 ..= 1.0).
    SetVolume(f32),
    /// Unload the current track.
    Stop,
    /// Shut the audio thread down.
    Quit,
}

/// Why a track could not be turned into audible output.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("reading {path} failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding {name} failed: {source}")]
    Decode {
        name: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Identifier of the active track, if any.
    pub current: Option<String>,
    /// Elapsed playback time for the active track.
    pub elapsed: Duration,
    /// Total track duration, when its metadata exposes one.
    pub duration: Option<Duration>,
    /// Whether audio is actually playing right now.
    pub playing: bool,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
