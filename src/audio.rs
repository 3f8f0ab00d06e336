//! Audio playback subsystem.
//!
//! A dedicated thread owns the rodio output stream and executes
//! `AudioCmd`s; the rest of the program observes playback through the
//! shared `PlaybackHandle`.

mod player;
mod source;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, PlaybackError, PlaybackHandle, PlaybackInfo};
