use std::path::Path;

use crate::audio::{AudioCmd, PlaybackHandle};
use crate::catalog::Album;
use crate::library::{Registry, TrackEntry};
use crate::search;

/// The playback state of the session: nothing loaded, playing, or loaded
/// but paused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Which pane has keyboard focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pane {
    Tracks,
    Albums,
}

/// Active input mode for the bottom input line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    AddTrack,
}

/// Volume restored when unmuting. The player does not remember the pre-mute
/// level; unmute always lands here.
pub const UNMUTE_VOLUME_PERCENT: u8 = 10;

/// The main session model.
pub struct App {
    pub registry: Registry,
    pub albums: Vec<Album>,

    pub selected: usize,
    pub album_selected: usize,
    pub focus: Pane,
    pub sidebar_open: bool,

    pub playback: PlaybackState,
    /// Identifier of the active track. Tracked directly — navigation never
    /// re-derives it from the resolved source.
    pub current: Option<String>,
    pub volume_percent: u8,
    /// Whether the mute indicator shows muted. Independent of the volume
    /// level: dragging the slider to zero does not flip it.
    pub muted: bool,

    pub input: InputMode,
    pub search_query: String,
    pub path_input: String,
    pub notice: Option<String>,

    pub playback_handle: Option<PlaybackHandle>,
}

impl App {
    pub fn new(volume_percent: u8, sidebar_open: bool) -> Self {
        Self {
            registry: Registry::new(),
            albums: Vec::new(),
            selected: 0,
            album_selected: 0,
            focus: Pane::Tracks,
            sidebar_open,
            playback: PlaybackState::Stopped,
            current: None,
            volume_percent: volume_percent.min(100),
            muted: false,
            input: InputMode::Normal,
            search_query: String::new(),
            path_input: String::new(),
            notice: None,
            playback_handle: None,
        }
    }

    /// Attach the handle used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// The rows currently visible in the track list.
    pub fn visible_tracks(&self) -> Vec<TrackEntry> {
        self.registry.entries()
    }

    /// Single entry point for changing the active track. Resolves the
    /// source, records the new identifier and hands the load to the audio
    /// thread (which resets the position to zero).
    pub fn select(&mut self, name: &str, autoplay: bool) -> Option<AudioCmd> {
        let source = self.registry.resolve_source(name)?;
        self.current = Some(name.to_string());
        self.playback = if autoplay {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        if let Some(pos) = self.visible_position(name) {
            self.selected = pos;
        }
        Some(AudioCmd::Load {
            name: name.to_string(),
            source,
            autoplay,
        })
    }

    fn visible_position(&self, name: &str) -> Option<usize> {
        self.registry.entries().iter().position(|e| e.name == name)
    }

    /// Playing ⇄ Paused; nothing happens with no track loaded.
    pub fn toggle_playback(&mut self) -> Option<AudioCmd> {
        match self.playback {
            PlaybackState::Stopped => None,
            PlaybackState::Playing => {
                self.playback = PlaybackState::Paused;
                Some(AudioCmd::TogglePause)
            }
            PlaybackState::Paused => {
                self.playback = PlaybackState::Playing;
                Some(AudioCmd::TogglePause)
            }
        }
    }

    /// Advance to the next track in the server sequence. A strict no-op at
    /// the end of the sequence, and for tracks outside it (local uploads).
    pub fn next(&mut self) -> Option<AudioCmd> {
        let current = self.current.clone()?;
        let index = self.registry.index_of(&current)?;
        let name = self.registry.track_at(index + 1)?.to_string();
        self.select(&name, true)
    }

    /// Step back to the previous track; no-op at index zero and for tracks
    /// outside the sequence.
    pub fn previous(&mut self) -> Option<AudioCmd> {
        let current = self.current.clone()?;
        let index = self.registry.index_of(&current)?;
        let name = self.registry.track_at(index.checked_sub(1)?)?.to_string();
        self.select(&name, true)
    }

    /// Unload the active track.
    pub fn stop(&mut self) -> AudioCmd {
        self.current = None;
        self.playback = PlaybackState::Stopped;
        AudioCmd::Stop
    }

    pub fn set_volume_percent(&mut self, percent: u8) -> AudioCmd {
        let percent = percent.min(100);
        self.volume_percent = percent;
        if percent > 0 {
            // Any audible level flips the indicator back to unmuted.
            self.muted = false;
        }
        AudioCmd::SetVolume(f32::from(percent) / 100.0)
    }

    /// Mute toggles on the indicator state, not the level: an unmuted icon
    /// forces volume to zero (remembering nothing), a muted icon restores
    /// the fixed unmute level.
    pub fn toggle_mute(&mut self) -> AudioCmd {
        if self.muted {
            self.muted = false;
            self.volume_percent = UNMUTE_VOLUME_PERCENT;
        } else {
            self.muted = true;
            self.volume_percent = 0;
        }
        AudioCmd::SetVolume(f32::from(self.volume_percent) / 100.0)
    }

    /// Seek to an absolute fraction of the active track. Only valid while
    /// the duration is known and non-zero; the caller clamps `fraction`.
    pub fn seek_to_fraction(&self, fraction: f64) -> Option<AudioCmd> {
        let info = self.playback_handle.as_ref()?.lock().ok()?;
        let duration = info.duration?;
        if duration.is_zero() {
            return None;
        }
        Some(AudioCmd::SeekTo(duration.mul_f64(fraction)))
    }

    /// Re-resolve the search query against the server sequence and play the
    /// first match; no match surfaces a notice instead.
    pub fn search_changed(&mut self) -> Option<AudioCmd> {
        let found = search::find_match(&self.search_query, self.registry.sequence())
            .map(str::to_string);
        match found {
            Some(name) => {
                self.notice = None;
                self.select(&name, true)
            }
            None => {
                self.notice = Some("Song not found in the playlist.".to_string());
                None
            }
        }
    }

    pub fn push_search_char(&mut self, c: char) -> Option<AudioCmd> {
        self.search_query.push(c);
        self.search_changed()
    }

    pub fn pop_search_char(&mut self) -> Option<AudioCmd> {
        if self.search_query.pop().is_some() {
            self.search_changed()
        } else {
            None
        }
    }

    /// Register a local MP3 and append it to the visible list. The new row
    /// is selected but not played; activating it goes through `select` like
    /// every other row.
    pub fn add_local_track(&mut self, path: &Path) -> bool {
        if !is_mp3(path) {
            self.notice = Some("Only MP3 files are allowed.".to_string());
            return false;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()).map(str::to_string) else {
            self.notice = Some("Not a usable file path.".to_string());
            return false;
        };
        match self.registry.register_local(&name, path) {
            Ok(()) => {
                if let Some(pos) = self.visible_position(&name) {
                    self.selected = pos;
                }
                self.focus = Pane::Tracks;
                self.notice = None;
                true
            }
            Err(err) => {
                self.notice = Some(format!("Could not add {name}: {err}"));
                false
            }
        }
    }

    /// Apply a finished folder load: replace the sequence, reset the cursor
    /// and hand the first track to the player (paused on the startup load,
    /// playing when an album card triggered it). An empty folder just
    /// empties the list.
    pub fn apply_folder_loaded(
        &mut self,
        folder: String,
        tracks: Vec<String>,
        autoplay: bool,
    ) -> Option<AudioCmd> {
        self.registry.replace_tracks(folder, tracks);
        self.selected = 0;
        self.notice = None;
        let first = self.registry.track_at(0)?.to_string();
        self.select(&first, autoplay)
    }

    pub fn apply_albums_loaded(&mut self, albums: Vec<Album>) {
        self.albums = albums;
        self.album_selected = 0;
    }

    /// The album whose folder matches the active one, if the catalog knows it.
    pub fn active_album(&self) -> Option<&Album> {
        let folder = self.registry.folder()?;
        let leaf = folder.trim_end_matches('/').rsplit('/').next()?;
        self.albums.iter().find(|a| a.folder == leaf)
    }

    /// Play whatever row the cursor is on in the tracks pane.
    pub fn activate_selected(&mut self) -> Option<AudioCmd> {
        let entry = self.registry.entries().into_iter().nth(self.selected)?;
        self.select(&entry.name, true)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Tracks => Pane::Albums,
            Pane::Albums => Pane::Tracks,
        };
    }

    pub fn open_sidebar(&mut self) {
        self.sidebar_open = true;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
        if self.focus == Pane::Tracks {
            self.focus = Pane::Albums;
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Pane::Tracks => {
                let len = self.registry.entries().len();
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            Pane::Albums => {
                if !self.albums.is_empty() && self.album_selected + 1 < self.albums.len() {
                    self.album_selected += 1;
                }
            }
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Pane::Tracks => self.selected = self.selected.saturating_sub(1),
            Pane::Albums => self.album_selected = self.album_selected.saturating_sub(1),
        }
    }

    pub fn enter_search(&mut self) {
        self.input = InputMode::Search;
        self.search_query.clear();
    }

    pub fn enter_add_track(&mut self) {
        self.input = InputMode::AddTrack;
        self.path_input.clear();
    }

    pub fn leave_input(&mut self) {
        self.input = InputMode::Normal;
    }
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}
