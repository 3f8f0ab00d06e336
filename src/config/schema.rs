use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vivace/config.toml` or `~/.config/vivace/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VIVACE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            playback: PlaybackSettings::default(),
            ui: UiSettings::default(),
            library: LibrarySettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the music server. The first CLI argument overrides it.
    pub base_url: String,
    /// Directory under the base URL holding one sub-folder per album.
    pub songs_dir: String,
    /// Folder loaded at startup (its first track is handed to the player
    /// paused).
    pub default_folder: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            songs_dir: "songs".to_string(),
            default_folder: "songs/ncs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume as an integer percentage (0–100).
    pub volume_percent: u8,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume_percent: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the track sidebar starts open.
    pub sidebar_open: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ vivace: press play ~ ".to_string(),
            sidebar_open: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions recognized as playable entries in directory listings
    /// (case-insensitive, with or without the dot).
    pub extensions: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
        }
    }
}
