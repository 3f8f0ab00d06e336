use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

use super::model::{SourceLocator, TrackEntry};

/// In-memory catalog of the currently loaded tracks.
///
/// The ordered sequence holds the active folder's tracks exactly as the
/// server listing exposed them; locally added tracks live next to it and are
/// appended to the visible list without joining the navigable order.
/// Identifiers are opaque byte sequences — no decoding or normalization is
/// applied at storage time.
#[derive(Default)]
pub struct Registry {
    folder: Option<String>,
    tracks: Vec<String>,
    local: Vec<LocalTrack>,
    uploads: Option<TempDir>,
}

struct LocalTrack {
    name: String,
    path: std::path::PathBuf,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active folder, when one has been loaded.
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Replace the active folder and its ordered sequence.
    ///
    /// Session copies of previously added local tracks are released along
    /// with the old sequence; their navigation indices are invalid anyway.
    pub fn replace_tracks(&mut self, folder: String, names: Vec<String>) {
        self.folder = Some(folder);
        self.tracks = names;
        self.local.clear();
        // Dropping the TempDir removes the session copies from disk.
        self.uploads = None;
    }

    /// Copy `source` into the session upload area and register it under
    /// `name`. Re-registering a name replaces the previous copy, and a local
    /// entry shadows any server track with the same identifier.
    pub fn register_local(&mut self, name: &str, source: &Path) -> io::Result<()> {
        if self.uploads.is_none() {
            self.uploads = Some(TempDir::with_prefix("vivace-uploads-")?);
        }
        let dir = match self.uploads.as_ref() {
            Some(dir) => dir,
            None => return Err(io::Error::other("upload directory unavailable")),
        };

        let dest = dir.path().join(copy_file_name(name));
        fs::copy(source, &dest)?;
        debug!(track = %name, copy = %dest.display(), "registered local track");

        if let Some(existing) = self.local.iter_mut().find(|t| t.name == name) {
            existing.path = dest;
        } else {
            self.local.push(LocalTrack {
                name: name.to_string(),
                path: dest,
            });
        }
        Ok(())
    }

    /// Resolve an identifier to something playable: the local copy when one
    /// is registered, otherwise a remote path composed from the active folder.
    pub fn resolve_source(&self, name: &str) -> Option<SourceLocator> {
        if let Some(track) = self.local.iter().find(|t| t.name == name) {
            return Some(SourceLocator::Local(track.path.clone()));
        }
        self.folder.as_ref().map(|folder| SourceLocator::Remote {
            folder: folder.clone(),
            name: name.to_string(),
        })
    }

    /// Position of `name` in the navigable server sequence.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t == name)
    }

    /// Identifier at `index` in the server sequence.
    pub fn track_at(&self, index: usize) -> Option<&str> {
        self.tracks.get(index).map(String::as_str)
    }

    /// The server sequence in listing order.
    pub fn sequence(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(String::as_str)
    }

    /// The visible track list: the server sequence in order, then local
    /// tracks in the order they were added.
    pub fn entries(&self) -> Vec<TrackEntry> {
        self.tracks
            .iter()
            .map(|name| TrackEntry {
                name: name.clone(),
                local: false,
            })
            .chain(self.local.iter().map(|t| TrackEntry {
                name: t.name.clone(),
                local: true,
            }))
            .collect()
    }

}

/// Upload names come from user-supplied paths; only the final component may
/// name the session copy.
fn copy_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload.mp3")
        .to_string()
}
