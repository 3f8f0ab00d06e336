use std::path::PathBuf;

/// Where a track's audio actually comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceLocator {
    /// A file served under the active folder on the music server.
    Remote { folder: String, name: String },
    /// A session-owned copy of a file the user added from disk.
    Local(PathBuf),
}

/// One row of the visible track list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackEntry {
    /// The track identifier, exactly as the server (or the file name) spells it.
    pub name: String,
    /// Whether this row is a locally added track.
    pub local: bool,
}
