use serde::Deserialize;

/// Display metadata for one album folder, as served by its `info.json`.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct AlbumInfo {
    pub(crate) title: String,
    pub(crate) description: String,
}

/// One album card: a folder under the songs directory plus display metadata.
///
/// The core treats this as an opaque display record; playback only ever uses
/// `folder` to scope a track load. `cover` is referenced, never fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Album {
    pub folder: String,
    pub title: String,
    pub description: String,
    pub cover: String,
}
