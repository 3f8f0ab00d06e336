//! Blocking HTTP against the music server.
//!
//! Runs on the catalog worker thread (and in tests); the UI loop never
//! calls into here directly.

use thiserror::Error;
use tracing::warn;

use super::listing;
use super::model::{Album, AlbumInfo};

/// A listing or metadata request that could not be completed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("could not decode {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Fetch a folder's listing and extract its track identifiers, in listing
/// order. An empty folder is not an error.
pub(super) fn fetch_folder_tracks(
    agent: &ureq::Agent,
    base: &str,
    folder: &str,
    extensions: &[String],
) -> Result<Vec<String>, FetchError> {
    let url = listing_url(base, folder);
    let html = fetch_text(agent, &url)?;
    Ok(listing::track_names(&html, folder, extensions))
}

/// Fetch the top-level songs listing and each album's `info.json`.
///
/// A failure for one album's metadata is isolated: it is logged, the album
/// is skipped and the rest of the catalog still loads, preserving listing
/// order. Only the top-level listing failure aborts the whole load.
pub(super) fn fetch_album_catalog(
    agent: &ureq::Agent,
    base: &str,
    songs_dir: &str,
) -> Result<Vec<Album>, FetchError> {
    let url = listing_url(base, songs_dir);
    let html = fetch_text(agent, &url)?;

    let mut albums = Vec::new();
    for folder in listing::folder_names(&html, songs_dir) {
        match fetch_album_info(agent, base, songs_dir, &folder) {
            Ok(info) => albums.push(Album {
                cover: format!(
                    "{}/{}/{}/cover.jpg",
                    base.trim_end_matches('/'),
                    songs_dir.trim_matches('/'),
                    folder
                ),
                folder,
                title: info.title,
                description: info.description,
            }),
            Err(err) => {
                warn!(album = %folder, error = %err, "skipping album with unreadable metadata");
            }
        }
    }
    Ok(albums)
}

fn fetch_album_info(
    agent: &ureq::Agent,
    base: &str,
    songs_dir: &str,
    folder: &str,
) -> Result<AlbumInfo, FetchError> {
    let url = format!(
        "{}/{}/{}/info.json",
        base.trim_end_matches('/'),
        songs_dir.trim_matches('/'),
        folder
    );
    let body = fetch_text(agent, &url)?;
    serde_json::from_str(&body).map_err(|err| FetchError::Decode {
        url,
        reason: err.to_string(),
    })
}

fn listing_url(base: &str, dir: &str) -> String {
    format!("{}/{}/", base.trim_end_matches('/'), dir.trim_matches('/'))
}

fn fetch_text(agent: &ureq::Agent, url: &str) -> Result<String, FetchError> {
    let mut resp = agent.get(url).call().map_err(|source| FetchError::Http {
        url: url.to_string(),
        source: Box::new(source),
    })?;
    resp.body_mut()
        .read_to_string()
        .map_err(|source| FetchError::Http {
            url: url.to_string(),
            source: Box::new(source),
        })
}
