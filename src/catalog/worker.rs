use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::thread;

use tracing::{info, warn};

use super::client;
use super::model::Album;

/// Work the UI loop hands to the catalog thread.
#[derive(Debug)]
pub enum CatalogCmd {
    /// Fetch a folder's listing and replace the track list with it.
    /// `autoplay` carries the intent of the trigger (an album card press
    /// auto-plays the first track; the startup load does not).
    LoadFolder { folder: String, autoplay: bool },
    /// Fetch the album catalog (top-level listing plus per-album metadata).
    LoadAlbums,
}

/// Results flowing back to the UI loop. Each event is applied atomically by
/// the receiver; completion order follows request order because the worker
/// is a single thread.
#[derive(Debug)]
pub enum CatalogEvent {
    FolderLoaded {
        folder: String,
        tracks: Vec<String>,
        autoplay: bool,
    },
    FolderFailed {
        folder: String,
        error: String,
    },
    AlbumsLoaded(Vec<Album>),
    AlbumsFailed {
        error: String,
    },
}

/// Sending half of the catalog worker's command channel.
pub struct CatalogHandle {
    tx: Sender<CatalogCmd>,
}

impl CatalogHandle {
    pub fn send(&self, cmd: CatalogCmd) -> Result<(), SendError<CatalogCmd>> {
        self.tx.send(cmd)
    }
}

/// Spawn the worker thread that owns the HTTP agent. The thread exits when
/// either channel end is dropped.
pub fn spawn_catalog_worker(
    base_url: String,
    songs_dir: String,
    extensions: Vec<String>,
) -> (CatalogHandle, Receiver<CatalogEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<CatalogCmd>();
    let (event_tx, event_rx) = mpsc::channel::<CatalogEvent>();

    thread::spawn(move || {
        let agent = ureq::Agent::new_with_defaults();

        while let Ok(cmd) = cmd_rx.recv() {
            let event = match cmd {
                CatalogCmd::LoadFolder { folder, autoplay } => {
                    match client::fetch_folder_tracks(&agent, &base_url, &folder, &extensions) {
                        Ok(tracks) => {
                            info!(%folder, count = tracks.len(), "folder listing loaded");
                            CatalogEvent::FolderLoaded {
                                folder,
                                tracks,
                                autoplay,
                            }
                        }
                        Err(err) => {
                            warn!(%folder, error = %err, "folder listing failed");
                            CatalogEvent::FolderFailed {
                                folder,
                                error: err.to_string(),
                            }
                        }
                    }
                }
                CatalogCmd::LoadAlbums => {
                    match client::fetch_album_catalog(&agent, &base_url, &songs_dir) {
                        Ok(albums) => CatalogEvent::AlbumsLoaded(albums),
                        Err(err) => {
                            warn!(error = %err, "album catalog failed");
                            CatalogEvent::AlbumsFailed {
                                error: err.to_string(),
                            }
                        }
                    }
                }
            };

            if event_tx.send(event).is_err() {
                break;
            }
        }
    });

    (CatalogHandle { tx: cmd_tx }, event_rx)
}
