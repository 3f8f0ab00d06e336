//! Turning a `SourceLocator` into decodable bytes and `rodio` sinks.
//!
//! Remote tracks are fetched whole into memory (the seek primitive
//! re-decodes from the start, so the bytes must outlive any single sink);
//! local tracks read their session copy the same way.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::library::SourceLocator;

use super::types::PlaybackError;

/// Refuse to buffer tracks beyond this size.
const MAX_TRACK_BYTES: u64 = 256 * 1024 * 1024;

/// In-memory audio bytes, cheap to clone across sink rebuilds.
#[derive(Clone)]
pub(super) struct TrackBytes(Arc<Vec<u8>>);

impl TrackBytes {
    pub(super) fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }
}

impl AsRef<[u8]> for TrackBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Fetch or read the raw bytes behind `source`.
pub(super) fn load_bytes(
    agent: &ureq::Agent,
    base_url: &str,
    source: &SourceLocator,
) -> Result<TrackBytes, PlaybackError> {
    let bytes = match source {
        SourceLocator::Remote { folder, name } => {
            let url = format!(
                "{}/{}/{}",
                base_url.trim_end_matches('/'),
                folder.trim_matches('/'),
                name
            );
            let mut resp = agent.get(&url).call().map_err(|err| PlaybackError::Fetch {
                url: url.clone(),
                source: Box::new(err),
            })?;
            resp.body_mut()
                .with_config()
                .limit(MAX_TRACK_BYTES)
                .read_to_vec()
                .map_err(|err| PlaybackError::Fetch {
                    url,
                    source: Box::new(err),
                })?
        }
        SourceLocator::Local(path) => {
            std::fs::read(path).map_err(|err| PlaybackError::Read {
                path: path.clone(),
                source: err,
            })?
        }
    };
    Ok(TrackBytes::new(bytes))
}

/// Probe the track's duration from its metadata, if it carries any.
///
/// Tracks without usable length metadata stay at an unknown duration; the
/// UI renders the zeroed time display and seeking is disabled for them.
pub(super) fn probe_duration(bytes: &TrackBytes) -> Option<Duration> {
    let probe = Probe::new(Cursor::new(bytes.clone())).guess_file_type().ok()?;
    let tagged = probe.read().ok()?;
    Some(tagged.properties().duration())
}

/// Create a paused `Sink` that starts playback at `start_at`.
/// `skip_duration` is the seek primitive; even `Duration::ZERO` is fine.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &TrackBytes,
    name: &str,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, PlaybackError> {
    let source = Decoder::new(Cursor::new(bytes.clone()))
        .map_err(|err| PlaybackError::Decode {
            name: name.to_string(),
            source: err,
        })?
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
