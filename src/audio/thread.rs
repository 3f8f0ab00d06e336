use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};
use tracing::warn;

use super::source::{TrackBytes, create_sink_at, load_bytes, probe_duration};
use super::types::{AudioCmd, PlaybackHandle};

struct Loaded {
    name: String,
    bytes: TrackBytes,
    duration: Option<Duration>,
}

pub(super) fn spawn_audio_thread(
    base_url: String,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    initial_volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let agent = ureq::Agent::new_with_defaults();

        let mut loaded: Option<Loaded> = None;
        let mut sink: Option<Sink> = None;
        let mut paused = true;
        let mut volume = initial_volume;

        // Ticker thread publishing elapsed time periodically.
        let info_for_ticker = playback_info.clone();
        thread::spawn(move || loop {
            thread::sleep(Duration::from_millis(500));
            let mut info = info_for_ticker.lock().unwrap();
            if info.playing {
                info.elapsed = info.elapsed + Duration::from_millis(500);
            }
        });

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load {
                        name,
                        source,
                        autoplay,
                    } => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }

                        let result = load_bytes(&agent, &base_url, &source).and_then(|bytes| {
                            let duration = probe_duration(&bytes);
                            let new_sink =
                                create_sink_at(&stream, &bytes, &name, Duration::ZERO, volume)?;
                            Ok((bytes, duration, new_sink))
                        });

                        match result {
                            Ok((bytes, duration, new_sink)) => {
                                if autoplay {
                                    new_sink.play();
                                }
                                paused = !autoplay;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.current = Some(name.clone());
                                    info.elapsed = Duration::ZERO;
                                    info.duration = duration;
                                    info.playing = autoplay;
                                }
                                loaded = Some(Loaded {
                                    name,
                                    bytes,
                                    duration,
                                });
                                sink = Some(new_sink);
                            }
                            Err(err) => {
                                warn!(track = %name, error = %err, "failed to load track");
                                loaded = None;
                                paused = true;
                                if let Ok(mut info) = playback_info.lock() {
                                    // The play indicator must not claim playback
                                    // that never started.
                                    info.current = Some(name);
                                    info.elapsed = Duration::ZERO;
                                    info.duration = None;
                                    info.playing = false;
                                }
                            }
                        }
                    }

                    AudioCmd::TogglePause => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                            } else {
                                s.pause();
                            }
                            paused = !paused;
                            if let Ok(mut info) = playback_info.lock() {
                                info.playing = !paused;
                            }
                        }
                    }

                    AudioCmd::SeekTo(position) => {
                        // Scrubbing rebuilds the sink and skips into the fresh
                        // decode; the cached bytes make this cheap.
                        let Some(track) = loaded.as_ref() else {
                            continue;
                        };
                        if sink.is_none() {
                            continue;
                        }
                        let Some(total) = track.duration else {
                            continue;
                        };
                        let position = position.min(total);

                        if let Some(s) = sink.take() {
                            s.stop();
                        }

                        match create_sink_at(&stream, &track.bytes, &track.name, position, volume) {
                            Ok(new_sink) => {
                                if !paused {
                                    new_sink.play();
                                }
                                sink = Some(new_sink);
                                if let Ok(mut info) = playback_info.lock() {
                                    info.elapsed = position;
                                }
                            }
                            Err(err) => {
                                warn!(track = %track.name, error = %err, "seek failed");
                                paused = true;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = false;
                                }
                            }
                        }
                    }

                    AudioCmd::SetVolume(level) => {
                        volume = level;
                        if let Some(ref s) = sink {
                            s.set_volume(level);
                        }
                    }

                    AudioCmd::Stop => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        loaded = None;
                        paused = true;
                        if let Ok(mut info) = playback_info.lock() {
                            info.current = None;
                            info.elapsed = Duration::ZERO;
                            info.duration = None;
                            info.playing = false;
                        }
                    }

                    AudioCmd::Quit => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic check: a drained sink means the track ended.
                    // There is no auto-advance; the indicator just stops
                    // claiming playback.
                    if let Some(ref s) = sink {
                        if !paused && s.empty() {
                            paused = true;
                            if let Ok(mut info) = playback_info.lock() {
                                info.playing = false;
                                if let Some(total) = loaded.as_ref().and_then(|t| t.duration) {
                                    info.elapsed = total;
                                }
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
