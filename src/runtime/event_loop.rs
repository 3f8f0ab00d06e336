use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode, Pane, PlaybackState};
use crate::audio::AudioPlayer;
use crate::catalog::{CatalogCmd, CatalogEvent, CatalogHandle};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

const VOLUME_STEP: u8 = 5;
const SEEK_STEP_FRACTION: f64 = 0.05;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Last track identifier emitted to MPRIS.
    pub last_mpris_current: Option<String>,
    /// Last playback state emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            last_mpris_current: app.current.clone(),
            last_mpris_playback: app.playback,
        }
    }
}

/// Main terminal event loop: applies catalog results, mirrors the audio
/// thread's state, draws, and routes key/MPRIS input into the session.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    catalog: &CatalogHandle,
    catalog_rx: &mpsc::Receiver<CatalogEvent>,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Apply finished catalog work first; each event is self-contained.
        while let Ok(ev) = catalog_rx.try_recv() {
            handle_catalog_event(ev, app, audio_player);
        }

        // Mirror the audio thread's view of playback so a drained sink or a
        // failed load stops the indicator from claiming "playing".
        sync_playback(app);

        if app.current != state.last_mpris_current || app.playback != state.last_mpris_playback {
            update_mpris(mpris, app);
            state.last_mpris_current = app.current.clone();
            state.last_mpris_playback = app.playback;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, audio_player)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, catalog, control_tx)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn sync_playback(app: &mut App) {
    let Some(handle) = app.playback_handle.as_ref().cloned() else {
        return;
    };
    if let Ok(info) = handle.lock() {
        // Only mirror once the audio thread has caught up with the session's
        // active track; a stale snapshot must not undo an optimistic change.
        if info.current == app.current && info.current.is_some() {
            app.playback = if info.playing {
                PlaybackState::Playing
            } else {
                PlaybackState::Paused
            };
        }
    }
}

fn handle_catalog_event(event: CatalogEvent, app: &mut App, audio_player: &AudioPlayer) {
    match event {
        CatalogEvent::FolderLoaded {
            folder,
            tracks,
            autoplay,
        } => {
            if let Some(cmd) = app.apply_folder_loaded(folder, tracks, autoplay) {
                let _ = audio_player.send(cmd);
            }
        }
        CatalogEvent::FolderFailed { folder, error } => {
            app.notice = Some(format!("Could not load {folder}: {error}"));
        }
        CatalogEvent::AlbumsLoaded(albums) => app.apply_albums_loaded(albums),
        CatalogEvent::AlbumsFailed { error } => {
            app.notice = Some(format!("Could not load albums: {error}"));
        }
    }
}

fn handle_control_cmd(
    cmd: ControlCmd,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit();
            return Ok(true);
        }
        ControlCmd::Play => match app.playback {
            PlaybackState::Paused => {
                if let Some(c) = app.toggle_playback() {
                    let _ = audio_player.send(c);
                }
            }
            PlaybackState::Stopped => {
                if let Some(c) = app.activate_selected() {
                    let _ = audio_player.send(c);
                }
            }
            PlaybackState::Playing => {}
        },
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                if let Some(c) = app.toggle_playback() {
                    let _ = audio_player.send(c);
                }
            }
        }
        ControlCmd::PlayPause => {
            let cmd = match app.playback {
                PlaybackState::Stopped => app.activate_selected(),
                _ => app.toggle_playback(),
            };
            if let Some(c) = cmd {
                let _ = audio_player.send(c);
            }
        }
        ControlCmd::Stop => {
            let c = app.stop();
            let _ = audio_player.send(c);
        }
        ControlCmd::Next => {
            if let Some(c) = app.next() {
                let _ = audio_player.send(c);
            }
        }
        ControlCmd::Prev => {
            if let Some(c) = app.previous() {
                let _ = audio_player.send(c);
            }
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    catalog: &CatalogHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> Result<bool, Box<dyn std::error::Error>> {
    // The search field re-resolves on every input change.
    if app.input == InputMode::Search {
        match key.code {
            KeyCode::Esc => {
                app.leave_input();
                app.search_query.clear();
            }
            KeyCode::Enter => app.leave_input(),
            KeyCode::Backspace => {
                if let Some(cmd) = app.pop_search_char() {
                    let _ = audio_player.send(cmd);
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                if let Some(cmd) = app.push_search_char(c) {
                    let _ = audio_player.send(cmd);
                }
            }
            _ => {}
        }
        return Ok(false);
    }

    if app.input == InputMode::AddTrack {
        match key.code {
            KeyCode::Esc => app.leave_input(),
            KeyCode::Backspace => {
                app.path_input.pop();
            }
            KeyCode::Enter => {
                let path = PathBuf::from(app.path_input.trim());
                app.leave_input();
                app.add_local_track(&path);
            }
            KeyCode::Char(c) if !c.is_control() => app.path_input.push(c),
            _ => {}
        }
        return Ok(false);
    }

    // Notices live until the next user action.
    app.notice = None;

    match key.code {
        KeyCode::Char('q') => {
            audio_player.quit();
            return Ok(true);
        }
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('a') => app.enter_add_track(),
        KeyCode::Char('b') => app.open_sidebar(),
        KeyCode::Char('B') => app.close_sidebar(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Enter => match app.focus {
            Pane::Albums => {
                if let Some(album) = app.albums.get(app.album_selected) {
                    let folder = format!(
                        "{}/{}",
                        settings.server.songs_dir.trim_matches('/'),
                        album.folder
                    );
                    let _ = catalog.send(CatalogCmd::LoadFolder {
                        folder,
                        autoplay: true,
                    });
                }
            }
            Pane::Tracks => {
                if let Some(cmd) = app.activate_selected() {
                    let _ = audio_player.send(cmd);
                }
            }
        },
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Right => seek_by_fraction(app, audio_player, SEEK_STEP_FRACTION),
        KeyCode::Left => seek_by_fraction(app, audio_player, -SEEK_STEP_FRACTION),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let level = app.volume_percent.saturating_add(VOLUME_STEP).min(100);
            let _ = audio_player.send(app.set_volume_percent(level));
        }
        KeyCode::Char('-') => {
            let level = app.volume_percent.saturating_sub(VOLUME_STEP);
            let _ = audio_player.send(app.set_volume_percent(level));
        }
        KeyCode::Char('m') => {
            let _ = audio_player.send(app.toggle_mute());
        }
        _ => {}
    }

    Ok(false)
}

/// The seek surface reports absolute fractions; keys move the current
/// position by a step and the result is clamped to [0, 1] here, as the
/// session's `seek_to_fraction` expects.
fn seek_by_fraction(app: &App, audio_player: &AudioPlayer, delta: f64) {
    let Some(handle) = app.playback_handle.as_ref() else {
        return;
    };
    let (elapsed, duration) = match handle.lock() {
        Ok(info) => (info.elapsed, info.duration),
        Err(_) => return,
    };
    let Some(total) = duration.filter(|d| !d.is_zero()) else {
        return;
    };

    let fraction = (elapsed.as_secs_f64() / total.as_secs_f64() + delta).clamp(0.0, 1.0);
    if let Some(cmd) = app.seek_to_fraction(fraction) {
        let _ = audio_player.send(cmd);
    }
}
