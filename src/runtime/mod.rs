use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::{CatalogCmd, spawn_catalog_worker};
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    // Keep the appender guard alive for the whole session.
    let _log_guard = logging::init();

    let base_url = env::args()
        .nth(1)
        .unwrap_or_else(|| settings.server.base_url.clone());

    let audio_player = AudioPlayer::new(
        base_url.clone(),
        f32::from(settings.playback.volume_percent) / 100.0,
    );

    let mut app = App::new(settings.playback.volume_percent, settings.ui.sidebar_open);
    app.set_playback_handle(audio_player.playback_handle());

    let (catalog, catalog_rx) = spawn_catalog_worker(
        base_url,
        settings.server.songs_dir.clone(),
        settings.library.extensions.clone(),
    );
    // Startup sequence: the default folder first (its first track loads
    // paused), then the album catalog.
    let _ = catalog.send(CatalogCmd::LoadFolder {
        folder: settings.server.default_folder.clone(),
        autoplay: false,
    });
    let _ = catalog.send(CatalogCmd::LoadAlbums);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&app);

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &catalog,
            &catalog_rx,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
