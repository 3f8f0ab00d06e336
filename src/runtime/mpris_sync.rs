use crate::app::App;
use crate::mpris::MprisHandle;
use crate::ui;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let title = app.current.as_deref().map(ui::display_name);
    let (album, art_url) = match app.active_album() {
        Some(album) => (Some(album.title.clone()), Some(album.cover.clone())),
        None => (None, None),
    };
    mpris.set_now_playing(title, album, art_url);
    mpris.set_playback(app.playback);
}
