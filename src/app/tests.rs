use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::audio::{AudioCmd, PlaybackInfo};
use crate::catalog::Album;
use crate::library::SourceLocator;

fn app_with_folder(tracks: &[&str]) -> App {
    let mut app = App::new(100, true);
    let names = tracks.iter().map(|s| s.to_string()).collect();
    // Startup load: first track is handed to the player paused.
    let _ = app.apply_folder_loaded("songs/ncs".into(), names, false);
    app
}

#[test]
fn folder_load_populates_registry_and_visible_list_in_order() {
    let app = app_with_folder(&["b.mp3", "a.mp3", "c.mp3"]);

    let visible: Vec<String> = app.visible_tracks().into_iter().map(|e| e.name).collect();
    assert_eq!(visible, vec!["b.mp3", "a.mp3", "c.mp3"]);
    assert_eq!(app.registry.index_of("b.mp3"), Some(0));
}

#[test]
fn startup_folder_load_selects_first_track_paused() {
    let mut app = App::new(100, true);
    let cmd = app.apply_folder_loaded(
        "songs/ncs".into(),
        vec!["a.mp3".into(), "b.mp3".into()],
        false,
    );

    assert_eq!(
        cmd,
        Some(AudioCmd::Load {
            name: "a.mp3".into(),
            source: SourceLocator::Remote {
                folder: "songs/ncs".into(),
                name: "a.mp3".into(),
            },
            autoplay: false,
        })
    );
    assert_eq!(app.current.as_deref(), Some("a.mp3"));
    assert_eq!(app.playback, PlaybackState::Paused);
    assert_eq!(app.selected, 0);
}

#[test]
fn album_triggered_folder_load_autoplays_first_track() {
    let mut app = App::new(100, true);
    let cmd = app.apply_folder_loaded("songs/chill".into(), vec!["x.mp3".into()], true);

    assert!(matches!(
        cmd,
        Some(AudioCmd::Load { autoplay: true, .. })
    ));
    assert_eq!(app.playback, PlaybackState::Playing);
}

#[test]
fn empty_folder_loads_into_an_empty_list_without_error() {
    let mut app = App::new(100, true);
    let cmd = app.apply_folder_loaded("songs/empty".into(), Vec::new(), true);

    assert_eq!(cmd, None);
    assert!(app.visible_tracks().is_empty());
    assert_eq!(app.notice, None);
}

#[test]
fn select_sets_current_and_playback_state() {
    let mut app = app_with_folder(&["a.mp3", "b.mp3"]);

    let cmd = app.select("b.mp3", true).unwrap();
    assert!(matches!(cmd, AudioCmd::Load { autoplay: true, .. }));
    assert_eq!(app.current.as_deref(), Some("b.mp3"));
    assert_eq!(app.playback, PlaybackState::Playing);
    assert_eq!(app.selected, 1);

    let cmd = app.select("a.mp3", false).unwrap();
    assert!(matches!(cmd, AudioCmd::Load { autoplay: false, .. }));
    assert_eq!(app.playback, PlaybackState::Paused);
}

#[test]
fn toggle_playback_flips_between_playing_and_paused() {
    let mut app = app_with_folder(&["a.mp3"]);
    let _ = app.select("a.mp3", true);

    assert_eq!(app.toggle_playback(), Some(AudioCmd::TogglePause));
    assert_eq!(app.playback, PlaybackState::Paused);
    assert_eq!(app.toggle_playback(), Some(AudioCmd::TogglePause));
    assert_eq!(app.playback, PlaybackState::Playing);
}

#[test]
fn toggle_playback_is_a_no_op_with_nothing_loaded() {
    let mut app = App::new(100, true);
    assert_eq!(app.toggle_playback(), None);
    assert_eq!(app.playback, PlaybackState::Stopped);
}

#[test]
fn next_advances_through_the_sequence() {
    let mut app = app_with_folder(&["a.mp3", "b.mp3", "c.mp3"]);

    let cmd = app.next().unwrap();
    assert!(matches!(
        cmd,
        AudioCmd::Load { ref name, autoplay: true, .. } if name == "b.mp3"
    ));
    assert_eq!(app.current.as_deref(), Some("b.mp3"));
}

#[test]
fn next_at_the_last_track_is_a_strict_no_op() {
    let mut app = app_with_folder(&["a.mp3", "b.mp3"]);
    let _ = app.select("b.mp3", true);

    assert_eq!(app.next(), None);
    assert_eq!(app.current.as_deref(), Some("b.mp3"));
    assert_eq!(app.playback, PlaybackState::Playing);
}

#[test]
fn previous_at_the_first_track_is_a_strict_no_op() {
    let mut app = app_with_folder(&["a.mp3", "b.mp3"]);

    assert_eq!(app.previous(), None);
    assert_eq!(app.current.as_deref(), Some("a.mp3"));
    assert_eq!(app.playback, PlaybackState::Paused);
}

#[test]
fn navigation_from_a_local_track_is_a_no_op() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("mine.mp3");
    fs::write(&src, b"mp3").unwrap();

    let mut app = app_with_folder(&["a.mp3", "b.mp3"]);
    assert!(app.add_local_track(&src));
    let _ = app.select("mine.mp3", true);

    assert_eq!(app.next(), None);
    assert_eq!(app.previous(), None);
    assert_eq!(app.current.as_deref(), Some("mine.mp3"));
}

#[test]
fn unmute_restores_the_fixed_level_not_the_previous_one() {
    let mut app = App::new(100, true);

    assert_eq!(app.set_volume_percent(50), AudioCmd::SetVolume(0.5));
    assert!(!app.muted);

    assert_eq!(app.toggle_mute(), AudioCmd::SetVolume(0.0));
    assert!(app.muted);
    assert_eq!(app.volume_percent, 0);

    assert_eq!(app.toggle_mute(), AudioCmd::SetVolume(0.10));
    assert!(!app.muted);
    assert_eq!(app.volume_percent, UNMUTE_VOLUME_PERCENT);
}

#[test]
fn setting_an_audible_volume_unflips_the_mute_indicator() {
    let mut app = App::new(100, true);
    let _ = app.toggle_mute();
    assert!(app.muted);

    let _ = app.set_volume_percent(30);
    assert!(!app.muted);
}

#[test]
fn sliding_volume_to_zero_keeps_the_indicator_unmuted() {
    let mut app = App::new(100, true);
    let _ = app.set_volume_percent(0);
    assert!(!app.muted);

    // The next mute press therefore mutes (forcing zero again).
    let _ = app.toggle_mute();
    assert!(app.muted);
}

fn handle_with(duration: Option<Duration>) -> crate::audio::PlaybackHandle {
    Arc::new(Mutex::new(PlaybackInfo {
        current: Some("a.mp3".into()),
        elapsed: Duration::ZERO,
        duration,
        playing: true,
    }))
}

#[test]
fn seek_needs_a_known_nonzero_duration() {
    let mut app = app_with_folder(&["a.mp3"]);

    // No handle attached at all.
    assert_eq!(app.seek_to_fraction(0.5), None);

    app.set_playback_handle(handle_with(None));
    assert_eq!(app.seek_to_fraction(0.5), None);

    app.set_playback_handle(handle_with(Some(Duration::ZERO)));
    assert_eq!(app.seek_to_fraction(0.5), None);

    app.set_playback_handle(handle_with(Some(Duration::from_secs(130))));
    assert_eq!(
        app.seek_to_fraction(0.5),
        Some(AudioCmd::SeekTo(Duration::from_secs(65)))
    );
}

#[test]
fn search_is_case_and_punctuation_insensitive() {
    let mut app = app_with_folder(&["first.mp3", "my_song.mp3"]);

    app.search_query = "MY SONG!!".into();
    let cmd = app.search_changed().unwrap();
    assert!(matches!(
        cmd,
        AudioCmd::Load { ref name, autoplay: true, .. } if name == "my_song.mp3"
    ));
    assert_eq!(app.notice, None);
}

#[test]
fn empty_search_query_plays_the_first_entry() {
    let mut app = app_with_folder(&["first.mp3", "second.mp3"]);

    app.search_query.clear();
    let cmd = app.search_changed().unwrap();
    assert!(matches!(
        cmd,
        AudioCmd::Load { ref name, .. } if name == "first.mp3"
    ));
}

#[test]
fn search_miss_surfaces_a_notice_and_changes_nothing() {
    let mut app = app_with_folder(&["first.mp3"]);
    let before = app.current.clone();

    app.search_query = "nope".into();
    assert_eq!(app.search_changed(), None);
    assert_eq!(
        app.notice.as_deref(),
        Some("Song not found in the playlist.")
    );
    assert_eq!(app.current, before);
}

#[test]
fn search_on_an_empty_registry_reports_not_found() {
    let mut app = App::new(100, true);
    app.search_query.clear();
    assert_eq!(app.search_changed(), None);
    assert!(app.notice.is_some());
}

#[test]
fn search_does_not_cover_local_uploads() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("hidden_gem.mp3");
    fs::write(&src, b"mp3").unwrap();

    let mut app = app_with_folder(&["first.mp3"]);
    assert!(app.add_local_track(&src));

    app.search_query = "hidden gem".into();
    assert_eq!(app.search_changed(), None);
    assert!(app.notice.is_some());
}

#[test]
fn rejecting_a_non_mp3_upload_changes_no_state() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("notes.txt");
    fs::write(&src, b"text").unwrap();

    let mut app = app_with_folder(&["a.mp3"]);
    let before: Vec<String> = app.visible_tracks().into_iter().map(|e| e.name).collect();

    assert!(!app.add_local_track(&src));
    assert_eq!(app.notice.as_deref(), Some("Only MP3 files are allowed."));

    let after: Vec<String> = app.visible_tracks().into_iter().map(|e| e.name).collect();
    assert_eq!(before, after);
}

#[test]
fn accepted_upload_appends_and_resolves_locally() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("Fresh Cut.mp3");
    fs::write(&src, b"mp3").unwrap();

    let mut app = app_with_folder(&["a.mp3"]);
    assert!(app.add_local_track(&src));

    let entries = app.visible_tracks();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].name, "Fresh Cut.mp3");
    assert!(entries[1].local);
    assert_eq!(app.selected, 1);

    let cmd = app.select("Fresh Cut.mp3", true).unwrap();
    assert!(matches!(
        cmd,
        AudioCmd::Load { source: SourceLocator::Local(_), .. }
    ));
}

#[test]
fn active_album_matches_the_loaded_folder() {
    let mut app = app_with_folder(&["a.mp3"]);
    app.apply_albums_loaded(vec![
        Album {
            folder: "chill".into(),
            title: "Chill".into(),
            description: "d".into(),
            cover: "http://s/songs/chill/cover.jpg".into(),
        },
        Album {
            folder: "ncs".into(),
            title: "NCS".into(),
            description: "d".into(),
            cover: "http://s/songs/ncs/cover.jpg".into(),
        },
    ]);

    assert_eq!(app.active_album().map(|a| a.title.as_str()), Some("NCS"));
}

#[test]
fn cursor_movement_stays_in_bounds() {
    let mut app = app_with_folder(&["a.mp3", "b.mp3"]);

    app.move_up();
    assert_eq!(app.selected, 0);
    app.move_down();
    app.move_down();
    app.move_down();
    assert_eq!(app.selected, 1);

    app.toggle_focus();
    assert_eq!(app.focus, Pane::Albums);
    app.move_down();
    assert_eq!(app.album_selected, 0);
}
