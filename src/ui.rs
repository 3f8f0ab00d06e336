//! UI rendering for the terminal interface.
//!
//! Everything here is a pure function of the `App` model and the shared
//! playback info; no widget holds state of its own.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode, Pane, PlaybackState};
use crate::audio::PlaybackInfo;
use crate::config::UiSettings;

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// The `elapsed / total` text for the status line. An unknown or zero
/// duration renders the placeholder the player starts with.
pub fn playback_time_text(elapsed: Duration, duration: Option<Duration>) -> String {
    match duration {
        Some(total) if !total.is_zero() => {
            format!("{} / {}", format_mmss(elapsed), format_mmss(total))
        }
        _ => "00:00/00:00".to_string(),
    }
}

/// Playback progress in percent, when the duration is known and non-zero.
pub fn progress_percent(elapsed: Duration, duration: Option<Duration>) -> Option<f64> {
    let total = duration?;
    if total.is_zero() {
        return None;
    }
    Some((elapsed.as_secs_f64() / total.as_secs_f64() * 100.0).min(100.0))
}

/// Identifiers are displayed percent-decoded; storage stays raw.
pub fn display_name(name: &str) -> String {
    urlencoding::decode(name)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| name.to_string())
}

fn controls_text() -> &'static str {
    "[j/k] move | [Tab] pane | [enter] play/open | [space/p] play-pause | [h/l] prev/next \
     | [←/→] seek | [-/+] volume | [m] mute | [/] search | [a] add mp3 | [b/B] sidebar | [q] quit"
}

fn pane_block(title: &'static str, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

/// Render the entire UI from `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let info: PlaybackInfo = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|i| i.clone()))
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vivace ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        let state = match app.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        };
        parts.push(state.to_string());

        if let Some(ref name) = app.current {
            parts.push(format!("Song: {}", display_name(name)));
        }
        parts.push(playback_time_text(info.elapsed, info.duration));

        if app.muted {
            parts.push("Vol: muted".to_string());
        } else {
            parts.push(format!("Vol: {}%", app.volume_percent));
        }

        if let Some(album) = app.active_album() {
            parts.push(format!("Album: {}", album.title));
        } else if let Some(folder) = app.registry.folder() {
            parts.push(format!("Folder: {folder}"));
        }

        parts.join(" • ")
    };
    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Seek surface
    let ratio = progress_percent(info.elapsed, info.duration).unwrap_or(0.0) / 100.0;
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" seek "))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(playback_time_text(info.elapsed, info.duration));
    frame.render_widget(gauge, chunks[2]);

    // Main area: optional track sidebar + album grid
    let main_chunks = if app.sidebar_open {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[3])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(chunks[3])
    };

    if app.sidebar_open {
        let items: Vec<ListItem> = app
            .visible_tracks()
            .iter()
            .map(|entry| {
                let mut label = display_name(&entry.name);
                if entry.local {
                    label.push_str("  [local]");
                }
                ListItem::new(label)
            })
            .collect();
        let has_items = !items.is_empty();
        let list = List::new(items)
            .block(pane_block(" tracks ", app.focus == Pane::Tracks))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if has_items {
            state.select(Some(app.selected));
        }
        frame.render_stateful_widget(list, main_chunks[0], &mut state);
    }

    {
        let area = if app.sidebar_open {
            main_chunks[1]
        } else {
            main_chunks[0]
        };
        let items: Vec<ListItem> = app
            .albums
            .iter()
            .map(|album| ListItem::new(format!("{} — {}", album.title, album.description)))
            .collect();
        let has_items = !items.is_empty();
        let list = List::new(items)
            .block(pane_block(" albums ", app.focus == Pane::Albums))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if has_items {
            state.select(Some(app.album_selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    // Input / notice line
    let (input_title, input_text, input_style) = match app.input {
        InputMode::Search => (" search ", app.search_query.clone(), Style::default()),
        InputMode::AddTrack => (" add mp3 path ", app.path_input.clone(), Style::default()),
        InputMode::Normal => match &app.notice {
            Some(notice) => (" notice ", notice.clone(), Style::default().fg(Color::Red)),
            None => (" input ", String::new(), Style::default()),
        },
    };
    let input_par = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(input_title)
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(input_par, chunks[4]);

    // Controls footer
    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
