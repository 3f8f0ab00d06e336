//! File-based logging, so the TUI never has to share its terminal with log
//! lines.

use std::env;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize tracing to `$XDG_STATE_HOME/vivace/vivace.log` (or
/// `~/.local/state/vivace/vivace.log`). Returns the appender guard; keep it
/// alive so pending lines get flushed on exit. Logging is best-effort: a
/// missing home directory simply disables it.
pub fn init() -> Option<WorkerGuard> {
    let dir = state_dir()?;
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::never(&dir, "vivace.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("VIVACE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }
    Some(guard)
}

fn state_dir() -> Option<PathBuf> {
    let base = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("state")
    } else {
        return None;
    };
    Some(base.join("vivace"))
}
