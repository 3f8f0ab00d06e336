use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_vivace_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", "/tmp/vivace-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/vivace-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("vivace")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("vivace")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[server]
base_url = "http://music.local:9000"
songs_dir = "tunes"
default_folder = "tunes/favorites"

[playback]
volume_percent = 40

[ui]
header_text = "hello"
sidebar_open = false

[library]
extensions = ["mp3", "ogg"]
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("VIVACE__PLAYBACK__VOLUME_PERCENT");

    let s = Settings::load().unwrap();
    assert_eq!(s.server.base_url, "http://music.local:9000");
    assert_eq!(s.server.songs_dir, "tunes");
    assert_eq!(s.server.default_folder, "tunes/favorites");
    assert_eq!(s.playback.volume_percent, 40);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.sidebar_open);
    assert_eq!(
        s.library.extensions,
        vec!["mp3".to_string(), "ogg".to_string()]
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
volume_percent = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("VIVACE__PLAYBACK__VOLUME_PERCENT", "15");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume_percent, 15);
}

#[test]
fn defaults_point_at_the_songs_directory() {
    let s = Settings::default();
    assert_eq!(s.server.songs_dir, "songs");
    assert_eq!(s.server.default_folder, "songs/ncs");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.library.extensions.clear();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.server.base_url = "  ".into();
    assert!(s.validate().is_err());
}
