//! User configuration for writegate.
//!
//! Read from `$XDG_CONFIG_HOME/writegate/config.toml` (or
//! `~/.config/writegate/config.toml`). Every key is optional:
//!
//! ```toml
//! theme = "dark"          # dark | light | mono
//! interaction = "auto"    # auto | rich | plain
//! color = true
//! max_empty_reads = 3
//! retry_delay_ms = 100
//! ```
//!
//! Config problems are soft failures: a missing file means defaults, and a
//! malformed one is reported as a warning and then ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;
use writegate_core::SessionSettings;

use crate::input::InteractionMode;
use crate::theme::Theme;

/// Settings read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Theme name; see [`Theme::from_name`].
    pub theme: String,
    /// Allowed input strategies.
    pub interaction: InteractionMode,
    /// Whether diff output is colored at all.
    pub color: bool,
    /// End-of-file reads in a row before a prompt gives up.
    pub max_empty_reads: u32,
    /// Pause between end-of-file reads, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_owned(),
            interaction: InteractionMode::Auto,
            color: true,
            max_empty_reads: 3,
            retry_delay_ms: 100,
        }
    }
}

impl Config {
    /// Resolves the configured theme, falling back to `dark` for unknown names.
    pub fn theme(&self) -> Theme {
        Theme::from_name(&self.theme).unwrap_or_else(|| {
            warn!(theme = %self.theme, "unknown theme, using dark");
            Theme::dark()
        })
    }

    /// Builds session settings. `color` is the final say on coloring, after
    /// the config flag, command-line flags and terminal detection.
    pub fn session_settings(&self, color: bool, unavailable_hint: &str) -> SessionSettings {
        SessionSettings {
            max_empty_reads: self.max_empty_reads.max(1),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            palette: if color && self.color {
                self.theme().palette
            } else {
                None
            },
            unavailable_hint: unavailable_hint.to_owned(),
        }
    }
}

/// Returns the path to the writegate config file.
///
/// Prefers `$XDG_CONFIG_HOME/writegate/config.toml`; falls back to
/// `~/.config/writegate/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("writegate").join("config.toml")
}

/// Parses config text.
pub fn parse(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

/// Loads the config at `path`. Never fails; see the module docs.
pub fn load(path: &Path) -> Config {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Config::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
            return Config::default();
        }
    };
    match parse(&raw) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config parse error, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn keys_override_defaults() {
        let config = parse(
            r#"
            theme = "light"
            interaction = "plain"
            color = false
            max_empty_reads = 5
            retry_delay_ms = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.interaction, InteractionMode::Plain);
        assert!(!config.color);
        assert_eq!(config.max_empty_reads, 5);
        assert_eq!(config.retry_delay_ms, 10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("colour = true").is_err());
        assert!(parse("interaction = \"fancy\"").is_err());
    }

    #[test]
    fn missing_and_malformed_files_fall_back() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(load(&dir.path().join("absent.toml")), Config::default());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "theme = [").unwrap();
        assert_eq!(load(&bad), Config::default());

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "max_empty_reads = 7").unwrap();
        assert_eq!(load(&good).max_empty_reads, 7);
    }

    #[test]
    fn settings_respect_color_switches() {
        let config = Config::default();
        assert!(config.session_settings(true, "hint").palette.is_some());
        assert!(config.session_settings(false, "hint").palette.is_none());

        let mono = Config {
            theme: "mono".into(),
            ..Config::default()
        };
        assert!(mono.session_settings(true, "hint").palette.is_none());

        let zero = Config {
            max_empty_reads: 0,
            ..Config::default()
        };
        assert_eq!(zero.session_settings(true, "hint").max_empty_reads, 1);
    }
}
