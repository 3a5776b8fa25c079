use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub sources: SourcesConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub default_sort: String,
    pub show_kernel_threads: bool,
    pub theme: String,
    pub color_support: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 1000,
            default_sort: "cpu".to_string(),
            show_kernel_threads: false,
            theme: "dark".to_string(),
            color_support: "auto".to_string(),
        }
    }
}

/// Filesystem roots the reader queries. Overridable to point the monitor at
/// a fixture tree or a mounted image.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub proc_root: String,
    pub etc_root: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            proc_root: "/proc".to_string(),
            etc_root: "/etc".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub filter: String,
    pub cycle_sort: String,
    pub cycle_theme: String,
    pub help: String,
    pub refresh: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            filter: "/".to_string(),
            cycle_sort: "s".to_string(),
            cycle_theme: "t".to_string(),
            help: "?".to_string(),
            refresh: "r".to_string(),
        }
    }
}

/// Parses a config keybind string into a key code. Single characters map to
/// themselves; a few named keys are accepted case-insensitively.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" => Some(KeyCode::Enter),
        "escape" | "esc" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("proctop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.refresh_rate_ms, 1000);
        assert_eq!(config.general.default_sort, "cpu");
        assert!(!config.general.show_kernel_threads);
        assert_eq!(config.sources.proc_root, "/proc");
        assert_eq!(config.keybinds.quit, "q");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
refresh_rate_ms = 500
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_rate_ms, 500);
        // Other fields should be defaults
        assert_eq!(config.general.default_sort, "cpu");
        assert_eq!(config.sources.etc_root, "/etc");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
refresh_rate_ms = 2000
default_sort = "memory"
show_kernel_threads = true
theme = "light"

[sources]
proc_root = "/mnt/guest/proc"
etc_root = "/mnt/guest/etc"

[keybinds]
quit = "x"
cycle_sort = "o"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_rate_ms, 2000);
        assert_eq!(config.general.default_sort, "memory");
        assert!(config.general.show_kernel_threads);
        assert_eq!(config.general.theme, "light");
        assert_eq!(config.sources.proc_root, "/mnt/guest/proc");
        assert_eq!(config.keybinds.quit, "x");
        assert_eq!(config.keybinds.cycle_sort, "o");
    }

    #[test]
    fn parse_key_variants() {
        assert_eq!(parse_key("q"), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("/"), Some(KeyCode::Char('/')));
        assert_eq!(parse_key("Enter"), Some(KeyCode::Enter));
        assert_eq!(parse_key("esc"), Some(KeyCode::Esc));
        assert_eq!(parse_key("meta-shift-x"), None);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.refresh_rate_ms, 1000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("proctop_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.refresh_rate_ms, 1000);
        let _ = std::fs::remove_file(&temp);
    }
}
