use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.json";
const APPS_FILE: &str = "apps.json";
const DATA_DIR: &str = "data";

const MIN_PANEL_WIDTH: f32 = 120.0;
const MIN_PANEL_HEIGHT: f32 = 160.0;
const MIN_TRIGGER_HEIGHT: f32 = 24.0;
const MAX_SIDE: f32 = 2048.0;
const MAX_DURATION_MS: u64 = 10_000;
const MAX_GRID_COLUMNS: u32 = 12;

/// Tunables of the widget. Everything here has a default, so a missing or
/// partial `config.json` is always usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reveal_ms: u64,
    pub fade_ms: u64,
    pub diagonal_factor: f64,
    pub top_margin: f32,
    pub anchor_fraction: f32,
    pub grid_columns: u32,
    pub panel_width: f32,
    pub panel_height: f32,
    pub trigger_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reveal_ms: 700,
            fade_ms: 350,
            diagonal_factor: 0.25,
            top_margin: 8.0,
            anchor_fraction: 0.85,
            grid_columns: 3,
            panel_width: 300.0,
            panel_height: 380.0,
            trigger_height: 64.0,
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "squid_launcher", "squid_dock")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads `config.json` from the per-user config dir, writing the defaults
    /// there on first run.
    pub fn load() -> Self {
        let Some(config_dir) = Self::config_dir() else {
            warn!("no per-user config directory available, using default settings");
            return Self::default();
        };
        Self::load_from(&config_dir.join(CONFIG_FILE))
    }

    fn load_from(config_path: &Path) -> Self {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path);
            return config;
        }
        match std::fs::File::open(config_path) {
            Ok(file) => match serde_json::from_reader::<_, AppConfig>(file) {
                Ok(config) => config.sanitized(),
                Err(err) => {
                    warn!("failed to parse {}: {err}; using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("failed to open {}: {err}; using defaults", config_path.display());
                Self::default()
            }
        }
    }

    fn save_to(&self, config_path: &Path) {
        if let Some(dir) = config_path.parent() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                warn!("cannot create config dir {}: {err}", dir.display());
                return;
            }
        }
        match std::fs::File::create(config_path) {
            Ok(file) => {
                if let Err(err) = serde_json::to_writer_pretty(file, self) {
                    warn!("failed to write {}: {err}", config_path.display());
                } else {
                    info!("wrote default settings to {}", config_path.display());
                }
            }
            Err(err) => warn!("failed to create {}: {err}", config_path.display()),
        }
    }

    pub fn sanitized(self) -> Self {
        let fallback = Self::default();
        Self {
            reveal_ms: self.reveal_ms.min(MAX_DURATION_MS),
            fade_ms: self.fade_ms.min(MAX_DURATION_MS),
            diagonal_factor: open_unit(self.diagonal_factor, fallback.diagonal_factor),
            top_margin: finite_in(self.top_margin, 0.0, MAX_SIDE, fallback.top_margin),
            anchor_fraction: finite_in(self.anchor_fraction, 0.0, 1.0, fallback.anchor_fraction),
            grid_columns: self.grid_columns.clamp(1, MAX_GRID_COLUMNS),
            panel_width: finite_in(
                self.panel_width,
                MIN_PANEL_WIDTH,
                MAX_SIDE,
                fallback.panel_width,
            ),
            panel_height: finite_in(
                self.panel_height,
                MIN_PANEL_HEIGHT,
                MAX_SIDE,
                fallback.panel_height,
            ),
            trigger_height: finite_in(
                self.trigger_height,
                MIN_TRIGGER_HEIGHT,
                MAX_SIDE,
                fallback.trigger_height,
            ),
        }
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

fn finite_in(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

fn open_unit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 && value < 1.0 {
        value
    } else {
        fallback
    }
}

/// Directory of the running executable; shortcut data and assets live
/// next to it.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn apps_file_path() -> PathBuf {
    install_dir().join(DATA_DIR).join(APPS_FILE)
}

/// Resolves an icon or asset reference. Relative references are taken
/// relative to the install dir.
pub fn resolve_install_relative(reference: &str) -> PathBuf {
    let path = PathBuf::from(reference);
    if path.is_absolute() {
        path
    } else {
        install_dir().join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"reveal_ms": 900}"#).unwrap();
        assert_eq!(config.reveal_ms, 900);
        assert_eq!(config.fade_ms, AppConfig::default().fade_ms);
        assert_eq!(config.grid_columns, 3);
    }

    #[test]
    fn sanitize_rejects_out_of_range_values() {
        let config = AppConfig {
            diagonal_factor: 1.5,
            grid_columns: 0,
            panel_width: f32::NAN,
            panel_height: 10.0,
            anchor_fraction: 2.0,
            ..AppConfig::default()
        }
        .sanitized();

        assert_eq!(config.diagonal_factor, 0.25);
        assert_eq!(config.grid_columns, 1);
        assert_eq!(config.panel_width, 300.0);
        assert_eq!(config.panel_height, MIN_PANEL_HEIGHT);
        assert_eq!(config.anchor_fraction, 1.0);
    }

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = AppConfig::load_from(&path);
        assert_eq!(config, AppConfig::default());
        assert!(path.is_file());

        let reread = AppConfig::load_from(&path);
        assert_eq!(reread, config);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }
}
