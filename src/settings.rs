//! # Settings Module
//!
//! ## Purpose
//! Keeps the user preferences of ChemCalc in one JSON file (`chemcalc_config.json`):
//! how many decimals results are rendered with, when numbers switch to scientific
//! notation, whether interpretation lines are shown, and where logs go.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "precision": 3,
//!   "scientific_below": 0.001,
//!   "scientific_above": 1000000.0,
//!   "show_interpretation": true,
//!   "log_level": "info",
//!   "log_file": null
//! }
//! ```
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use ChemCalc::settings::SettingsManager;
//!
//! let mut manager = SettingsManager::new();
//! manager.settings_mut().precision = 4;
//! manager.save()?;
//! ```
//! A missing or unreadable file is not an error: defaults are used and the problem is logged.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "chemcalc_config.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// User preferences. Every field has a default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// decimals in fixed notation (and mantissa decimals in scientific notation)
    pub precision: usize,
    /// magnitudes below this (except exact zero) are printed in scientific notation
    pub scientific_below: f64,
    /// magnitudes at or above this are printed in scientific notation
    pub scientific_above: f64,
    pub show_interpretation: bool,
    /// "off", "error", "warn", "info", "debug" or "trace"
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            precision: 3,
            scientific_below: 1e-3,
            scientific_above: 1e6,
            show_interpretation: true,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    /// log level as understood by the `log` crate; unknown names fall back to Info
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .trim()
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info)
    }
}

/// Owns the settings together with the file they are persisted to.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings: Settings,
    config_file: String,
}

impl SettingsManager {
    /// Loads `chemcalc_config.json` from the current directory, or defaults.
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let settings = match Self::load_settings(config_file) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Could not read settings from '{}': {}. Using defaults",
                    config_file, e
                );
                Settings::default()
            }
        };
        Self {
            settings,
            config_file: config_file.to_string(),
        }
    }

    fn load_settings(config_file: &str) -> Result<Settings, SettingsError> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let settings: Settings = serde_json::from_str(&content)?;
            info!("Settings loaded from '{}'", config_file);
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.config_file, content)?;
        info!("Settings saved to '{}'", self.config_file);
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), SettingsError> {
        self.settings = Settings::default();
        self.save()
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_gives_defaults() {
        let manager = SettingsManager::with_config_file("definitely_not_here_chemcalc.json");
        assert_eq!(manager.settings(), &Settings::default());
        assert_eq!(manager.config_file(), "definitely_not_here_chemcalc.json");
    }

    #[test]
    fn partial_file_is_completed_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "precision": 5, "log_level": "debug" }}"#).unwrap();
        let manager = SettingsManager::with_config_file(file.path().to_str().unwrap());
        assert_eq!(manager.settings().precision, 5);
        assert_eq!(manager.settings().level_filter(), log::LevelFilter::Debug);
        assert!(manager.settings().show_interpretation);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        let manager = SettingsManager::with_config_file(file.path().to_str().unwrap());
        assert_eq!(manager.settings(), &Settings::default());
    }

    #[test]
    fn save_and_reload() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let mut manager = SettingsManager::with_config_file(&path);
        manager.settings_mut().precision = 6;
        manager.settings_mut().log_file = Some("chemcalc.log".to_string());
        manager.save().unwrap();

        let reloaded = SettingsManager::with_config_file(&path);
        assert_eq!(reloaded.settings().precision, 6);
        assert_eq!(
            reloaded.settings().log_file.as_deref(),
            Some("chemcalc.log")
        );

        manager.reset_to_defaults().unwrap();
        let reloaded = SettingsManager::with_config_file(&path);
        assert_eq!(reloaded.settings(), &Settings::default());
    }

    #[test]
    fn unknown_log_level_means_info() {
        let settings = Settings {
            log_level: "chatty".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.level_filter(), log::LevelFilter::Info);
    }
}
