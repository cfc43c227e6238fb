//! User settings for Bizdesk
//!
//! Manages server, logging and export preferences persisted in `config.json`.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::BizdeskPaths;
use crate::error::BizdeskError;

/// What a single-section export returns when the section has no data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptySectionPolicy {
    /// Emit the one-line placeholder naming the empty section (default)
    #[default]
    Placeholder,
    /// Answer with a not-found error instead of a file
    NotFound,
}

/// Export preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Behaviour for empty single-section exports
    #[serde(default)]
    pub empty_section: EmptySectionPolicy,

    /// Date format for exported dates (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl ExportSettings {
    /// Reject a `date_format` chrono cannot render
    pub fn validate(&self) -> Result<(), BizdeskError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(BizdeskError::Config(format!(
                "Invalid export.date_format '{}': not a valid strftime pattern",
                self.date_format
            )));
        }
        Ok(())
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            empty_section: EmptySectionPolicy::default(),
            date_format: default_date_format(),
        }
    }
}

/// User settings for Bizdesk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Default log filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Export preferences
    #[serde(default)]
    pub export: ExportSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_date_format() -> String {
    // es-ES short date: day/month/year without padding
    "%-d/%-m/%Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            bind_address: default_bind_address(),
            log_level: default_log_level(),
            export: ExportSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    ///
    /// `BIZDESK_BIND` overrides the stored bind address.
    pub fn load_or_create(paths: &BizdeskPaths) -> Result<Self, BizdeskError> {
        let settings_path = paths.settings_file();

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BizdeskError::Io(format!("Failed to read settings file: {}", e))
            })?;

            serde_json::from_str::<Settings>(&contents).map_err(|e| {
                BizdeskError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            // Don't save yet - let caller decide when to persist
            Settings::default()
        };

        settings.export.validate()?;

        if let Ok(bind) = std::env::var("BIZDESK_BIND") {
            if !bind.trim().is_empty() {
                settings.bind_address = bind;
            }
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BizdeskPaths) -> Result<(), BizdeskError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BizdeskError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BizdeskError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.bind_address, "127.0.0.1:3000");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.export.empty_section, EmptySectionPolicy::Placeholder);
        assert_eq!(settings.export.date_format, "%-d/%-m/%Y");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BizdeskPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.export.empty_section = EmptySectionPolicy::NotFound;
        settings.log_level = "debug".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.export.empty_section, EmptySectionPolicy::NotFound);
        assert_eq!(loaded.log_level, "debug");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"log_level": "warn"}"#).unwrap();
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.bind_address, "127.0.0.1:3000");
        assert_eq!(settings.export.empty_section, EmptySectionPolicy::Placeholder);
    }

    #[test]
    fn test_invalid_date_format_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BizdeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"export": {"date_format": "%Q"}}"#,
        )
        .unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, BizdeskError::Config(_)));
        assert!(err.to_string().contains("date_format"));
    }

    #[test]
    fn test_date_format_validation() {
        let mut export = ExportSettings::default();
        assert!(export.validate().is_ok());

        export.date_format = "%d.%m.%Y".into();
        assert!(export.validate().is_ok());

        export.date_format = "%Y-%m-%".into();
        assert!(export.validate().is_err());
    }

    #[test]
    fn test_policy_serialization() {
        let json = serde_json::to_string(&EmptySectionPolicy::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
    }
}
