//! Configuration settings for the reconciler.

use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigErrorKind, ReconcileError};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub systemctl: SystemctlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Service-manager invocation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemctlConfig {
    /// Path or name of the systemctl binary.
    #[serde(default = "default_program")]
    pub program: String,
    /// Timeout for unit-mutating commands (start/stop/enable/disable).
    #[serde(default = "default_unit_timeout")]
    pub unit_timeout_seconds: u64,
    /// Timeout for read-only state queries.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_seconds: u64,
    /// Timeout for daemon-reload.
    #[serde(default = "default_reload_timeout")]
    pub reload_timeout_seconds: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_program() -> String {
    "systemctl".to_string()
}

fn default_unit_timeout() -> u64 {
    120
}

fn default_query_timeout() -> u64 {
    30
}

fn default_reload_timeout() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SystemctlConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            unit_timeout_seconds: default_unit_timeout(),
            query_timeout_seconds: default_query_timeout(),
            reload_timeout_seconds: default_reload_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReconcileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ReconcileError::Config {
            kind: ConfigErrorKind::InvalidSettings {
                message: format!("Failed to read config file '{}': {}", path.display(), e),
            },
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ReconcileError::Config {
            kind: ConfigErrorKind::InvalidSettings {
                message: format!("Failed to parse config file '{}': {}", path.display(), e),
            },
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), ReconcileError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ReconcileError::Config {
                kind: ConfigErrorKind::InvalidSettings {
                    message: format!(
                        "Invalid log level '{}'. Valid levels: {:?}",
                        self.logging.level, valid_levels
                    ),
                },
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(ReconcileError::Config {
                kind: ConfigErrorKind::InvalidSettings {
                    message: format!(
                        "Invalid log format '{}'. Valid formats: {:?}",
                        self.logging.format, valid_formats
                    ),
                },
            });
        }

        if self.systemctl.program.is_empty() {
            return Err(ReconcileError::Config {
                kind: ConfigErrorKind::InvalidSettings {
                    message: "systemctl program must not be empty".to_string(),
                },
            });
        }

        for (name, value) in [
            ("unit_timeout_seconds", self.systemctl.unit_timeout_seconds),
            ("query_timeout_seconds", self.systemctl.query_timeout_seconds),
            (
                "reload_timeout_seconds",
                self.systemctl.reload_timeout_seconds,
            ),
        ] {
            if value == 0 {
                return Err(ReconcileError::Config {
                    kind: ConfigErrorKind::InvalidSettings {
                        message: format!("{} must be greater than zero", name),
                    },
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.systemctl.program, "systemctl");
        assert_eq!(settings.systemctl.unit_timeout_seconds, 120);
        assert_eq!(settings.systemctl.query_timeout_seconds, 30);
        assert_eq!(settings.systemctl.reload_timeout_seconds, 60);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[systemctl]\nprogram = \"/usr/bin/systemctl\"").unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.systemctl.program, "/usr/bin/systemctl");
        assert_eq!(settings.systemctl.unit_timeout_seconds, 120);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, "pretty");
    }

    #[test]
    fn test_load_rejects_invalid_log_level() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"verbose\"").unwrap();

        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[systemctl]\nunit_timeout_seconds = 0").unwrap();

        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Settings::load("/nonexistent/reconciler.toml").unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Config {
                kind: ConfigErrorKind::InvalidSettings { .. }
            }
        ));
    }
}
