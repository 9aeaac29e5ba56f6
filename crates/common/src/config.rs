//! Application configuration.

use mvstab_field_model::TemporalParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Temporal stabilizer defaults.
    pub stabilizer: StabilizerDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default stabilizer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerDefaults {
    /// Whether temporal stabilization runs at all.
    pub enabled: bool,

    /// History weight forwarded to the kernel constants (reserved).
    pub history_weight: f32,

    /// Confidence influence forwarded to the kernel constants (reserved).
    pub conf_influence: f32,

    /// Neighborhood size forwarded to the kernel constants (reserved).
    pub neighborhood_size: u32,

    /// Use the low-flicker preset instead of the values above.
    pub text_preservation: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "mvstab_core=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for StabilizerDefaults {
    fn default() -> Self {
        let params = TemporalParams::default();
        Self {
            enabled: true,
            history_weight: params.history_weight,
            conf_influence: params.conf_influence,
            neighborhood_size: params.neighborhood_size,
            text_preservation: false,
        }
    }
}

impl StabilizerDefaults {
    /// Build sanitized kernel parameters from these defaults.
    pub fn to_params(&self) -> TemporalParams {
        if self.text_preservation {
            return TemporalParams::text_preservation();
        }
        TemporalParams {
            history_weight: self.history_weight,
            conf_influence: self.conf_influence,
            reset_history: false,
            neighborhood_size: self.neighborhood_size,
        }
        .sanitized()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("mvstab").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mvstab-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults_match_kernel_defaults() {
        let params = StabilizerDefaults::default().to_params();
        assert_eq!(params, TemporalParams::default());
    }

    #[test]
    fn test_text_preservation_wins() {
        let defaults = StabilizerDefaults {
            history_weight: 0.9,
            text_preservation: true,
            ..Default::default()
        };
        assert_eq!(defaults.to_params(), TemporalParams::text_preservation());
    }

    #[test]
    fn test_out_of_range_values_are_sanitized() {
        let defaults = StabilizerDefaults {
            history_weight: 3.0,
            conf_influence: -1.0,
            neighborhood_size: 12,
            ..Default::default()
        };
        let params = defaults.to_params();
        assert!((params.history_weight - 0.99).abs() < 1e-6);
        assert_eq!(params.conf_influence, 0.0);
        assert_eq!(params.neighborhood_size, 5);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = scratch_path("roundtrip.json");
        let mut config = AppConfig::default();
        config.stabilizer.enabled = false;
        config.logging.level = "debug".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert!(!loaded.stabilizer.enabled);
        assert_eq!(loaded.logging.level, "debug");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = scratch_path("partial.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "stabilizer": { "text_preservation": true } }"#).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert!(loaded.stabilizer.text_preservation);
        assert!(loaded.stabilizer.enabled);
        assert_eq!(loaded.logging.level, "info");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_garbage_file_falls_back() {
        let path = scratch_path("garbage.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert!(loaded.stabilizer.enabled);
        let _ = std::fs::remove_file(&path);
    }
}
