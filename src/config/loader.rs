// src/config/loader.rs
//! Layered configuration loader
//!
//! Layers are merged in order: built-in defaults, each existing TOML file in the search
//! path, then `EMG_`-prefixed environment variables. Nested keys in variable names are
//! separated by a double underscore, so `EMG_PREPROCESSING__LOWPASS_CUTOFF_HZ=60` overrides
//! `preprocessing.lowpass_cutoff_hz`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::constants::paths;
use crate::config::AnalysisConfig;
use crate::error::{EmgError, EmgErrorBuilder, ProcessingStage};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    Validation(#[source] EmgError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for EmgError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(inner) => inner,
            other => EmgErrorBuilder::new(ProcessingStage::Configuration, "load")
                .configuration("loader", &other.to_string()),
        }
    }
}

/// Configuration loader merging files and environment overrides
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create new configuration loader searching the working directory
    pub fn new() -> Self {
        Self {
            config_paths: vec![
                PathBuf::from(paths::DEFAULT_CONFIG_FILE),
                PathBuf::from(paths::LOCAL_CONFIG_FILE),
            ],
        }
    }

    /// Create loader with custom paths, later paths take precedence
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self { config_paths: paths }
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load configuration from defaults, files and the process environment
    pub fn load(&self) -> Result<AnalysisConfig, ConfigError> {
        self.load_with_env(std::env::vars())
    }

    /// Load configuration with an explicit set of environment variables
    pub fn load_with_env<I>(&self, vars: I) -> Result<AnalysisConfig, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged = toml::Value::try_from(AnalysisConfig::default())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        for config_path in &self.config_paths {
            if config_path.exists() {
                debug!(path = %config_path.display(), "merging configuration file");
                let file_config = Self::load_config_file(config_path)?;
                merge_toml_values(&mut merged, file_config);
            }
        }

        apply_environment_overrides(&mut merged, vars);

        let config: AnalysisConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;
        config.validate().map_err(ConfigError::Validation)?;

        info!(paths = self.config_paths.len(), "configuration loaded");
        Ok(config)
    }

    /// Parse a configuration from TOML text, filling gaps with defaults
    pub fn from_toml_str(content: &str) -> Result<AnalysisConfig, ConfigError> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate().map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Validate a configuration file without loading it
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map(|_| ())
    }

    /// Export a configuration to file as pretty TOML
    pub fn export_config<P: AsRef<Path>>(config: &AnalysisConfig, path: P) -> Result<(), ConfigError> {
        let toml_content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: toml::Value = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_environment_overrides<I>(config: &mut toml::Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(stripped) = key.strip_prefix(paths::ENV_PREFIX) else {
            continue;
        };
        let parts: Vec<String> = stripped
            .split(paths::ENV_SEPARATOR)
            .map(|part| part.to_lowercase())
            .collect();
        if parts.iter().any(|part| part.is_empty()) {
            continue;
        }

        debug!(variable = %key, "applying environment override");
        set_nested_value(config, &parts, parse_env_value(&value));
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    // Try parsing as different types
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn set_nested_value(config: &mut toml::Value, parts: &[String], value: toml::Value) {
    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = config;
    for part in parents {
        let toml::Value::Table(table) = current else {
            return;
        };
        current = table
            .entry(part.clone())
            .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
    }

    if let toml::Value::Table(table) = current {
        table.insert(last.clone(), value);
    }
}
