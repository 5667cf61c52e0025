use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::content::classifier::DEFAULT_SAMPLE_LINES;
use crate::content::renpy::{DEFAULT_MIN_CONFIDENCE, DEFAULT_WARNING_CONFIDENCE};
use crate::errors::ConfigError;

/// Application configuration module
/// This module handles loading, validating and saving the settings shared
/// by the validators and the command-line front-end.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Root folder holding one extraction output folder per game
    #[serde(default = "default_temp_root")]
    pub temp_root: PathBuf,

    /// Whether the duplicates file is checked before reconstruction
    #[serde(default)]
    pub detect_duplicates: bool,

    /// Content classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Ren'Py script validator settings
    #[serde(default)]
    pub renpy: RenpyConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the content classifier
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// Number of non-empty lines sampled from the top of a file
    #[serde(default = "default_sample_lines")]
    pub sample_lines: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_lines: default_sample_lines(),
        }
    }
}

/// Settings for the Ren'Py script validator
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenpyConfig {
    /// Confidence a script must exceed to be accepted
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Confidence under which an accepted script still gets a warning
    #[serde(default = "default_warning_confidence")]
    pub warning_confidence: f64,
}

impl Default for RenpyConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            warning_confidence: default_warning_confidence(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_temp_root() -> PathBuf {
    // RenExtract keeps its working folders under the user's data directory
    dirs::data_dir()
        .map(|dir| dir.join("RenExtract").join("temporaires"))
        .unwrap_or_else(|| PathBuf::from("temporaires"))
}

fn default_sample_lines() -> usize {
    DEFAULT_SAMPLE_LINES
}

fn default_min_confidence() -> f64 {
    DEFAULT_MIN_CONFIDENCE
}

fn default_warning_confidence() -> f64 {
    DEFAULT_WARNING_CONFIDENCE
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.classifier.sample_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "classifier.sample_lines",
                message: "must be at least 1".to_string(),
            });
        }

        let renpy = &self.renpy;
        for (field, value) in [
            ("renpy.min_confidence", renpy.min_confidence),
            ("renpy.warning_confidence", renpy.warning_confidence),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: format!("{} is outside 0-100", value),
                });
            }
        }
        if renpy.warning_confidence < renpy.min_confidence {
            return Err(ConfigError::InvalidValue {
                field: "renpy.warning_confidence",
                message: format!(
                    "{} is below min_confidence {}",
                    renpy.warning_confidence, renpy.min_confidence
                ),
            });
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Load the configuration, writing the defaults first if the file does
    /// not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            temp_root: default_temp_root(),
            detect_duplicates: false,
            classifier: ClassifierConfig::default(),
            renpy: RenpyConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
