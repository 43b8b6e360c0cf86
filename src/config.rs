//! Run configuration
//!
//! Read from a YAML file (`--config`, else `<config_dir>/multihop/config.yaml`
//! when it exists), every field defaulted. Command-line flags are applied on
//! top through [`Overrides`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which entity linker to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkerConfig {
    /// Gazetteer file, YAML or JSON lines
    Lexicon { path: PathBuf },
    /// External program speaking JSON on stdin/stdout
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory receiving output files
    pub out_path: PathBuf,
    /// Corpus entries per linker call
    pub batch_size: usize,
    /// Files processed concurrently
    pub jobs: usize,
    /// Also write pre-restoration relations, the fact table and the corpus
    pub debug: bool,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub linker: Option<LinkerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from("."),
            batch_size: 8,
            jobs: 4,
            debug: false,
            log_level: "info".to_string(),
            linker: None,
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub out_path: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub jobs: Option<usize>,
    pub debug: bool,
    pub log_level: Option<String>,
    pub linker: Option<LinkerConfig>,
}

/// Default config file location (`~/.config/multihop/config.yaml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("multihop").join("config.yaml"))
}

impl Config {
    /// Load the explicit file if given, else the default file if present,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(out_path) = overrides.out_path {
            self.out_path = out_path;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(jobs) = overrides.jobs {
            self.jobs = jobs;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        if let Some(linker) = overrides.linker {
            self.linker = Some(linker);
        }
        self.debug |= overrides.debug;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".to_string()));
        }
        if self.jobs == 0 {
            return Err(ConfigError::Invalid("jobs must be at least 1".to_string()));
        }
        if let Some(LinkerConfig::Command { program, .. }) = &self.linker {
            if program.trim().is_empty() {
                return Err(ConfigError::Invalid("linker program is empty".to_string()));
            }
        }
        Ok(())
    }
}
