//! TOML configuration for training hyperparameters and domain layout.
//!
//! Every key is optional. A missing file yields the built-in defaults, which
//! reproduce the conventional `datasets/` and `models/` layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DomainSpec, default_specs};

/// Default filename looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "healthpredict.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Aggregate settings for a trainer or presenter run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub training: TrainingSettings,
    #[serde(default = "default_specs")]
    pub domains: Vec<DomainSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            training: TrainingSettings::default(),
            domains: default_specs(),
        }
    }
}

/// Hyperparameters shared by every domain's training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    /// Seed for the stratified split and solver permutation.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fraction of each class held out for validation.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Soft-margin penalty.
    #[serde(default = "default_c")]
    pub c: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            test_fraction: default_test_fraction(),
            c: default_c(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl TrainingSettings {
    /// Replace out-of-range values with their defaults.
    pub fn normalized(mut self) -> Self {
        if !(self.test_fraction.is_finite() && self.test_fraction > 0.0 && self.test_fraction < 1.0)
        {
            tracing::warn!(
                "test_fraction {} out of range (0, 1); using {}",
                self.test_fraction,
                default_test_fraction()
            );
            self.test_fraction = default_test_fraction();
        }
        if !(self.c.is_finite() && self.c > 0.0) {
            tracing::warn!("c {} must be > 0; using {}", self.c, default_c());
            self.c = default_c();
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            self.tolerance = default_tolerance();
        }
        self.max_iterations = self.max_iterations.max(1);
        self
    }
}

fn default_seed() -> u64 {
    2
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_c() -> f64 {
    1.0
}

fn default_tolerance() -> f64 {
    0.1
}

fn default_max_iterations() -> usize {
    1000
}

/// Load `explicit` if given, else `<root>/healthpredict.toml` if present, else defaults.
pub fn load_or_default(root: &Path, explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => load_from(path),
        None => {
            let path = root.join(CONFIG_FILE_NAME);
            if path.is_file() {
                load_from(&path)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

/// Parse a config file. Missing tables and keys fall back to defaults.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    config.training = config.training.normalized();
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiseaseDomain;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_or_default(dir.path(), None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.training.seed, 2);
        assert_eq!(config.domains.len(), 3);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[training]
seed = 7

[[domains]]
domain = "heart"
dataset = "data/heart_v2.csv"
model = "out/heart.json"
scaler = "out/heart_scaler.json"
label_column = "target"
"#,
        )
        .unwrap();
        let config = load_or_default(dir.path(), None).unwrap();
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.test_fraction, 0.2);
        assert_eq!(config.domains.len(), 1);
        assert_eq!(config.domains[0].domain, DiseaseDomain::Heart);
        assert_eq!(config.domains[0].id_column, None);
    }

    #[test]
    fn invalid_test_fraction_is_normalized() {
        let settings = TrainingSettings {
            test_fraction: 1.5,
            c: -1.0,
            ..TrainingSettings::default()
        }
        .normalized();
        assert_eq!(settings.test_fraction, 0.2);
        assert_eq!(settings.c, 1.0);
    }

    #[test]
    fn malformed_toml_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[training\nseed = ").unwrap();
        let err = load_or_default(dir.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }
}
