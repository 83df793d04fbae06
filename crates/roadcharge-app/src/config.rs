//! Configuration management for swiss-road-charge
//!
//! Config stored at: ~/.config/swiss-road-charge/config.json

use std::path::{Path, PathBuf};

use roadcharge_types::{
    ConfigError, EstimationStrategy, OutputFormat, OwnershipWindow, Result,
};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Ownership years charged by the federal fee
    #[serde(default = "default_federal_window")]
    pub federal_window: OwnershipWindow,

    /// Ownership years charged by the cantonal tax
    #[serde(default = "default_cantonal_window")]
    pub cantonal_window: OwnershipWindow,

    /// Class-band estimation when a vehicle does not name one
    #[serde(default)]
    pub weight_strategy: EstimationStrategy,

    /// TOML tariff book replacing the embedded one
    #[serde(default)]
    pub tariff_file: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Worker threads for fleet evaluation, 0 = one per CPU
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_federal_window() -> OwnershipWindow {
    OwnershipWindow::ExcludeResaleYear
}

fn default_cantonal_window() -> OwnershipWindow {
    OwnershipWindow::IncludeResaleYear
}

fn default_jobs() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            federal_window: default_federal_window(),
            cantonal_window: default_cantonal_window(),
            weight_strategy: EstimationStrategy::default(),
            tariff_file: None,
            output_format: OutputFormat::default(),
            jobs: default_jobs(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("swiss-road-charge");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Worker count with `0` resolved to the CPU count
    pub fn effective_jobs(&self) -> usize {
        resolve_jobs(self.jobs)
    }
}

/// Worker count for a `jobs` setting, `0` meaning one per CPU
pub fn resolve_jobs(jobs: usize) -> usize {
    match jobs {
        0 => num_cpus::get(),
        n => n,
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Swiss Road Charge Configuration")?;
        writeln!(f, "===============================")?;
        writeln!(f)?;
        writeln!(f, "Federal window:   {}", self.federal_window)?;
        writeln!(f, "Cantonal window:  {}", self.cantonal_window)?;
        writeln!(f, "Weight strategy:  {}", self.weight_strategy)?;
        writeln!(
            f,
            "Tariff file:      {}",
            self.tariff_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(embedded)".to_string())
        )?;
        writeln!(f, "Output format:    {}", self.output_format)?;
        writeln!(
            f,
            "Jobs:             {}",
            if self.jobs == 0 {
                "auto".to_string()
            } else {
                self.jobs.to_string()
            }
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadcharge_types::Error;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.federal_window, OwnershipWindow::ExcludeResaleYear);
        assert_eq!(config.cantonal_window, OwnershipWindow::IncludeResaleYear);
        assert_eq!(config.weight_strategy, EstimationStrategy::Midpoint);
        assert!(config.tariff_file.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            federal_window: OwnershipWindow::IncludeResaleYear,
            weight_strategy: EstimationStrategy::Upper,
            tariff_file: Some(PathBuf::from("/etc/tariffs.toml")),
            jobs: 0,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"cantonal_window": "exclude-resale-year"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.cantonal_window, OwnershipWindow::ExcludeResaleYear);
        assert_eq!(config.federal_window, OwnershipWindow::ExcludeResaleYear);
        assert_eq!(config.jobs, 4);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_effective_jobs() {
        let config = Config {
            jobs: 0,
            ..Config::default()
        };
        assert!(config.effective_jobs() >= 1);
        assert_eq!(resolve_jobs(3), 3);
    }
}
