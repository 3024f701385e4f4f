//! Dashboard configuration
//!
//! Read from `--config PATH`, otherwise from `<config dir>/pbs-dash/config.yml`
//! when that file exists. Command-line flags override file values.
//!
//! ```yaml
//! refresh_interval_secs: 15
//! snapshot: /shared/pbs/snapshot.json
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REFRESH_INTERVAL_SECS: f64 = 30.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("refresh interval must be a positive number of seconds, got {0}")]
    InvalidRefreshInterval(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Seconds between automatic refreshes of the dashboard
    pub refresh_interval_secs: f64,
    /// Snapshot file to display instead of the bundled sample data
    pub snapshot: Option<PathBuf>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            snapshot: None,
        }
    }
}

impl DashConfig {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pbs-dash").join("config.yml"))
    }

    /// Load from an explicit path, or from the default path if present
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // an empty file deserializes to unit, not a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply command-line overrides
    pub fn merge(mut self, refresh_interval_secs: Option<f64>, snapshot: Option<PathBuf>) -> Self {
        if let Some(secs) = refresh_interval_secs {
            self.refresh_interval_secs = secs;
        }
        if snapshot.is_some() {
            self.snapshot = snapshot;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.refresh_interval_secs;
        if secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err() {
            return Err(ConfigError::InvalidRefreshInterval(secs));
        }
        Ok(())
    }

    /// Refresh interval as a `Duration`; falls back to the default when
    /// the value has not passed `validate`
    pub fn refresh_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.refresh_interval_secs)
            .ok()
            .filter(|interval| !interval.is_zero())
            .unwrap_or(Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashConfig::default();
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert!(config.snapshot.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = DashConfig::from_yaml("snapshot: /tmp/s.json\n").unwrap();
        assert_eq!(config.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(DashConfig::from_yaml("  \n").unwrap(), DashConfig::default());
    }

    #[test]
    fn test_merge_overrides() {
        let config = DashConfig::default().merge(Some(5.0), Some(PathBuf::from("a.yml")));
        assert_eq!(config.refresh_interval_secs, 5.0);
        assert_eq!(config.snapshot, Some(PathBuf::from("a.yml")));

        let kept = config.clone().merge(None, None);
        assert_eq!(kept, config);
    }

    #[test]
    fn test_invalid_refresh_interval() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e300] {
            let config = DashConfig::default().merge(Some(secs), None);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidRefreshInterval(_))
            ));
            assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        }
    }

    #[test]
    fn test_huge_refresh_interval_in_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh_interval_secs: 1e300").unwrap();
        let err = DashConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRefreshInterval(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh_interval_secs: 2.5").unwrap();
        let config = DashConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_millis(2500));

        let err = DashConfig::load(Some(Path::new("/nonexistent/config.yml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
