use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::kpi::{AvailabilityScale, KpiSettings, StatusLabels};
use crate::table::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, is_page_size_option};

pub const CONFIG_ENV: &str = "DASHKPI_CONFIG";
pub const LOCAL_CONFIG: &str = "dashkpi.toml";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub base_url: String,
    /// Request timeout; no timeout when unset.
    pub timeout_secs: Option<u64>,
    pub page_size: usize,
    pub status: StatusLabels,
    pub availability: AvailabilityScale,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            page_size: DEFAULT_PAGE_SIZE,
            status: StatusLabels::default(),
            availability: AvailabilityScale::default(),
        }
    }
}

impl DashboardConfig {
    /// Search order: `--config`, `DASHKPI_CONFIG`, `./dashkpi.toml`, defaults.
    /// Only a failing `--config` path is fatal.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        Self::resolve(explicit, from_env.as_deref(), Path::new(LOCAL_CONFIG))
    }

    fn resolve(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        local: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!(path = %path.display(), "loaded config from --config");
            return Ok(config);
        }

        if let Some(path) = from_env {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(config) => {
                        info!(path = %path.display(), "loaded config from DASHKPI_CONFIG");
                        return Ok(config);
                    }
                    Err(error) => {
                        warn!(path = %path.display(), %error, "failed to load config from DASHKPI_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path.display(), "DASHKPI_CONFIG points to a missing file, falling back");
            }
        }

        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "loaded local config");
                    return Ok(config);
                }
                Err(error) => {
                    warn!(path = %local.display(), %error, "failed to load local config, using defaults");
                }
            }
        }

        info!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !is_page_size_option(self.page_size) {
            return Err(ConfigError::Invalid {
                key: "page_size",
                reason: format!("must be one of {PAGE_SIZE_OPTIONS:?}"),
            });
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be greater than zero; omit it to disable the timeout".to_string(),
            });
        }
        if let Some((label, _)) = self
            .availability
            .entries()
            .find(|(_, score)| !score.is_finite())
        {
            return Err(ConfigError::Invalid {
                key: "availability",
                reason: format!("score for '{label}' is not a finite number"),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn kpi_settings(&self) -> KpiSettings {
        KpiSettings {
            status: self.status.clone(),
            availability: self.availability.clone(),
        }
    }
}
