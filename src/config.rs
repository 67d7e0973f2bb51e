use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config_manager::utils::read_config_text;
use crate::error::ConfigError;

/// Load test run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base URL of the deployed agent service
    #[serde(default = "default_host")]
    pub host: String,

    /// Deployment profile name ("gemma" or "production")
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Number of simulated users to reach
    #[serde(default = "default_users")]
    pub users: usize,

    /// Users started per second
    #[serde(default = "default_spawn_rate")]
    pub spawn_rate: f64,

    #[serde(default = "default_run_time_secs")]
    pub run_time_secs: u64,

    /// Seed for reproducible task selection; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Overrides the profile's pacing interval
    #[serde(default)]
    pub wait_time: Option<WaitTime>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WaitTime {
    pub min_secs: f64,
    pub max_secs: f64,
}

fn default_host() -> String {
    "http://localhost:8080".to_string()
}

fn default_profile() -> String {
    "production".to_string()
}

fn default_users() -> usize {
    10
}

fn default_spawn_rate() -> f64 {
    1.0
}

fn default_run_time_secs() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// File names tried when no explicit config path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = ["loadtest.yaml", "loadtest.yml", "loadtest.json"];

impl RunConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = read_config_text(path)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        let config: RunConfig = if path_lower.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `CONFIG_PATH`, then the default candidates.
    ///
    /// Returns the defaults (and no path) when no file is present.
    pub fn discover(explicit: Option<&str>) -> Result<(Self, Option<String>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_string())));
        }

        let candidates: Vec<String> = std::env::var("CONFIG_PATH")
            .ok()
            .into_iter()
            .chain(DEFAULT_CONFIG_PATHS.iter().map(|p| p.to_string()))
            .collect();

        for path in candidates {
            match Self::load(&path) {
                Ok(cfg) => return Ok((cfg, Some(path))),
                Err(ConfigError::NotFound(_)) => {
                    debug!("No load test config at {}", path);
                }
                Err(e) => return Err(e),
            }
        }

        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "host",
                reason: "must not be empty".to_string(),
            });
        }
        if self.host.contains("${") {
            return Err(ConfigError::Invalid {
                field: "host",
                reason: format!("unresolved variable in {}", self.host),
            });
        }
        match Url::parse(&self.host) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "host",
                    reason: format!("expected an http(s) URL, got {}", url),
                })
            }
            Err(e) => {
                return Err(ConfigError::Invalid {
                    field: "host",
                    reason: format!("{}: {}", self.host, e),
                })
            }
        }
        if !(self.spawn_rate > 0.0 && self.spawn_rate.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "spawn_rate",
                reason: format!("must be positive, got {}", self.spawn_rate),
            });
        }
        // the runner sleeps 1/spawn_rate between spawns
        if let Err(e) = Duration::try_from_secs_f64(1.0 / self.spawn_rate) {
            return Err(ConfigError::Invalid {
                field: "spawn_rate",
                reason: format!("spawn interval for {} users/s: {}", self.spawn_rate, e),
            });
        }
        if let Some(wait) = &self.wait_time {
            if wait.min_secs < 0.0 || wait.min_secs > wait.max_secs || !wait.max_secs.is_finite() {
                return Err(ConfigError::Invalid {
                    field: "wait_time",
                    reason: format!("invalid interval [{}, {}]", wait.min_secs, wait.max_secs),
                });
            }
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            profile: default_profile(),
            users: default_users(),
            spawn_rate: default_spawn_rate(),
            run_time_secs: default_run_time_secs(),
            seed: None,
            wait_time: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
