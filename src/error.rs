use thiserror::Error;

/// Errors raised while loading settings or load test configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Invalid task schedule: {0}")]
    Schedule(#[from] SchedulerError),

    #[error("Unknown load test profile: {0}")]
    UnknownProfile(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised when an agent dispatches a tool call
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments for tool {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

/// Transport-level failures talking to the agent service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Task set is empty")]
    Empty,

    #[error("Invalid task weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid pacing delay: {0}")]
    InvalidDelay(String),

    #[error("Invalid pacing interval: min {min:?} is greater than max {max:?}")]
    InvalidPacing {
        min: std::time::Duration,
        max: std::time::Duration,
    },
}
