use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config_manager::credentials::discover_project_id;
use crate::config_manager::utils::read_dotenv;
use crate::error::ConfigError;

/// Logger name agent-side events are emitted under
pub const AGENT_LOGGER_NAME: &str = "production-adk-agent";

/// Process-wide settings for the agent declarations.
///
/// Field names mirror the environment variables they are read from
/// (`GEMMA_MODEL_NAME` -> `gemma_model_name`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub google_cloud_project: Option<String>,

    #[serde(default = "default_location")]
    pub google_cloud_location: String,

    #[serde(default = "default_true")]
    pub google_genai_use_vertexai: bool,

    #[serde(default = "default_gemma_model_name")]
    pub gemma_model_name: String,

    #[serde(default = "default_llama_model_name")]
    pub llama_model_name: String,

    #[serde(default = "default_ollama_api_base")]
    pub ollama_api_base: String,
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_gemma_model_name() -> String {
    "gemma3:4b".to_string()
}

fn default_llama_model_name() -> String {
    "llama3.1:8b".to_string()
}

fn default_ollama_api_base() -> String {
    "http://localhost:11434".to_string()
}

impl Settings {
    /// Build settings from an optional dotenv file and the process environment.
    /// Process variables take precedence over the dotenv file.
    pub fn load(dotenv_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut vars = match dotenv_path {
            Some(path) => read_dotenv(path),
            None => HashMap::new(),
        };
        vars.extend(std::env::vars());
        Self::from_vars(vars)
    }

    /// Build settings from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut settings: Settings = config::Config::builder()
            .add_source(config::Environment::default().source(Some(source)))
            .build()?
            .try_deserialize()?;

        // `GOOGLE_CLOUD_PROJECT=` in a dotenv file means unset
        settings.google_cloud_project = settings
            .google_cloud_project
            .take()
            .filter(|p| !p.trim().is_empty());
        if settings.google_cloud_project.is_none() {
            settings.google_cloud_project = discover_project_id(&vars);
            match &settings.google_cloud_project {
                Some(project) => info!("Using project from default credentials: {}", project),
                None => debug!("No project id available from default credentials"),
            }
        }

        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            google_cloud_project: None,
            google_cloud_location: default_location(),
            google_genai_use_vertexai: default_true(),
            gemma_model_name: default_gemma_model_name(),
            llama_model_name: default_llama_model_name(),
            ollama_api_base: default_ollama_api_base(),
        }
    }
}
