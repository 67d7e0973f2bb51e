use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::agent::definition::AgentDefinition;
use crate::agent::model::ModelBinding;
use crate::agent::tools::{ToolSet, WeatherTool};
use crate::config_manager::Settings;

pub const GEMMA_AGENT_NAME: &str = "gemma_agent";
pub const LLAMA_AGENT_NAME: &str = "llama_agent";

const GEMMA_INSTRUCTION: &str = "You are a friendly and helpful conversational assistant powered by the Gemma model.

You can help users with:
- General questions and conversations
- Providing information and explanations
- Creative writing and brainstorming
- Problem-solving discussions
- Educational content and explanations

Since you don't have access to real-time tools, you should be clear when you cannot provide current information like live weather data or perform calculations. Instead, offer to help explain how to do these things or provide general guidance.

Always be helpful, friendly, and engaging in your responses.";

const LLAMA_INSTRUCTION: &str = "You are a friendly and helpful assistant with access to useful tools.

Your capabilities include:
1. **Weather Information**: Get current weather conditions for major cities around the world. Call the get_weather tool for this.

When users ask about weather, use your tools to provide accurate information. Always be helpful, friendly, and provide clear responses based on the tool results. Your responses should be in text format, not JSON.";

/// Factory for the declared agents
pub struct AgentFactory;

impl AgentFactory {
    /// Create an agent by name.
    ///
    /// # Arguments
    /// * `agent_name` - `gemma_agent` or `llama_agent`
    /// * `settings` - Settings supplying model names and the model endpoint
    pub fn create_agent(agent_name: &str, settings: &Settings) -> Result<AgentDefinition> {
        info!("Initializing agent: {}", agent_name);

        match agent_name {
            GEMMA_AGENT_NAME => Ok(AgentDefinition {
                name: GEMMA_AGENT_NAME.to_string(),
                description: "A friendly conversational assistant powered by Gemma.".to_string(),
                instruction: GEMMA_INSTRUCTION.to_string(),
                model: ModelBinding::ollama_chat(
                    &settings.gemma_model_name,
                    &settings.ollama_api_base,
                ),
                tools: ToolSet::new(),
            }),
            LLAMA_AGENT_NAME => Ok(AgentDefinition {
                name: LLAMA_AGENT_NAME.to_string(),
                description: "A helpful assistant with weather tools.".to_string(),
                instruction: LLAMA_INSTRUCTION.to_string(),
                model: ModelBinding::ollama_chat(
                    &settings.llama_model_name,
                    &settings.ollama_api_base,
                ),
                tools: ToolSet::new().with(Arc::new(WeatherTool)),
            }),
            _ => Err(anyhow::anyhow!("Unsupported agent: {}", agent_name)),
        }
    }
}

/// Every declared agent, with the root entry point designated
#[derive(Debug, Clone)]
pub struct AgentCatalog {
    agents: Vec<AgentDefinition>,
    root: String,
}

impl AgentCatalog {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let agents = vec![
            AgentFactory::create_agent(GEMMA_AGENT_NAME, settings)?,
            AgentFactory::create_agent(LLAMA_AGENT_NAME, settings)?,
        ];
        Ok(Self {
            agents,
            // Llama carries the tools, so it serves as the default entry point
            root: LLAMA_AGENT_NAME.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&AgentDefinition> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn root(&self) -> Result<&AgentDefinition> {
        self.get(&self.root)
            .ok_or_else(|| anyhow::anyhow!("Root agent {} is not declared", self.root))
    }

    pub fn agents(&self) -> &[AgentDefinition] {
        &self.agents
    }
}
