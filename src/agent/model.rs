use serde::{Deserialize, Serialize};

/// Model backend an agent is bound to.
///
/// Dispatch happens in the agent framework; this only carries the
/// identifier and endpoint the framework needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelBinding {
    pub provider: String,
    pub model: String,
    pub api_base: String,
}

pub const OLLAMA_CHAT_PROVIDER: &str = "ollama_chat";

impl ModelBinding {
    pub fn ollama_chat(model: &str, api_base: &str) -> Self {
        Self {
            provider: OLLAMA_CHAT_PROVIDER.to_string(),
            model: model.to_string(),
            api_base: api_base.to_string(),
        }
    }

    /// Provider-qualified identifier, e.g. `ollama_chat/gemma3:4b`
    pub fn id(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}
