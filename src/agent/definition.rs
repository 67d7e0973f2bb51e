use serde::Serialize;

use crate::agent::model::ModelBinding;
use crate::agent::tools::{ToolSet, ToolSpec};

/// A configured agent persona: instructions, model binding and tools
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    pub instruction: String,
    pub model: ModelBinding,
    pub tools: ToolSet,
}

/// Serializable view of an agent definition
#[derive(Debug, Clone, Serialize)]
pub struct AgentDescriptor {
    pub name: String,
    pub description: String,
    pub model: String,
    pub api_base: String,
    pub instruction: String,
    pub tools: Vec<ToolSpec>,
}

impl AgentDefinition {
    pub fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            model: self.model.id(),
            api_base: self.model.api_base.clone(),
            instruction: self.instruction.clone(),
            tools: self.tools.specs(),
        }
    }
}
