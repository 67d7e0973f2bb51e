use serde_json::{json, Value};

use crate::agent::{GEMMA_AGENT_NAME, LLAMA_AGENT_NAME};
use crate::error::{ConfigError, SchedulerError};
use crate::loadtest::messages::{CONVERSATION_TOPICS, GEMMA_TOPICS};
use crate::loadtest::scheduler::{Pacing, WeightedTaskSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMethod {
    Post,
    Put,
}

/// Which message-submission contract the target deployment speaks.
/// The two are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionShape {
    /// Nested body posted to `/run`
    Run,
    /// Flat body posted to `/apps/{app}/users/{user}/conversations`
    Conversations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Conversation {
        app_name: &'static str,
        topics: &'static [&'static str],
    },
    WeatherQuery {
        app_name: &'static str,
    },
    TipQuery {
        app_name: &'static str,
    },
    HealthCheck,
}

impl Task {
    pub fn label(&self) -> &'static str {
        match self {
            Task::Conversation { .. } => "conversation",
            Task::WeatherQuery { .. } => "weather_query",
            Task::TipQuery { .. } => "tip_query",
            Task::HealthCheck => "health_check",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPolicy {
    pub text: &'static str,
    pub min_score: u8,
    pub max_score: u8,
}

/// Traffic model of one deployment under test
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: &'static str,
    pub session_method: SessionMethod,
    pub session_apps: Vec<&'static str>,
    pub initial_state: Value,
    pub submission: SubmissionShape,
    pub tasks: WeightedTaskSet<Task>,
    pub pacing: Pacing,
    pub feedback: Option<FeedbackPolicy>,
}

pub const PROFILE_NAMES: [&str; 2] = ["gemma", "production"];

impl Profile {
    /// Single Gemma agent behind the unified run endpoint, fast pacing
    pub fn gemma() -> Result<Self, SchedulerError> {
        Ok(Self {
            name: "gemma",
            session_method: SessionMethod::Post,
            session_apps: vec![GEMMA_AGENT_NAME],
            initial_state: json!({"user_type": "load_test_user"}),
            submission: SubmissionShape::Run,
            tasks: WeightedTaskSet::new(vec![
                (
                    Task::Conversation {
                        app_name: GEMMA_AGENT_NAME,
                        topics: &GEMMA_TOPICS,
                    },
                    4,
                ),
                (Task::HealthCheck, 1),
            ])?,
            pacing: Pacing::between_secs(1.0, 3.0)?,
            feedback: None,
        })
    }

    /// Gemma and Llama agents behind per-app conversation endpoints
    pub fn production() -> Result<Self, SchedulerError> {
        Ok(Self {
            name: "production",
            session_method: SessionMethod::Put,
            session_apps: vec![LLAMA_AGENT_NAME, GEMMA_AGENT_NAME],
            initial_state: json!({"user_type": "general_user", "session_count": 1}),
            submission: SubmissionShape::Conversations,
            tasks: WeightedTaskSet::new(vec![
                (
                    Task::WeatherQuery {
                        app_name: LLAMA_AGENT_NAME,
                    },
                    3,
                ),
                (
                    Task::TipQuery {
                        app_name: LLAMA_AGENT_NAME,
                    },
                    2,
                ),
                (
                    Task::Conversation {
                        app_name: GEMMA_AGENT_NAME,
                        topics: &CONVERSATION_TOPICS,
                    },
                    2,
                ),
                (Task::HealthCheck, 1),
            ])?,
            pacing: Pacing::between_secs(2.0, 5.0)?,
            feedback: Some(FeedbackPolicy {
                text: "Load test feedback - both Gemma and Llama agents working well",
                min_score: 4,
                max_score: 5,
            }),
        })
    }

    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "gemma" => Ok(Self::gemma()?),
            "production" => Ok(Self::production()?),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}
