use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::loadtest::client::AgentApi;
use crate::loadtest::messages;
use crate::loadtest::payload::{
    extract_conversation_id, Content, ConversationRequest, FeedbackRequest, RunRequest,
    SessionCreate,
};
use crate::loadtest::profile::{Profile, SubmissionShape, Task};

/// What one simulated user did over its lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct UserReport {
    pub user_id: String,
    pub tasks_run: u64,
    pub feedback_sent: bool,
}

/// One virtual client running the profile's task mix
pub struct SimulatedUser {
    user_id: String,
    session_id: String,
    conversation_id: Option<String>,
    profile: Arc<Profile>,
    api: Arc<dyn AgentApi>,
    rng: StdRng,
}

impl SimulatedUser {
    /// Create a user with fresh identifiers
    pub fn new(profile: Arc<Profile>, api: Arc<dyn AgentApi>, rng: StdRng) -> Self {
        Self {
            user_id: format!("user_{}", Uuid::new_v4()),
            session_id: format!("session_{}", Uuid::new_v4()),
            conversation_id: None,
            profile,
            api,
            rng,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Create the user's session on every app under test.
    /// Failures are left to the statistics; the user carries on.
    pub async fn on_start(&mut self) {
        let body = SessionCreate {
            state: self.profile.initial_state.clone(),
        };
        for app_name in &self.profile.session_apps {
            if let Err(e) = self
                .api
                .create_session(
                    self.profile.session_method,
                    app_name,
                    &self.user_id,
                    &self.session_id,
                    &body,
                )
                .await
            {
                debug!("Session creation for {} failed: {}", app_name, e);
            }
        }
    }

    pub async fn run_task(&mut self, task: Task) {
        match task {
            Task::Conversation { app_name, topics } => {
                let message = messages::topic(topics, &mut self.rng);
                self.submit(app_name, message).await;
            }
            Task::WeatherQuery { app_name } => {
                let message = messages::weather_query(&mut self.rng);
                self.submit(app_name, message).await;
            }
            Task::TipQuery { app_name } => {
                let message = messages::tip_query(&mut self.rng);
                self.submit(app_name, message).await;
            }
            Task::HealthCheck => {
                if let Err(e) = self.api.health().await {
                    debug!("Health check failed: {}", e);
                }
            }
        }
    }

    async fn submit(&mut self, app_name: &str, message: String) {
        let result = match self.profile.submission {
            SubmissionShape::Run => {
                let request = RunRequest {
                    app_name: app_name.to_string(),
                    user_id: self.user_id.clone(),
                    session_id: self.session_id.clone(),
                    new_message: Content::user_text(message),
                };
                self.api.run(&request).await
            }
            SubmissionShape::Conversations => {
                let request = ConversationRequest {
                    message,
                    session_id: self.session_id.clone(),
                };
                self.api.converse(app_name, &self.user_id, &request).await
            }
        };

        match result {
            Ok(response) if response.is_ok() => {
                if let Some(id) = response.body.as_ref().and_then(extract_conversation_id) {
                    self.conversation_id = Some(id);
                }
            }
            Ok(_) => {}
            Err(e) => debug!("Message submission to {} failed: {}", app_name, e),
        }
    }

    /// Send one feedback record if a conversation id was captured.
    /// Returns whether feedback was submitted.
    pub async fn on_stop(&mut self) -> bool {
        let Some(policy) = self.profile.feedback.clone() else {
            return false;
        };
        let Some(invocation_id) = self.conversation_id.take() else {
            return false;
        };

        let request = FeedbackRequest {
            score: self.rng.gen_range(policy.min_score..=policy.max_score),
            text: policy.text.to_string(),
            invocation_id,
            user_id: self.user_id.clone(),
        };
        if let Err(e) = self.api.feedback(&request).await {
            debug!("Feedback submission failed: {}", e);
        }
        true
    }

    /// Run the user until `stop` flips to true.
    ///
    /// A task in flight completes before the stop is observed; the pacing
    /// sleep is cut short.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> UserReport {
        self.on_start().await;

        let mut tasks_run = 0;
        loop {
            if *stop.borrow() {
                break;
            }
            let task = self.profile.tasks.pick(&mut self.rng);
            self.run_task(task).await;
            tasks_run += 1;

            let delay = self.profile.pacing.sample(&mut self.rng);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = stop.changed() => break,
            }
        }

        let feedback_sent = self.on_stop().await;
        info!(
            "User {} stopped after {} tasks (feedback sent: {})",
            self.user_id, tasks_run, feedback_sent
        );
        UserReport {
            user_id: self.user_id,
            tasks_run,
            feedback_sent,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::loadtest::client::ApiResponse;
    use crate::loadtest::profile::SessionMethod;
    use async_trait::async_trait;
    use rand::SeedableRng;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Session {
            method: SessionMethod,
            app_name: String,
            user_id: String,
            session_id: String,
            state: Value,
        },
        Run(RunRequest),
        Converse {
            app_name: String,
            user_id: String,
            request: ConversationRequest,
        },
        Health,
        Feedback(FeedbackRequest),
    }

    /// Records calls and replays scripted message-submission responses
    #[derive(Default)]
    pub struct ScriptedApi {
        pub calls: Mutex<Vec<(Instant, Call)>>,
        pub replies: Mutex<VecDeque<ApiResponse>>,
    }

    impl ScriptedApi {
        pub fn with_replies(replies: Vec<ApiResponse>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(replies.into()),
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, c)| c.clone())
                .collect()
        }

        fn push(&self, call: Call) {
            self.calls.lock().unwrap().push((Instant::now(), call));
        }

        fn next_reply(&self) -> ApiResponse {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ApiResponse {
                    status: 200,
                    body: None,
                })
        }
    }

    #[async_trait]
    impl AgentApi for ScriptedApi {
        async fn create_session(
            &self,
            method: SessionMethod,
            app_name: &str,
            user_id: &str,
            session_id: &str,
            body: &SessionCreate,
        ) -> Result<ApiResponse, ApiError> {
            self.push(Call::Session {
                method,
                app_name: app_name.to_string(),
                user_id: user_id.to_string(),
                session_id: session_id.to_string(),
                state: body.state.clone(),
            });
            Ok(ApiResponse {
                status: 200,
                body: None,
            })
        }

        async fn run(&self, request: &RunRequest) -> Result<ApiResponse, ApiError> {
            self.push(Call::Run(request.clone()));
            Ok(self.next_reply())
        }

        async fn converse(
            &self,
            app_name: &str,
            user_id: &str,
            request: &ConversationRequest,
        ) -> Result<ApiResponse, ApiError> {
            self.push(Call::Converse {
                app_name: app_name.to_string(),
                user_id: user_id.to_string(),
                request: request.clone(),
            });
            Ok(self.next_reply())
        }

        async fn health(&self) -> Result<ApiResponse, ApiError> {
            self.push(Call::Health);
            Ok(ApiResponse {
                status: 200,
                body: Some(json!({"status": "ok"})),
            })
        }

        async fn feedback(&self, request: &FeedbackRequest) -> Result<ApiResponse, ApiError> {
            self.push(Call::Feedback(request.clone()));
            Ok(ApiResponse {
                status: 200,
                body: None,
            })
        }
    }

    fn user(profile: Profile, api: &Arc<ScriptedApi>) -> SimulatedUser {
        let api: Arc<dyn AgentApi> = api.clone();
        SimulatedUser::new(Arc::new(profile), api, StdRng::seed_from_u64(17))
    }

    fn feedback_calls(api: &ScriptedApi) -> Vec<FeedbackRequest> {
        api.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Feedback(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_identifiers_are_unique_per_user() {
        let api = Arc::new(ScriptedApi::default());
        let profile = Profile::production().unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1_000 {
            let u = user(profile.clone(), &api);
            assert!(u.user_id().starts_with("user_"));
            assert!(u.session_id().starts_with("session_"));
            assert!(seen.insert(u.user_id().to_string()));
            assert!(seen.insert(u.session_id().to_string()));
        }
    }

    #[tokio::test]
    async fn test_session_created_once_per_app() {
        let api = Arc::new(ScriptedApi::default());
        let mut u = user(Profile::production().unwrap(), &api);
        u.on_start().await;

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        for (call, expected_app) in calls.iter().zip(["llama_agent", "gemma_agent"]) {
            match call {
                Call::Session {
                    method,
                    app_name,
                    user_id,
                    session_id,
                    state,
                } => {
                    assert_eq!(*method, SessionMethod::Put);
                    assert_eq!(app_name, expected_app);
                    assert_eq!(user_id, u.user_id());
                    assert_eq!(session_id, u.session_id());
                    assert_eq!(state, &json!({"user_type": "general_user", "session_count": 1}));
                }
                other => panic!("unexpected call {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_feedback_references_captured_id() {
        let api = Arc::new(ScriptedApi::with_replies(vec![ApiResponse {
            status: 200,
            body: Some(json!({"response": "Sunny", "conversation_id": "abc"})),
        }]));
        let mut u = user(Profile::production().unwrap(), &api);
        u.on_start().await;
        u.run_task(Task::WeatherQuery {
            app_name: "llama_agent",
        })
        .await;
        u.run_task(Task::HealthCheck).await;
        assert_eq!(u.conversation_id(), Some("abc"));

        assert!(u.on_stop().await);
        // a second stop must not resend
        assert!(!u.on_stop().await);

        let feedback = feedback_calls(&api);
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].invocation_id, "abc");
        assert_eq!(feedback[0].user_id, u.user_id());
        assert!((4..=5).contains(&feedback[0].score));
        assert_eq!(
            feedback[0].text,
            "Load test feedback - both Gemma and Llama agents working well"
        );
    }

    #[tokio::test]
    async fn test_no_feedback_without_conversation_id() {
        let api = Arc::new(ScriptedApi::with_replies(vec![
            ApiResponse {
                status: 200,
                body: Some(json!({"response": "Sure"})),
            },
            ApiResponse {
                status: 500,
                body: Some(json!({"conversation_id": "ignored"})),
            },
        ]));
        let mut u = user(Profile::production().unwrap(), &api);
        u.on_start().await;
        u.run_task(Task::TipQuery {
            app_name: "llama_agent",
        })
        .await;
        u.run_task(Task::WeatherQuery {
            app_name: "llama_agent",
        })
        .await;

        assert!(!u.on_stop().await);
        assert!(feedback_calls(&api).is_empty());
    }

    #[tokio::test]
    async fn test_run_shape_for_gemma_profile() {
        let api = Arc::new(ScriptedApi::default());
        let mut u = user(Profile::gemma().unwrap(), &api);
        u.run_task(Task::Conversation {
            app_name: "gemma_agent",
            topics: &messages::GEMMA_TOPICS,
        })
        .await;

        match &api.calls()[0] {
            Call::Run(request) => {
                assert_eq!(request.app_name, "gemma_agent");
                assert_eq!(request.user_id, u.user_id());
                assert_eq!(request.session_id, u.session_id());
                assert_eq!(request.new_message.role, "user");
                assert!(messages::GEMMA_TOPICS.contains(&request.new_message.parts[0].text.as_str()));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_flat_shape_for_production_profile() {
        let api = Arc::new(ScriptedApi::default());
        let mut u = user(Profile::production().unwrap(), &api);
        u.run_task(Task::Conversation {
            app_name: "gemma_agent",
            topics: &messages::CONVERSATION_TOPICS,
        })
        .await;

        match &api.calls()[0] {
            Call::Converse {
                app_name,
                user_id,
                request,
            } => {
                assert_eq!(app_name, "gemma_agent");
                assert_eq!(user_id, u.user_id());
                assert_eq!(request.session_id, u.session_id());
                assert!(messages::CONVERSATION_TOPICS.contains(&request.message.as_str()));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_between_tasks() {
        let api = Arc::new(ScriptedApi::default());
        let profile = Profile::gemma().unwrap();
        let (min, max) = (profile.pacing.min(), profile.pacing.max());
        let u = user(profile, &api);

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(u.run(stop_rx));
        tokio::time::sleep(std::time::Duration::from_secs(120)).await;
        stop_tx.send(true).unwrap();
        let report = handle.await.unwrap();

        let task_times: Vec<Instant> = api
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c)| !matches!(c, Call::Session { .. }))
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(task_times.len() as u64, report.tasks_run);
        assert!(report.tasks_run >= 40, "only {} tasks", report.tasks_run);
        // the timer wheel rounds deadlines up to the next millisecond
        let slack = std::time::Duration::from_millis(2);
        for pair in task_times.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= min && gap <= max + slack, "gap {:?} outside pacing", gap);
        }
        // gemma deployment never sends feedback
        assert!(!report.feedback_sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_task_still_finalizes() {
        let api = Arc::new(ScriptedApi::default());
        let u = user(Profile::production().unwrap(), &api);
        let (stop_tx, stop_rx) = watch::channel(false);
        stop_tx.send(true).unwrap();
        let report = u.run(stop_rx).await;
        assert_eq!(report.tasks_run, 0);
        assert!(!report.feedback_sent);
        assert_eq!(api.calls().len(), 2);
    }
}
