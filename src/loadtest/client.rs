use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::loadtest::payload::{ConversationRequest, FeedbackRequest, RunRequest, SessionCreate};
use crate::loadtest::profile::SessionMethod;
use crate::loadtest::stats::RequestStats;

/// Status and best-effort JSON body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// HTTP surface of the deployed agent service
#[async_trait]
pub trait AgentApi: Send + Sync {
    async fn create_session(
        &self,
        method: SessionMethod,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        body: &SessionCreate,
    ) -> Result<ApiResponse, ApiError>;

    async fn run(&self, request: &RunRequest) -> Result<ApiResponse, ApiError>;

    async fn converse(
        &self,
        app_name: &str,
        user_id: &str,
        request: &ConversationRequest,
    ) -> Result<ApiResponse, ApiError>;

    async fn health(&self) -> Result<ApiResponse, ApiError>;

    async fn feedback(&self, request: &FeedbackRequest) -> Result<ApiResponse, ApiError>;
}

/// reqwest-backed client that records every request into shared stats
#[derive(Debug, Clone)]
pub struct AgentServiceClient {
    client: Client,
    base_url: String,
    stats: Arc<RequestStats>,
}

impl AgentServiceClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        stats: Arc<RequestStats>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            stats,
        })
    }

    pub fn stats(&self) -> &Arc<RequestStats> {
        &self.stats
    }

    async fn send(
        &self,
        method: &str,
        name: &str,
        request: RequestBuilder,
    ) -> Result<ApiResponse, ApiError> {
        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.stats.record(method, name, started.elapsed(), false);
                debug!("{} {} failed: {}", method, name, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.stats.record(method, name, started.elapsed(), false);
                return Err(e.into());
            }
        };
        self.stats
            .record(method, name, started.elapsed(), status.is_success());
        debug!("{} {} -> {}", method, name, status);

        Ok(ApiResponse {
            status: status.as_u16(),
            body: serde_json::from_slice(&bytes).ok(),
        })
    }
}

#[async_trait]
impl AgentApi for AgentServiceClient {
    async fn create_session(
        &self,
        method: SessionMethod,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        body: &SessionCreate,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!(
            "{}/apps/{}/users/{}/sessions/{}",
            self.base_url, app_name, user_id, session_id
        );
        let name = format!("/apps/{}/users/[user_id]/sessions/[session_id]", app_name);
        let (label, request) = match method {
            SessionMethod::Post => ("POST", self.client.post(&url)),
            SessionMethod::Put => ("PUT", self.client.put(&url)),
        };
        self.send(label, &name, request.json(body)).await
    }

    async fn run(&self, request: &RunRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/run", self.base_url);
        self.send("POST", "/run", self.client.post(&url).json(request))
            .await
    }

    async fn converse(
        &self,
        app_name: &str,
        user_id: &str,
        request: &ConversationRequest,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!(
            "{}/apps/{}/users/{}/conversations",
            self.base_url, app_name, user_id
        );
        let name = format!("/apps/{}/users/[user_id]/conversations", app_name);
        self.send("POST", &name, self.client.post(&url).json(request))
            .await
    }

    async fn health(&self) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/health", self.base_url);
        self.send("GET", "/health", self.client.get(&url)).await
    }

    async fn feedback(&self, request: &FeedbackRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/feedback", self.base_url);
        self.send("POST", "/feedback", self.client.post(&url).json(request))
            .await
    }
}
