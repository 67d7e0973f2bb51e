use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::loadtest::client::{AgentApi, AgentServiceClient};
use crate::loadtest::profile::Profile;
use crate::loadtest::scheduler::Pacing;
use crate::loadtest::stats::{RequestStats, StatsSnapshot};
use crate::loadtest::user::{SimulatedUser, UserReport};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub users: Vec<UserReport>,
    pub stats: StatsSnapshot,
}

impl RunSummary {
    pub fn feedback_count(&self) -> usize {
        self.users.iter().filter(|u| u.feedback_sent).count()
    }
}

/// Spawns simulated users against the agent service and stops them together
pub struct LoadRunner {
    config: RunConfig,
    profile: Arc<Profile>,
    api: Arc<dyn AgentApi>,
    stats: Arc<RequestStats>,
}

impl LoadRunner {
    /// Build a runner talking HTTP to `config.host`
    pub fn new(config: RunConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let mut profile = Profile::by_name(&config.profile)?;
        if let Some(wait) = config.wait_time {
            profile = profile.with_pacing(Pacing::between_secs(wait.min_secs, wait.max_secs)?);
        }

        let stats = Arc::new(RequestStats::new());
        let client = AgentServiceClient::new(
            &config.host,
            Duration::from_secs(config.request_timeout_secs),
            stats.clone(),
        )?;

        Ok(Self::with_api(config, profile, Arc::new(client), stats))
    }

    pub fn with_api(
        config: RunConfig,
        profile: Profile,
        api: Arc<dyn AgentApi>,
        stats: Arc<RequestStats>,
    ) -> Self {
        Self {
            config,
            profile: Arc::new(profile),
            api,
            stats,
        }
    }

    fn user_rng(&self, index: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_entropy(),
        }
    }

    /// Run for the configured duration, or until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let deadline = run_deadline(Instant::now(), self.config.run_time_secs);
        // with_api skips validation; an unrepresentable interval means "never"
        let spawn_interval =
            Duration::try_from_secs_f64(1.0 / self.config.spawn_rate).unwrap_or(Duration::MAX);
        let (stop_tx, stop_rx) = watch::channel(false);

        info!(
            "Starting load test: profile={}, host={}, users={}, spawn_rate={}/s, run_time={}s",
            self.profile.name,
            self.config.host,
            self.config.users,
            self.config.spawn_rate,
            self.config.run_time_secs
        );

        let mut handles = Vec::with_capacity(self.config.users);
        let mut interrupted = false;
        for index in 0..self.config.users {
            let user = SimulatedUser::new(self.profile.clone(), self.api.clone(), self.user_rng(index));
            handles.push(tokio::spawn(user.run(stop_rx.clone())));

            if index + 1 == self.config.users {
                info!("All {} users spawned", self.config.users);
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(spawn_interval) => {}
                _ = tokio::time::sleep_until(deadline) => break,
                _ = &mut shutdown => {
                    interrupted = true;
                    break;
                }
            }
        }

        if !interrupted {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {}
                _ = &mut shutdown => info!("Shutdown requested, stopping users"),
            }
        }

        // Users finish their in-flight task, then run their stop handler
        let _ = stop_tx.send(true);
        let mut users = Vec::with_capacity(handles.len());
        for result in join_all(handles).await {
            match result {
                Ok(report) => users.push(report),
                Err(e) => warn!("Simulated user task failed: {}", e),
            }
        }

        let summary = RunSummary {
            users,
            stats: self.stats.snapshot(),
        };
        info!(
            "Load test finished: {} users, {} requests, {} failures, {} feedback submissions",
            summary.users.len(),
            summary.stats.total.num_requests,
            summary.stats.total.num_failures,
            summary.feedback_count()
        );
        summary
    }
}

/// Resolve when `signal` fires. A signal that cannot be installed never
/// resolves, leaving the run to its deadline.
pub async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Failed to listen for shutdown signal, running until the deadline: {}", e);
        futures::future::pending::<()>().await;
    }
}

/// Longest deadline the runner schedules; larger run times are clamped
const MAX_RUN_TIME: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

fn run_deadline(start: Instant, run_time_secs: u64) -> Instant {
    let run_time = Duration::from_secs(run_time_secs).min(MAX_RUN_TIME);
    start
        .checked_add(run_time)
        .unwrap_or_else(|| start + Duration::from_secs(24 * 60 * 60))
}
