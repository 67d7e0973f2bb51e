//! Load generator driving simulated users against the deployed agent service.

pub mod client;
pub mod messages;
pub mod payload;
pub mod profile;
pub mod runner;
pub mod scheduler;
pub mod stats;
pub mod user;

pub use client::{AgentApi, AgentServiceClient, ApiResponse};
pub use profile::{Profile, SessionMethod, SubmissionShape, Task};
pub use runner::{shutdown_signal, LoadRunner, RunSummary};
pub use scheduler::{Pacing, WeightedTaskSet};
pub use stats::{RequestStats, StatsSnapshot};
pub use user::{SimulatedUser, UserReport};
