pub mod agent;
pub mod config;
pub mod config_manager;
pub mod error;
pub mod loadtest;
