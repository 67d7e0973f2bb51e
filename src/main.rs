use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use adk_agent_loadgen::agent::tools::WEATHER_TOOL_NAME;
use adk_agent_loadgen::agent::AgentCatalog;
use adk_agent_loadgen::config::RunConfig;
use adk_agent_loadgen::config_manager::Settings;
use adk_agent_loadgen::loadtest::{shutdown_signal, LoadRunner};

#[derive(Parser)]
#[command(name = "adk-agent-loadgen", version, about = "ADK agent declarations and autoscaling load generator")]
struct Cli {
    /// dotenv file supplying agent settings
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a load test against the deployed agent service
    Run {
        /// YAML or JSON run configuration
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        host: Option<String>,
        /// Deployment profile: gemma or production
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        users: Option<usize>,
        #[arg(long)]
        spawn_rate: Option<f64>,
        /// Run time in seconds
        #[arg(long)]
        run_time: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
        /// Print the final statistics as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Print the declared agents
    Agents,
    /// Ask the root agent's weather tool about a city
    Weather { city: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("adk_agent_loadgen=info,production-adk-agent=info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            config,
            host,
            profile,
            users,
            spawn_rate,
            run_time,
            seed,
            json,
        } => {
            let (mut run_config, loaded_path) = RunConfig::discover(config.as_deref())?;
            match loaded_path {
                Some(path) => info!("Loaded load test configuration from: {}", path),
                None => info!("No load test configuration file found, using defaults"),
            }

            if let Some(host) = host {
                run_config.host = host;
            }
            if let Some(profile) = profile {
                run_config.profile = profile;
            }
            if let Some(users) = users {
                run_config.users = users;
            }
            if let Some(spawn_rate) = spawn_rate {
                run_config.spawn_rate = spawn_rate;
            }
            if let Some(run_time) = run_time {
                run_config.run_time_secs = run_time;
            }
            if seed.is_some() {
                run_config.seed = seed;
            }

            let runner = LoadRunner::new(run_config)?;
            let summary = runner
                .run(shutdown_signal(tokio::signal::ctrl_c()))
                .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary.stats)?);
            } else {
                println!("{}", summary.stats.render_table());
            }
        }
        Command::Agents => {
            let settings = Settings::load(Some(cli.env_file.as_path()))?;
            let catalog = AgentCatalog::from_settings(&settings)?;
            let root = catalog.root()?.name.clone();
            let descriptors: Vec<_> = catalog.agents().iter().map(|a| a.descriptor()).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "root_agent": root,
                    "project": settings.google_cloud_project,
                    "location": settings.google_cloud_location,
                    "use_vertexai": settings.google_genai_use_vertexai,
                    "agents": descriptors,
                }))?
            );
        }
        Command::Weather { city } => {
            let settings = Settings::load(Some(cli.env_file.as_path()))?;
            let catalog = AgentCatalog::from_settings(&settings)?;
            let report = catalog
                .root()?
                .tools
                .dispatch(WEATHER_TOOL_NAME, json!({ "city": city }))?;
            println!("{}", report.as_str().unwrap_or_default());
        }
    }

    Ok(())
}
