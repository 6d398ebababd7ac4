//! Clinicbot CLI — entry point.
//!
//! # Commands
//!
//! - `clinicbot chat [-m MESSAGE]` — talk to the assistant (single-shot or REPL)
//! - `clinicbot onboard` — initialize the config file
//! - `clinicbot status` — show configuration and provider status
//! - `clinicbot services` — list the clinic's services
//! - `clinicbot providers <SERVICE>` — list providers for a service id
//! - `clinicbot availability ...` — query free slots directly

mod booking_cmd;
mod helpers;
mod onboard;
mod repl;
mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use clinicbot_agent::AgentLoop;
use clinicbot_booking::BookingClient;
use clinicbot_core::config::{load_config, Config};
use clinicbot_providers::{create_provider, ChatRequestConfig};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🩺 Clinicbot — clinic appointment assistant
#[derive(Parser)]
#[command(name = "clinicbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Initialize the configuration file
    Onboard,

    /// Show configuration and provider status
    Status,

    /// List the clinic's services
    Services,

    /// List the providers for a service
    Providers {
        /// Service id (see `clinicbot services`)
        service: i64,
    },

    /// Query available slots directly
    Availability {
        /// Start of the date range (YYYY-MM-DDTHH:MM:SSZ). Defaults to now.
        #[arg(long)]
        date_init: Option<String>,

        /// End of the date range (YYYY-MM-DDTHH:MM:SSZ). Defaults to three months from now.
        #[arg(long)]
        date_end: Option<String>,

        /// Service ids, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        services: Vec<i64>,

        /// Provider ids, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        providers: Vec<i64>,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { message, logs } => {
            init_logging(logs);
            run_chat(message).await
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
        Commands::Services => {
            init_logging(false);
            booking_cmd::services().await
        }
        Commands::Providers { service } => {
            init_logging(false);
            booking_cmd::providers(service).await
        }
        Commands::Availability {
            date_init,
            date_end,
            services,
            providers,
        } => {
            init_logging(false);
            booking_cmd::availability(date_init, date_end, services, providers).await
        }
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>) -> Result<()> {
    let config = load_config(None);
    let agent = build_agent_loop(&config)?;

    match message {
        Some(msg) => {
            // Single-shot mode
            info!("processing single message");
            let response = agent
                .process(&msg)
                .await
                .context("agent processing failed")?;
            helpers::print_response(&response);
        }
        None => {
            // Interactive REPL mode
            repl::run(agent).await?;
        }
    }

    Ok(())
}

/// Build an `AgentLoop` from the loaded configuration.
fn build_agent_loop(config: &Config) -> Result<AgentLoop> {
    let provider = create_provider(config).map_err(|e| anyhow::anyhow!(e))?;
    let booking = Arc::new(BookingClient::new(&config.booking));

    Ok(AgentLoop::new(
        Arc::new(provider),
        booking,
        Some(config.agent.model.clone()),
        Some(config.agent.max_tool_iterations as usize),
        Some(ChatRequestConfig {
            max_tokens: config.agent.max_tokens,
            temperature: config.agent.temperature,
        }),
    ))
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("clinicbot=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
