//! ACAS gateway binary
//!
//! Serves the HTTP API or runs one hub operation from the command line.

use acas_gateway::config::Config;
use acas_gateway::core::ProviderHub;
use acas_gateway::core::providers::secrets::EnvSecretResolver;
use acas_gateway::core::types::RequestEnvelope;
use acas_gateway::server;
use acas_gateway::utils::logging::init_logging;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Provider gateway for the ACAS coding assistant
#[derive(Parser, Debug)]
#[command(name = "acas-gateway", version, about)]
struct Cli {
    /// YAML configuration file
    #[arg(long, short, global = true, env = "ACAS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// List configured providers
    Providers {
        /// Only providers with this enabled flag
        #[arg(long)]
        enabled: Option<bool>,
    },
    /// Probe one provider, or every enabled provider
    Test {
        /// Provider id
        id: Option<String>,
    },
    /// Send one prompt, falling back through the given providers in order
    Dispatch {
        /// Provider id; repeat for a fallback chain
        #[arg(long = "provider", short = 'p')]
        providers: Vec<String>,
        /// Prompt text
        #[arg(long)]
        prompt: String,
        /// System prompt
        #[arg(long)]
        system: Option<String>,
        /// Per-attempt timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Retries after the first attempt
        #[arg(long)]
        retries: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config).await?;
    init_logging(config.logging())?;

    let command = cli.command.unwrap_or(Command::Serve);
    if let Command::Serve = command {
        server::run_server(config).await?;
        return Ok(());
    }

    let hub = ProviderHub::from_config(&config.gateway, Arc::new(EnvSecretResolver))
        .context("failed to build providers")?;

    match command {
        Command::Serve => {}
        Command::Providers { enabled } => print_json(&hub.list_providers(enabled))?,
        Command::Test { id: Some(id) } => print_json(&hub.test_provider(&id).await?)?,
        Command::Test { id: None } => print_json(&hub.test_all_providers().await)?,
        Command::Dispatch {
            providers,
            prompt,
            system,
            timeout,
            retries,
        } => {
            let mut request = RequestEnvelope::new(prompt);
            if let Some(system) = system {
                request = request.with_system_prompt(system);
            }

            let dispatcher = hub.dispatcher();
            let options = dispatcher
                .limits()
                .override_options(dispatcher.default_options(), timeout, retries)
                .map_err(anyhow::Error::msg)?;

            let response = if providers.is_empty() {
                if hub.default_chain().is_empty() {
                    bail!("no provider given and no enabled providers configured");
                }
                hub.dispatch_default_chain(&request, Some(&options)).await?
            } else {
                hub.dispatch_with_fallback_options(providers.as_slice(), &request, &options)
                    .await?
            };
            print_json(&response)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
