//! volbroker CLI - Command line interface for provider sessions.
//!
//! This tool bootstraps providers from a configuration file and opens or
//! inspects sessions against them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use volbroker_broker::{Broker, ProviderFactories};
use volbroker_config::Config;

/// Exit code for a retryable session failure.
const EXIT_RETRYABLE: u8 = 1;
/// Exit code for a fatal session failure.
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "volbroker")]
#[command(about = "volbroker - Storage provider session broker")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap providers and list the registered identifiers.
    Providers {
        /// Path to the JSON configuration file.
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Open a session against a provider.
    Open {
        /// Path to the JSON configuration file.
        #[arg(short, long)]
        config: PathBuf,

        /// Provider identifier.
        #[arg(short, long)]
        provider: String,
    },

    /// Show which credential strategy a provider would use.
    Check {
        /// Path to the JSON configuration file.
        #[arg(short, long)]
        config: PathBuf,

        /// Provider identifier.
        #[arg(short, long)]
        provider: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Providers { config } => cmd_providers(&config),
        Commands::Open { config, provider } => cmd_open(&config, &provider).await,
        Commands::Check { config, provider } => cmd_check(&config, &provider),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    Config::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn bootstrap(path: &Path) -> Result<Broker> {
    let config = load_config(path)?;
    Broker::bootstrap(config, &ProviderFactories::memory()).context("Failed to bootstrap providers")
}

/// List registered providers.
fn cmd_providers(path: &Path) -> Result<ExitCode> {
    let broker = bootstrap(path)?;
    let providers = broker.registry().providers();

    if providers.is_empty() {
        println!("No providers registered (placeholder families only).");
    } else {
        println!("Registered providers:");
        for id in providers {
            println!("  {}", id);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Open a session and report the outcome.
async fn cmd_open(path: &Path, provider: &str) -> Result<ExitCode> {
    let broker = bootstrap(path)?;
    info!("Opening session for provider: {}", provider);

    match broker.open_session(provider).await {
        Ok(session) => {
            println!("Session opened successfully!");
            println!("  Provider: {}", session.provider_name());
            println!("  Session: {}", session.session_id());
            println!("  Auth: {}", session.auth_type());
            session.close().await.context("Failed to close session")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Failed to open session: {}", e.error());
            eprintln!("  Code: {}", e.code());
            eprintln!("  Fatal: {}", e.is_fatal());
            let code = if e.is_fatal() { EXIT_FATAL } else { EXIT_RETRYABLE };
            Ok(ExitCode::from(code))
        }
    }
}

/// Report the credential strategy without opening anything.
fn cmd_check(path: &Path, provider: &str) -> Result<ExitCode> {
    let config = load_config(path)?;
    let broker = Broker::with_registry(config, Default::default());

    match broker.strategy_for(provider) {
        Ok(strategy) => {
            println!("Provider: {}", provider);
            println!("  Strategy: {}", strategy.auth_type());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("No usable credentials for {}: {}", provider, e);
            Ok(ExitCode::from(EXIT_RETRYABLE))
        }
    }
}
