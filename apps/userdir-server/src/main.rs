mod config;
mod logging;
mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use user_directory::UserDirectoryModule;

use crate::config::AppConfig;

/// User directory gRPC server
#[derive(Parser)]
#[command(name = "userdir-server")]
#[command(about = "User directory gRPC server: get, list and search users")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override, `ip:port` or `uds:///path` (overrides config)
    #[arg(short, long)]
    listen_addr: Option<String>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.listen_addr.as_deref(), cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init_logging(&config.logging);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
    }
}

fn build_module(config: &AppConfig) -> Result<UserDirectoryModule> {
    UserDirectoryModule::from_config(&config.directory).context("invalid directory.users")
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.listen_addr()?;
    build_module(config)?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    let addr = config.listen_addr()?;
    let module = build_module(config)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "userdir-server starting");

    let cancel = CancellationToken::new();
    serve::spawn_signal_handler(cancel.clone());
    serve::serve(&module, &addr, cancel).await
}
