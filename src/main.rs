use academicworld::{DashboardConfig, HttpServer, MySqlStore};
use academicworld::{Backend, Dashboard};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "academicworld", version, about = "AcademicWorld Explorer dashboard server")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "ACADEMICWORLD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard (default)
    Serve,
    /// Apply index, foreign-key and trigger hardening to the relational store
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Schema => harden_schema(config).await,
    }
}

async fn serve(config: DashboardConfig) -> anyhow::Result<()> {
    info!("AcademicWorld Explorer v{}", academicworld::version());

    let dashboard = Dashboard::from_config(&config)
        .await
        .context("connecting to backing stores")?;
    let server = HttpServer::new(Arc::new(dashboard), config.bind_address());

    server.start().await.context("HTTP server stopped")?;
    Ok(())
}

async fn harden_schema(config: DashboardConfig) -> anyhow::Result<()> {
    if config.backend != Backend::Live {
        bail!("schema hardening needs the live relational store");
    }

    let store = MySqlStore::connect_lazy(&config.mysql)?;
    let report = store.apply_hardening().await;
    let failed = report.iter().filter(|(_, outcome)| outcome.is_err()).count();

    for (step, outcome) in &report {
        match outcome {
            Ok(()) => println!("applied  {}", step.name),
            Err(e) => println!("skipped  {} ({})", step.name, e),
        }
    }

    if failed > 0 {
        error!("{} of {} hardening steps failed", failed, report.len());
    }
    Ok(())
}
