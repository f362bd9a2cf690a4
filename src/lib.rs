pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod watch_order;

use std::sync::Arc;
use tokio::signal;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, commands};
use clients::{FileGraphProvider, GraphProvider};
pub use config::Config;
use db::Store;
use services::{FranchiseService, Scheduler, SeaOrmFranchiseService};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json = config.general.json_logs;
    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Daemon => run_daemon(config).await,

        Commands::Add {
            external_id,
            title,
            year,
            episodes,
        } => commands::cmd_add(&config, external_id, &title.join(" "), year, episodes).await,

        Commands::Sync { graph, name, root } => {
            commands::cmd_sync(&config, &graph, name.as_deref(), root).await
        }

        Commands::Refresh {
            franchise_id,
            graph,
        } => commands::cmd_refresh(&config, franchise_id, &graph).await,

        Commands::RefreshStale => commands::cmd_refresh_stale(&config).await,

        Commands::Stale { limit } => commands::cmd_stale(&config, limit).await,

        Commands::Members { franchise_id } => commands::cmd_members(&config, franchise_id).await,

        Commands::Suggest { id } => commands::cmd_suggest(&config, id).await,

        Commands::Next => commands::cmd_next(&config).await,

        Commands::Status { id, status } => commands::cmd_status(&config, id, &status).await,

        Commands::Order { id } => commands::cmd_order(&config, id).await,

        Commands::Epochs { id } => commands::cmd_epochs(&config, id).await,
    }
}

async fn run_daemon(config: Config) -> anyhow::Result<()> {
    info!(
        "Kizuna v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    store.ping().await?;

    let franchises: Arc<dyn FranchiseService> =
        Arc::new(SeaOrmFranchiseService::new(Arc::new(store)));
    let provider: Arc<dyn GraphProvider> =
        Arc::new(FileGraphProvider::new(&config.provider.graph_dir));

    let scheduler = Arc::new(Scheduler::new(
        franchises,
        provider,
        config.scheduler.clone(),
    ));

    let scheduler_handle = {
        let sched = Arc::clone(&scheduler);
        tokio::spawn(async move {
            if let Err(e) = sched.start().await {
                error!("Scheduler error: {}", e);
            }
        })
    };

    info!("Daemon running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    scheduler.stop().await;
    scheduler_handle.abort();
    info!("Daemon stopped");

    Ok(())
}
