//! Franchise sync, refresh and staleness command handlers

use std::path::Path;
use std::sync::Arc;

use super::{open_store, print_franchise};
use crate::clients::{FileGraphProvider, GraphProvider};
use crate::config::Config;
use crate::domain::{ExternalId, FranchiseId};
use crate::services::{FranchiseService, Scheduler, SeaOrmFranchiseService, canonical_key};

pub async fn cmd_sync(
    config: &Config,
    graph_path: &Path,
    name: Option<&str>,
    root: Option<i32>,
) -> anyhow::Result<()> {
    let graph = FileGraphProvider::read_graph(graph_path).await?;
    let service = SeaOrmFranchiseService::new(open_store(config).await?);

    let outcome = match root {
        Some(root) => {
            let derived = canonical_key(&graph).map(|(_, derived)| derived);
            let name = name.map(str::to_string).or(derived).unwrap_or_default();
            service.sync(&graph, ExternalId::new(root), &name).await?
        }
        None => service.sync_graph(&graph, name).await?,
    };

    let Some(franchise) = outcome.franchise else {
        println!("Nothing to sync: no local work belongs to this graph.");
        return Ok(());
    };

    let mut edges = 0;
    for node in graph.node_ids() {
        if let Some(stored) = service.store_relations(&graph, node).await? {
            edges += stored;
        }
    }

    println!(
        "Synced franchise '{}' ({} works linked, {} relations stored)",
        franchise.name, outcome.updated_count, edges
    );
    print_franchise(&franchise);

    Ok(())
}

pub async fn cmd_refresh(
    config: &Config,
    franchise_id: i32,
    graph_path: &Path,
) -> anyhow::Result<()> {
    let graph = FileGraphProvider::read_graph(graph_path).await?;
    let service = SeaOrmFranchiseService::new(open_store(config).await?);

    match service
        .refresh_graph_only(FranchiseId::new(franchise_id), &graph, None)
        .await?
    {
        Some(franchise) => {
            println!("Graph refreshed ({} nodes)", graph.nodes.len());
            print_franchise(&franchise);
        }
        None => println!("Franchise {franchise_id} not found"),
    }

    Ok(())
}

pub async fn cmd_stale(config: &Config, limit: u64) -> anyhow::Result<()> {
    let service = SeaOrmFranchiseService::new(open_store(config).await?);
    let stale = service.find_stale_graph_franchises(limit).await?;

    if stale.is_empty() {
        println!("All franchise graphs are up to date.");
        return Ok(());
    }

    println!("Stale franchises ({}):", stale.len());
    for franchise in &stale {
        print_franchise(franchise);
    }

    Ok(())
}

pub async fn cmd_refresh_stale(config: &Config) -> anyhow::Result<()> {
    let franchises: Arc<dyn FranchiseService> =
        Arc::new(SeaOrmFranchiseService::new(open_store(config).await?));
    let provider: Arc<dyn GraphProvider> =
        Arc::new(FileGraphProvider::new(&config.provider.graph_dir));

    let scheduler = Scheduler::new(franchises, provider, config.scheduler.clone());
    let report = scheduler.run_once().await?;

    println!(
        "Refreshed: {} | Skipped: {} | Failed: {}",
        report.refreshed, report.skipped, report.failed
    );

    Ok(())
}
