//! Periodic refresh of stale franchise graph snapshots.

use serde::Serialize;
use tracing::{info, warn};

use crate::clients::GraphProvider;
use crate::services::FranchiseService;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub refreshed: usize,
    /// Franchises that disappeared between the scan and the update.
    pub skipped: usize,
    pub failed: usize,
}

/// Re-fetches the graph of up to `limit` stale franchises and stores the new
/// snapshot. Membership is left alone.
///
/// A failing franchise is logged and counted; it stays stale and is picked
/// up again by the next run.
///
/// # Errors
///
/// Only the initial stale scan can fail the whole run.
pub async fn refresh_stale_graphs(
    franchises: &dyn FranchiseService,
    provider: &dyn GraphProvider,
    limit: u64,
) -> anyhow::Result<RefreshReport> {
    let stale = franchises.find_stale_graph_franchises(limit).await?;
    let mut report = RefreshReport::default();

    if stale.is_empty() {
        return Ok(report);
    }

    info!("Refreshing {} stale franchise graphs", stale.len());

    for franchise in stale {
        let Some(root) = franchise.root_external_id else {
            report.skipped += 1;
            continue;
        };

        let graph = match provider.fetch_graph(root).await {
            Ok(graph) if graph.is_empty() => {
                warn!("Provider returned an empty graph for franchise {}", franchise.id);
                report.failed += 1;
                continue;
            }
            Ok(graph) => graph,
            Err(e) => {
                warn!(
                    "Failed to fetch graph for franchise {} (root {}): {:#}",
                    franchise.id, root, e
                );
                report.failed += 1;
                continue;
            }
        };

        match franchises.refresh_graph_only(franchise.id, &graph, None).await {
            Ok(Some(_)) => report.refreshed += 1,
            Ok(None) => report.skipped += 1,
            Err(e) => {
                warn!("Failed to store graph for franchise {}: {}", franchise.id, e);
                report.failed += 1;
            }
        }
    }

    info!(
        "Graph refresh finished: {} refreshed, {} skipped, {} failed",
        report.refreshed, report.skipped, report.failed
    );

    Ok(report)
}
