mod franchise;
mod library;
mod order;
mod recommend;

pub use franchise::{cmd_refresh, cmd_refresh_stale, cmd_stale, cmd_sync};
pub use library::{cmd_add, cmd_members, cmd_status};
pub use order::{cmd_epochs, cmd_order};
pub use recommend::{cmd_next, cmd_suggest};

use crate::config::Config;
use crate::db::Store;
use std::sync::Arc;

async fn open_store(config: &Config) -> anyhow::Result<Arc<Store>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    Ok(Arc::new(store))
}

fn print_franchise(franchise: &crate::models::Franchise) {
    let root = franchise
        .root_external_id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    let synced = franchise.graph_synced_at.as_deref().unwrap_or("never");
    println!(
        "  [{}] {} | root: {} | graph synced: {}",
        franchise.id, franchise.name, root, synced
    );
}
