//! Sources of provider relation graphs.

pub mod graph_file;

pub use graph_file::FileGraphProvider;

use crate::domain::{ExternalId, RawGraph};
use anyhow::Result;

/// Fetches the relation graph of the franchise containing `external_id`.
#[async_trait::async_trait]
pub trait GraphProvider: Send + Sync {
    async fn fetch_graph(&self, external_id: ExternalId) -> Result<RawGraph>;
}
