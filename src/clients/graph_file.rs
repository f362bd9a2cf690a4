//! Graph provider backed by JSON dumps on disk.
//!
//! Each file is named `<external_id>.json` and holds a [`RawGraph`] in the
//! provider's camelCase layout.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::GraphProvider;
use crate::domain::{ExternalId, RawGraph};

pub struct FileGraphProvider {
    dir: PathBuf,
}

impl FileGraphProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, external_id: ExternalId) -> PathBuf {
        self.dir.join(format!("{external_id}.json"))
    }

    /// Reads a graph from an arbitrary file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid graph document.
    pub async fn read_graph(path: &Path) -> Result<RawGraph> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read graph file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse graph file: {}", path.display()))
    }
}

#[async_trait::async_trait]
impl GraphProvider for FileGraphProvider {
    async fn fetch_graph(&self, external_id: ExternalId) -> Result<RawGraph> {
        let path = self.path_for(external_id);
        debug!("Loading graph for {} from {}", external_id, path.display());
        Self::read_graph(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_graph_named_after_external_id() {
        let dir = std::env::temp_dir().join(format!("kizuna-graphs-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let provider = FileGraphProvider::new(&dir);

        tokio::fs::write(
            provider.path_for(ExternalId::new(11)),
            r#"{"nodes":[{"externalId":11},{"externalId":4}],"edges":[]}"#,
        )
        .await
        .unwrap();

        let graph = provider.fetch_graph(ExternalId::new(11)).await.unwrap();
        assert_eq!(graph.root_external_id(), Some(ExternalId::new(4)));

        let missing = provider.fetch_graph(ExternalId::new(12)).await;
        assert!(missing.is_err());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
