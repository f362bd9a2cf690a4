//! Builds ordered watch views around a pivot work from the stored edges.

use crate::db::Store;
use crate::domain::AnimeId;
use crate::models::RelationEdge;
use crate::watch_order::{self, Epoch, OrderItem, RelatedWork};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct WatchOrderService {
    store: Arc<Store>,
}

impl WatchOrderService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    async fn target_work(&self, edge: &RelationEdge) -> Result<RelatedWork> {
        let local = match edge.target_id {
            Some(id) => self.store.get_anime(id).await?,
            None => {
                self.store
                    .find_anime_by_external_id(edge.target_external_id)
                    .await?
            }
        };
        Ok(local.map_or_else(
            || RelatedWork::from_edge_target(edge),
            |anime| RelatedWork::from_anime(&anime),
        ))
    }

    /// Pivot plus every work linked to it in either direction, ordered.
    ///
    /// Incoming edges are read from the other side, so their kind is
    /// inverted. Returns `None` if the pivot does not exist.
    pub async fn related_view(&self, pivot: AnimeId) -> Result<Option<Vec<OrderItem>>> {
        let Some(anime) = self.store.get_anime(pivot).await? else {
            return Ok(None);
        };

        let mut items = vec![OrderItem::pivot(RelatedWork::from_anime(&anime))];

        for edge in self.store.list_outgoing_relations(pivot).await? {
            let work = self.target_work(&edge).await?;
            if work.anime_id == Some(pivot) {
                continue;
            }
            items.push(OrderItem::related(work, edge.kind));
        }

        let incoming = self
            .store
            .list_incoming_relations(pivot, anime.external_id)
            .await?;
        for edge in incoming {
            if edge.source_id == pivot {
                continue;
            }
            let Some(source) = self.store.get_anime(edge.source_id).await? else {
                continue;
            };
            items.push(OrderItem::related(
                RelatedWork::from_anime(&source),
                edge.kind.inverse(),
            ));
        }

        debug!("Related view for anime {}: {} items", pivot, items.len());
        Ok(Some(watch_order::order(watch_order::dedup_by_work(items))))
    }

    /// [`Self::related_view`] split into same-year epochs.
    pub async fn epochs(&self, pivot: AnimeId) -> Result<Option<Vec<Epoch>>> {
        Ok(self
            .related_view(pivot)
            .await?
            .map(watch_order::group_by_epoch))
    }
}
