//! Watch-order composition for a set of works related to one pivot work.
//!
//! Items are ranked by [`RelationKind::display_priority`] relative to the
//! pivot (prequels before it, sequels after it), then by release year with
//! unknown years last. Epochs group consecutive items of the same year for
//! timeline rendering; they carry no story-arc meaning.

use crate::domain::relation::display_priority_of;
use crate::domain::{AnimeId, ExternalId, RelationKind, WatchStatus};
use crate::models::{Anime, RelationEdge};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Display record for a work in an ordered view. Unimported works have no
/// local id and carry the denormalized upstream fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedWork {
    pub anime_id: Option<AnimeId>,
    pub external_id: ExternalId,
    pub title: String,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
    pub watch_status: Option<WatchStatus>,
}

impl RelatedWork {
    #[must_use]
    pub fn from_anime(anime: &Anime) -> Self {
        Self {
            anime_id: Some(anime.id),
            external_id: anime.external_id,
            title: anime.title.clone(),
            poster_url: anime.poster_url.clone(),
            year: anime.year,
            watch_status: Some(anime.watch_status),
        }
    }

    #[must_use]
    pub fn from_edge_target(edge: &RelationEdge) -> Self {
        Self {
            anime_id: edge.target_id,
            external_id: edge.target_external_id,
            title: edge.target_name.clone(),
            poster_url: edge.target_poster_url.clone(),
            year: None,
            watch_status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub work: RelatedWork,
    /// Kind of the relation as seen from the pivot.
    pub relation_kind: Option<RelationKind>,
    #[serde(default)]
    pub is_pivot: bool,
}

impl OrderItem {
    #[must_use]
    pub const fn pivot(work: RelatedWork) -> Self {
        Self {
            work,
            relation_kind: None,
            is_pivot: true,
        }
    }

    #[must_use]
    pub const fn related(work: RelatedWork, kind: RelationKind) -> Self {
        Self {
            work,
            relation_kind: Some(kind),
            is_pivot: false,
        }
    }

    fn rank(&self) -> i32 {
        if self.is_pivot {
            0
        } else {
            display_priority_of(self.relation_kind)
        }
    }
}

/// Same-year run of ordered items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub year: Option<i32>,
    pub items: Vec<OrderItem>,
}

fn compare_year(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders related works around the pivot. Stable and idempotent.
///
/// The pivot ranks 0 and keeps its input position among the other rank-0
/// items (those without a relation kind): it is lifted out, the rest is
/// sorted by `(rank, year)`, and it is put back at the same offset inside the
/// rank-0 band.
#[must_use]
pub fn order(items: Vec<OrderItem>) -> Vec<OrderItem> {
    let mut pivots = Vec::new();
    let mut rest = Vec::with_capacity(items.len());
    let mut band_seen = 0usize;

    for item in items {
        if item.is_pivot {
            pivots.push((band_seen, item));
            band_seen += 1;
        } else {
            if item.rank() == 0 {
                band_seen += 1;
            }
            rest.push(item);
        }
    }

    rest.sort_by(|a, b| {
        a.rank()
            .cmp(&b.rank())
            .then_with(|| compare_year(a.work.year, b.work.year))
    });

    let band_start = rest.partition_point(|item| item.rank() < 0);
    for (offset, pivot) in pivots {
        let at = (band_start + offset).min(rest.len());
        rest.insert(at, pivot);
    }

    rest
}

/// Orders `items` and splits them into runs of equal year. Items without a
/// year each get their own epoch.
#[must_use]
pub fn group_by_epoch(items: Vec<OrderItem>) -> Vec<Epoch> {
    let mut epochs: Vec<Epoch> = Vec::new();

    for item in order(items) {
        let year = item.work.year;
        match epochs.last_mut() {
            Some(epoch) if year.is_some() && epoch.year == year => epoch.items.push(item),
            _ => epochs.push(Epoch {
                year,
                items: vec![item],
            }),
        }
    }

    epochs
}

/// Keeps the first occurrence of each work. Local works are keyed by their
/// local id, unimported ones by external id.
#[must_use]
pub fn dedup_by_work(items: Vec<OrderItem>) -> Vec<OrderItem> {
    let mut seen_local = HashSet::new();
    let mut seen_external = HashSet::new();

    items
        .into_iter()
        .filter(|item| match item.work.anime_id {
            Some(id) => seen_local.insert(id),
            None => seen_external.insert(item.work.external_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(id: i32, year: Option<i32>) -> RelatedWork {
        RelatedWork {
            anime_id: Some(AnimeId::new(id)),
            external_id: ExternalId::new(1000 + id),
            title: format!("Work {id}"),
            poster_url: None,
            year,
            watch_status: None,
        }
    }

    fn item(id: i32, year: Option<i32>, kind: Option<RelationKind>) -> OrderItem {
        OrderItem {
            work: work(id, year),
            relation_kind: kind,
            is_pivot: false,
        }
    }

    fn ids(items: &[OrderItem]) -> Vec<i32> {
        items
            .iter()
            .map(|i| i.work.anime_id.map_or(-1, |id| id.value()))
            .collect()
    }

    #[test]
    fn pivot_sits_between_prequel_and_sequel() {
        let items = vec![
            item(1, Some(2020), Some(RelationKind::Sequel)),
            OrderItem::pivot(work(2, Some(2021))),
            item(3, Some(2019), Some(RelationKind::Prequel)),
        ];

        let ordered = order(items);
        assert_eq!(ids(&ordered), vec![3, 2, 1]);
        assert_eq!(order(ordered.clone()), ordered);
    }

    #[test]
    fn priority_then_year_with_missing_year_last() {
        let items = vec![
            item(1, None, Some(RelationKind::Sequel)),
            item(2, Some(2018), Some(RelationKind::Sequel)),
            item(3, Some(2015), Some(RelationKind::SideStory)),
            item(4, Some(2010), Some(RelationKind::Summary)),
            item(5, Some(2012), Some(RelationKind::ParentStory)),
        ];

        assert_eq!(ids(&order(items)), vec![5, 3, 2, 1, 4]);
    }

    #[test]
    fn pivot_keeps_offset_among_kindless_items() {
        let items = vec![
            item(1, Some(2021), None),
            OrderItem::pivot(work(2, Some(1990))),
            item(3, Some(2019), None),
            item(4, Some(2000), Some(RelationKind::Prequel)),
        ];

        let ordered = order(items);
        assert_eq!(ids(&ordered), vec![4, 3, 2, 1]);
        assert_eq!(order(ordered.clone()), ordered);
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![
            item(7, Some(2020), Some(RelationKind::SpinOff)),
            item(8, Some(2020), Some(RelationKind::SpinOff)),
            item(9, Some(2020), Some(RelationKind::SpinOff)),
        ];
        assert_eq!(ids(&order(items)), vec![7, 8, 9]);
    }

    #[test]
    fn empty_input() {
        assert!(order(Vec::new()).is_empty());
        assert!(group_by_epoch(Vec::new()).is_empty());
    }

    #[test]
    fn epochs_group_equal_years() {
        let items = vec![
            item(1, Some(2020), None),
            item(2, Some(2020), None),
            item(3, Some(2021), None),
        ];

        let epochs = group_by_epoch(items);
        assert_eq!(epochs.len(), 2);
        assert_eq!(epochs[0].year, Some(2020));
        assert_eq!(epochs[0].items.len(), 2);
        assert_eq!(epochs[1].year, Some(2021));
        assert_eq!(epochs[1].items.len(), 1);
    }

    #[test]
    fn missing_years_form_singleton_epochs() {
        let items = vec![
            item(1, None, Some(RelationKind::Sequel)),
            item(2, None, Some(RelationKind::Sequel)),
        ];

        let epochs = group_by_epoch(items);
        assert_eq!(epochs.len(), 2);
        assert!(epochs.iter().all(|e| e.year.is_none() && e.items.len() == 1));
    }

    #[test]
    fn alternating_years_are_not_clustered_by_kind() {
        let items = vec![
            item(1, Some(2010), Some(RelationKind::Sequel)),
            item(2, Some(2011), Some(RelationKind::SideStory)),
            item(3, Some(2009), Some(RelationKind::Sequel)),
        ];

        let epochs = group_by_epoch(items);
        let years: Vec<_> = epochs.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![Some(2011), Some(2009), Some(2010)]);
    }

    #[test]
    fn dedup_keeps_first_seen() {
        let mut unimported = item(5, None, Some(RelationKind::Sequel));
        unimported.work.anime_id = None;
        let items = vec![
            item(1, Some(2020), Some(RelationKind::Sequel)),
            item(1, Some(2020), Some(RelationKind::Prequel)),
            unimported.clone(),
            unimported,
        ];

        let deduped = dedup_by_work(items);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].relation_kind, Some(RelationKind::Sequel));
    }
}
