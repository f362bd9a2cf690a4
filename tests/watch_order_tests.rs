//! Related-work views built from stored edges.

use kizuna::db::Store;
use kizuna::domain::{AnimeId, ExternalId, RelationKind};
use kizuna::models::{NewAnime, NewRelation};
use kizuna::services::WatchOrderService;
use std::sync::Arc;

async fn test_store() -> Arc<Store> {
    let db_path =
        std::env::temp_dir().join(format!("kizuna-order-test-{}.db", uuid::Uuid::new_v4()));
    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to create store");
    Arc::new(store)
}

async fn add(store: &Store, external_id: i32, title: &str, year: i32) -> AnimeId {
    store
        .add_anime(&NewAnime::new(ExternalId::new(external_id), title).with_year(year))
        .await
        .expect("failed to add anime")
        .id
}

fn relation(target_id: Option<AnimeId>, external_id: i32, kind: RelationKind) -> NewRelation {
    NewRelation {
        target_id,
        target_external_id: ExternalId::new(external_id),
        target_name: format!("Upstream {external_id}"),
        target_poster_url: None,
        kind,
    }
}

/// Season 1 (2010) -> Season 2 (2012) -> OVA (unimported).
async fn seed(store: &Store) -> (AnimeId, AnimeId) {
    let first = add(store, 1, "Season 1", 2010).await;
    let second = add(store, 2, "Season 2", 2012).await;

    store
        .replace_relations_for_source(first, &[relation(Some(second), 2, RelationKind::Sequel)])
        .await
        .unwrap();
    store
        .replace_relations_for_source(
            second,
            &[
                relation(Some(first), 1, RelationKind::Prequel),
                relation(None, 50, RelationKind::SideStory),
            ],
        )
        .await
        .unwrap();

    (first, second)
}

fn local_ids(items: &[kizuna::watch_order::OrderItem]) -> Vec<Option<AnimeId>> {
    items.iter().map(|item| item.work.anime_id).collect()
}

#[tokio::test]
async fn pivot_is_placed_between_prequel_and_sequel() {
    let store = test_store().await;
    let (first, second) = seed(&store).await;
    let service = WatchOrderService::new(Arc::clone(&store));

    let view = service.related_view(second).await.unwrap().unwrap();

    assert_eq!(local_ids(&view), vec![Some(first), Some(second), None]);
    assert_eq!(view[0].relation_kind, Some(RelationKind::Prequel));
    assert!(view[1].is_pivot);
    assert_eq!(view[2].work.external_id, ExternalId::new(50));
    assert_eq!(view[2].work.title, "Upstream 50");
}

#[tokio::test]
async fn incoming_edges_are_inverted() {
    let store = test_store().await;
    let first = add(&store, 1, "Season 1", 2010).await;
    let second = add(&store, 2, "Season 2", 2012).await;

    store
        .replace_relations_for_source(first, &[relation(Some(second), 2, RelationKind::Sequel)])
        .await
        .unwrap();

    let service = WatchOrderService::new(Arc::clone(&store));
    let view = service.related_view(second).await.unwrap().unwrap();

    assert_eq!(local_ids(&view), vec![Some(first), Some(second)]);
    assert_eq!(view[0].relation_kind, Some(RelationKind::Prequel));
}

#[tokio::test]
async fn each_work_appears_once() {
    let store = test_store().await;
    let (first, _) = seed(&store).await;
    let service = WatchOrderService::new(Arc::clone(&store));

    let view = service.related_view(first).await.unwrap().unwrap();
    assert_eq!(view.len(), 2);
    assert!(view[0].is_pivot);
    assert_eq!(view[1].relation_kind, Some(RelationKind::Sequel));
}

#[tokio::test]
async fn epochs_follow_release_years() {
    let store = test_store().await;
    let (_, second) = seed(&store).await;
    let service = WatchOrderService::new(Arc::clone(&store));

    let epochs = service.epochs(second).await.unwrap().unwrap();
    let years: Vec<_> = epochs.iter().map(|epoch| epoch.year).collect();
    assert_eq!(years, vec![Some(2010), Some(2012), None]);
}

#[tokio::test]
async fn unknown_pivot_has_no_view() {
    let store = test_store().await;
    let service = WatchOrderService::new(Arc::clone(&store));

    assert!(service.related_view(AnimeId::new(5)).await.unwrap().is_none());
    assert!(service.epochs(AnimeId::new(5)).await.unwrap().is_none());
}
