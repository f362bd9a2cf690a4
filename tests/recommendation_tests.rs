//! What-to-watch-next ranking against a real SQLite store.

use chrono::{Duration, Utc};
use kizuna::db::Store;
use kizuna::domain::{AnimeId, ExternalId, RelationKind, WatchStatus};
use kizuna::models::{NewAnime, NewEpisode, NewRelation};
use kizuna::services::{RecommendationService, SeaOrmRecommendationService};
use std::sync::Arc;

async fn test_store() -> Arc<Store> {
    let db_path =
        std::env::temp_dir().join(format!("kizuna-recommend-test-{}.db", uuid::Uuid::new_v4()));
    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to create store");
    Arc::new(store)
}

async fn add(store: &Store, external_id: i32, title: &str, episodes: u32) -> AnimeId {
    let anime = store
        .add_anime(&NewAnime::new(ExternalId::new(external_id), title))
        .await
        .expect("failed to add anime");

    let rows: Vec<NewEpisode> = (1..=episodes)
        .map(|n| NewEpisode {
            number: n as f32,
            watched: false,
        })
        .collect();
    store.add_episodes(anime.id, &rows).await.unwrap();
    anime.id
}

fn relation(target_id: Option<AnimeId>, external_id: i32, kind: RelationKind) -> NewRelation {
    NewRelation {
        target_id,
        target_external_id: ExternalId::new(external_id),
        target_name: format!("Upstream {external_id}"),
        target_poster_url: Some(format!("https://img.example/{external_id}.jpg")),
        kind,
    }
}

#[tokio::test]
async fn sequel_beats_other_candidates() {
    let store = test_store().await;
    let source = add(&store, 1, "Season 1", 12).await;
    let side = add(&store, 2, "OVA", 1).await;
    let sequel = add(&store, 3, "Season 2", 12).await;

    store
        .replace_relations_for_source(
            source,
            &[
                relation(None, 9, RelationKind::Summary),
                relation(Some(side), 2, RelationKind::SideStory),
                relation(Some(sequel), 3, RelationKind::Sequel),
            ],
        )
        .await
        .unwrap();

    let service = SeaOrmRecommendationService::new(Arc::clone(&store), 20);
    let suggestion = service.suggest_next(source).await.unwrap().unwrap();

    assert_eq!(suggestion.anime_id, Some(sequel));
    assert_eq!(suggestion.name, "Season 2");
    assert_eq!(suggestion.relation_kind, RelationKind::Sequel);
    assert_eq!(suggestion.total_episodes, 12);
    assert_eq!(suggestion.watched_episodes, 0);
    assert!(suggestion.first_episode_id.is_some());
    assert!(suggestion.is_actionable());
}

#[tokio::test]
async fn excluded_kinds_are_never_suggested() {
    let store = test_store().await;
    let source = add(&store, 1, "Season 2", 12).await;

    store
        .replace_relations_for_source(
            source,
            &[
                relation(None, 2, RelationKind::Prequel),
                relation(None, 3, RelationKind::Summary),
                relation(None, 4, RelationKind::Character),
                relation(None, 5, RelationKind::Other),
            ],
        )
        .await
        .unwrap();

    let service = SeaOrmRecommendationService::new(Arc::clone(&store), 20);
    assert!(service.suggest_next(source).await.unwrap().is_none());
    assert!(service.suggest_next(AnimeId::new(4242)).await.unwrap().is_none());
}

#[tokio::test]
async fn unimported_target_falls_back_to_edge_fields() {
    let store = test_store().await;
    let source = add(&store, 1, "Season 1", 12).await;

    store
        .replace_relations_for_source(source, &[relation(None, 77, RelationKind::SpinOff)])
        .await
        .unwrap();

    let service = SeaOrmRecommendationService::new(Arc::clone(&store), 20);
    let suggestion = service.suggest_next(source).await.unwrap().unwrap();

    assert_eq!(suggestion.anime_id, None);
    assert_eq!(suggestion.external_id, ExternalId::new(77));
    assert_eq!(suggestion.name, "Upstream 77");
    assert_eq!(
        suggestion.poster_url.as_deref(),
        Some("https://img.example/77.jpg")
    );
    assert_eq!(suggestion.first_episode_id, None);
    assert!(!suggestion.is_actionable());
}

#[tokio::test]
async fn edge_stored_before_import_resolves_by_external_id() {
    let store = test_store().await;
    let source = add(&store, 1, "Season 1", 12).await;

    store
        .replace_relations_for_source(source, &[relation(None, 2, RelationKind::Sequel)])
        .await
        .unwrap();
    let imported = add(&store, 2, "Season 2", 10).await;

    let service = SeaOrmRecommendationService::new(Arc::clone(&store), 20);
    let suggestion = service.suggest_next(source).await.unwrap().unwrap();

    assert_eq!(suggestion.anime_id, Some(imported));
    assert_eq!(suggestion.name, "Season 2");
    assert_eq!(suggestion.total_episodes, 10);
}

#[tokio::test]
async fn global_next_scans_only_the_recent_window() {
    let store = test_store().await;
    let finished = add(&store, 1, "Season 1", 12).await;
    let sequel = add(&store, 2, "Season 2", 12).await;
    let newer = add(&store, 3, "Standalone", 1).await;

    store
        .replace_relations_for_source(finished, &[relation(Some(sequel), 2, RelationKind::Sequel)])
        .await
        .unwrap();

    let now = Utc::now();
    store
        .set_watch_status_at(finished, WatchStatus::Completed, now - Duration::hours(2))
        .await
        .unwrap();
    store
        .set_watch_status_at(newer, WatchStatus::Completed, now - Duration::hours(1))
        .await
        .unwrap();

    let narrow = SeaOrmRecommendationService::new(Arc::clone(&store), 1);
    assert!(narrow.suggest_global_next().await.unwrap().is_none());

    let wide = SeaOrmRecommendationService::new(Arc::clone(&store), 20);
    let suggestion = wide.suggest_global_next().await.unwrap().unwrap();
    assert_eq!(suggestion.source_id, finished);
    assert_eq!(suggestion.anime_id, Some(sequel));
}

#[tokio::test]
async fn global_next_skips_started_targets() {
    let store = test_store().await;
    let finished = add(&store, 1, "Season 1", 12).await;
    let sequel = add(&store, 2, "Season 2", 12).await;

    store
        .replace_relations_for_source(finished, &[relation(Some(sequel), 2, RelationKind::Sequel)])
        .await
        .unwrap();
    store
        .set_watch_status(finished, WatchStatus::Completed)
        .await
        .unwrap();
    store
        .set_watch_status(sequel, WatchStatus::Watching)
        .await
        .unwrap();

    let service = SeaOrmRecommendationService::new(Arc::clone(&store), 20);
    assert!(service.suggest_global_next().await.unwrap().is_none());
}

#[tokio::test]
async fn status_change_returns_next_suggestion() {
    let store = test_store().await;
    let source = add(&store, 1, "Season 1", 12).await;
    let sequel = add(&store, 2, "Season 2", 12).await;

    store
        .replace_relations_for_source(source, &[relation(Some(sequel), 2, RelationKind::Sequel)])
        .await
        .unwrap();

    let service = SeaOrmRecommendationService::new(Arc::clone(&store), 20);
    let next = service
        .set_watch_status(source, WatchStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.anime_id, Some(sequel));

    let updated = store.get_anime(source).await.unwrap().unwrap();
    assert_eq!(updated.watch_status, WatchStatus::Completed);

    assert!(
        service
            .set_watch_status(AnimeId::new(999), WatchStatus::Completed)
            .await
            .unwrap()
            .is_none()
    );
}
