//! Library command handlers

use super::{open_store, print_franchise};
use crate::config::Config;
use crate::domain::{AnimeId, ExternalId, FranchiseId, WatchStatus};
use crate::models::{NewAnime, NewEpisode};
use crate::services::{
    FranchiseService, RecommendationService, SeaOrmFranchiseService, SeaOrmRecommendationService,
};

pub async fn cmd_add(
    config: &Config,
    external_id: i32,
    title: &str,
    year: Option<i32>,
    episodes: u32,
) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let mut new_anime = NewAnime::new(ExternalId::new(external_id), title);
    if let Some(year) = year {
        new_anime = new_anime.with_year(year);
    }

    let anime = store.add_anime(&new_anime).await?;

    if episodes > 0 {
        let rows: Vec<NewEpisode> = (1..=episodes)
            .map(|n| NewEpisode {
                number: n as f32,
                watched: false,
            })
            .collect();
        store.add_episodes(anime.id, &rows).await?;
    }

    println!("✓ Added '{}' (ID: {}, {} episodes)", anime.title, anime.id, episodes);
    Ok(())
}

pub async fn cmd_status(config: &Config, id: i32, status: &str) -> anyhow::Result<()> {
    let status: WatchStatus = status.parse().map_err(anyhow::Error::msg)?;
    let store = open_store(config).await?;
    let anime_id = AnimeId::new(id);

    if store.get_anime(anime_id).await?.is_none() {
        println!("Anime {id} not found");
        return Ok(());
    }

    let service =
        SeaOrmRecommendationService::new(store, config.recommendation.recent_completed_window);

    match service.set_watch_status(anime_id, status).await? {
        Some(next) => println!(
            "Anime {} marked {}. Up next: {} ({})",
            anime_id, status, next.name, next.relation_kind
        ),
        None => println!("Anime {anime_id} marked {status}. Nothing queued next."),
    }

    Ok(())
}

pub async fn cmd_members(config: &Config, franchise_id: i32) -> anyhow::Result<()> {
    let service = SeaOrmFranchiseService::new(open_store(config).await?);
    let id = FranchiseId::new(franchise_id);

    let Some(franchise) = service.get_franchise(id).await? else {
        println!("Franchise {franchise_id} not found");
        return Ok(());
    };

    print_franchise(&franchise);

    let members = service.franchise_members(id).await?;
    if members.is_empty() {
        println!("  (no local works)");
    }
    for anime in members {
        let year = anime.year.map_or_else(|| "?".to_string(), |y| y.to_string());
        println!(
            "  • {} ({}) | ID: {} | external: {} | {}",
            anime.title, year, anime.id, anime.external_id, anime.watch_status
        );
    }

    Ok(())
}
