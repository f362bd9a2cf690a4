//! What-to-watch-next command handlers

use super::open_store;
use crate::config::Config;
use crate::domain::AnimeId;
use crate::services::{RecommendationService, SeaOrmRecommendationService, Suggestion};

fn print_suggestion(suggestion: &Suggestion) {
    let local = suggestion
        .anime_id
        .map_or_else(|| "not in library".to_string(), |id| format!("ID: {id}"));

    println!("▶ {} [{}]", suggestion.name, suggestion.relation_kind);
    println!(
        "  {} | external: {} | status: {} | episodes: {}/{}",
        local,
        suggestion.external_id,
        suggestion.watch_status,
        suggestion.watched_episodes,
        suggestion.total_episodes
    );
}

pub async fn cmd_suggest(config: &Config, id: i32) -> anyhow::Result<()> {
    let service = SeaOrmRecommendationService::new(
        open_store(config).await?,
        config.recommendation.recent_completed_window,
    );

    match service.suggest_next(AnimeId::new(id)).await? {
        Some(suggestion) => print_suggestion(&suggestion),
        None => println!("No follow-up found for anime {id}."),
    }

    Ok(())
}

pub async fn cmd_next(config: &Config) -> anyhow::Result<()> {
    let window = config.recommendation.recent_completed_window;
    let service = SeaOrmRecommendationService::new(open_store(config).await?, window);

    match service.suggest_global_next().await? {
        Some(suggestion) => print_suggestion(&suggestion),
        None => println!("Nothing ready to start among the last {window} completed works."),
    }

    Ok(())
}
