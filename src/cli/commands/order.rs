//! Watch-order command handlers

use super::open_store;
use crate::config::Config;
use crate::domain::AnimeId;
use crate::services::WatchOrderService;
use crate::watch_order::OrderItem;

fn format_item(item: &OrderItem) -> String {
    let marker = if item.is_pivot { "●" } else { "○" };
    let kind = item
        .relation_kind
        .map_or_else(String::new, |kind| format!(" [{kind}]"));
    let year = item
        .work
        .year
        .map_or_else(|| "?".to_string(), |y| y.to_string());
    format!("{marker} {} ({year}){kind}", item.work.title)
}

pub async fn cmd_order(config: &Config, id: i32) -> anyhow::Result<()> {
    let service = WatchOrderService::new(open_store(config).await?);

    let Some(items) = service.related_view(AnimeId::new(id)).await? else {
        println!("Anime {id} not found");
        return Ok(());
    };

    for (index, item) in items.iter().enumerate() {
        println!("{:>3}. {}", index + 1, format_item(item));
    }

    Ok(())
}

pub async fn cmd_epochs(config: &Config, id: i32) -> anyhow::Result<()> {
    let service = WatchOrderService::new(open_store(config).await?);

    let Some(epochs) = service.epochs(AnimeId::new(id)).await? else {
        println!("Anime {id} not found");
        return Ok(());
    };

    for epoch in epochs {
        let year = epoch.year.map_or_else(|| "Unknown".to_string(), |y| y.to_string());
        println!("{year}");
        for item in &epoch.items {
            println!("  {}", format_item(item));
        }
    }

    Ok(())
}
