use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_anime_relation_source")
                    .table(AnimeRelation::Table)
                    .col(AnimeRelation::SourceId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_relation_target")
                    .table(AnimeRelation::Table)
                    .col(AnimeRelation::TargetId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_franchise")
                    .table(Anime::Table)
                    .col(Anime::FranchiseId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_status_updated")
                    .table(Anime::Table)
                    .col(Anime::WatchStatus)
                    .col(Anime::UpdatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_episode_anime")
                    .table(Episode::Table)
                    .col(Episode::AnimeId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_franchise_graph_synced")
                    .table(Franchise::Table)
                    .col(Franchise::GraphSyncedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_franchise_graph_synced").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_episode_anime").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_anime_status_updated").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_anime_franchise").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_anime_relation_target").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_anime_relation_source").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AnimeRelation {
    Table,
    SourceId,
    TargetId,
}

#[derive(DeriveIden)]
enum Anime {
    Table,
    FranchiseId,
    WatchStatus,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Episode {
    Table,
    AnimeId,
}

#[derive(DeriveIden)]
enum Franchise {
    Table,
    GraphSyncedAt,
}
