use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "anime_relation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub source_id: i32,
    /// Set once the target work has been imported locally.
    pub target_id: Option<i32>,
    pub target_external_id: i32,
    pub target_name: String,
    pub target_poster_url: Option<String>,
    /// Provider spelling, e.g. `SEQUEL`. Read back through `RelationKind::parse_lenient`.
    pub relation_kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::anime::Entity",
        from = "Column::SourceId",
        to = "super::anime::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Source,
    #[sea_orm(
        belongs_to = "super::anime::Entity",
        from = "Column::TargetId",
        to = "super::anime::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Target,
}

impl Related<super::anime::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Source.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
