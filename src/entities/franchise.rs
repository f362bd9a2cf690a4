use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "franchise")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Minimum external id of the cluster graph. Unique when set.
    #[sea_orm(unique)]
    pub root_external_id: Option<i32>,
    /// Serialized `RawGraph` from the last fetch.
    #[sea_orm(column_type = "Text", nullable)]
    pub graph_snapshot: Option<String>,
    pub graph_synced_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::anime::Entity")]
    Anime,
}

impl Related<super::anime::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Anime.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
