use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "anime")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub external_id: i32,
    pub title: String,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
    /// Snake-case `WatchStatus` text.
    pub watch_status: String,
    pub franchise_id: Option<i32>,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::franchise::Entity",
        from = "Column::FranchiseId",
        to = "super::franchise::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Franchise,
    #[sea_orm(has_many = "super::episode::Entity")]
    Episode,
}

impl Related<super::franchise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Franchise.def()
    }
}

impl Related<super::episode::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
