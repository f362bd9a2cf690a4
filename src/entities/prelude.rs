pub use super::anime::Entity as Anime;
pub use super::anime_relation::Entity as AnimeRelation;
pub use super::episode::Entity as Episode;
pub use super::franchise::Entity as Franchise;
