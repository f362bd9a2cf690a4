pub mod anime;
pub mod episode;
pub mod franchise;
pub mod relation;

pub use anime::{Anime, NewAnime};
pub use episode::{EpisodeSummary, NewEpisode};
pub use franchise::{Franchise, FranchiseGraphUpdate};
pub use relation::{NewRelation, RelationEdge};
