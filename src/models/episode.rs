use serde::{Deserialize, Serialize};

/// Episode totals for one work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub total: i32,
    pub watched: i32,
    /// Episode with the lowest number, if any exist.
    pub first_episode_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewEpisode {
    pub number: f32,
    pub watched: bool,
}
