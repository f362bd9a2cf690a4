use crate::domain::{AnimeId, ExternalId, FranchiseId, WatchStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anime {
    pub id: AnimeId,
    pub external_id: ExternalId,
    pub title: String,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
    pub watch_status: WatchStatus,
    pub franchise_id: Option<FranchiseId>,
    pub updated_at: String,
}

/// Work as handed over by the import pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnime {
    pub external_id: ExternalId,
    pub title: String,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub watch_status: WatchStatus,
}

impl NewAnime {
    #[must_use]
    pub fn new(external_id: ExternalId, title: impl Into<String>) -> Self {
        Self {
            external_id,
            title: title.into(),
            poster_url: None,
            year: None,
            watch_status: WatchStatus::NotStarted,
        }
    }

    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: WatchStatus) -> Self {
        self.watch_status = status;
        self
    }

    #[must_use]
    pub fn with_poster(mut self, url: impl Into<String>) -> Self {
        self.poster_url = Some(url.into());
        self
    }
}
