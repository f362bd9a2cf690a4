//! Domain types for the franchise relation graph with strong typing.
//!
//! Identifiers are newtypes so a local work id can never be passed where a
//! provider id or a franchise id is expected.

pub mod graph;
pub mod relation;

pub use graph::{RawEdge, RawGraph, RawNode};
pub use relation::RelationKind;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }
    };
}

id_newtype!(
    /// Local identity of a work (`anime.id`).
    AnimeId
);

id_newtype!(
    /// Identity assigned by the upstream metadata provider. Stable across syncs
    /// and globally unique at the provider.
    ExternalId
);

id_newtype!(
    /// Local identity of a franchise row.
    FranchiseId
);

/// Viewing state of a work in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchStatus {
    #[default]
    NotStarted,
    Watching,
    Completed,
    OnHold,
    Dropped,
    Planned,
}

impl WatchStatus {
    pub const ALL: [Self; 6] = [
        Self::NotStarted,
        Self::Watching,
        Self::Completed,
        Self::OnHold,
        Self::Dropped,
        Self::Planned,
    ];

    /// Text stored in the `watch_status` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Watching => "watching",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
            Self::Dropped => "dropped",
            Self::Planned => "planned",
        }
    }

    /// Reads a stored status. Unrecognized text falls back to `NotStarted`.
    #[must_use]
    pub fn from_db(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Unknown watch status: {s}"))
    }
}
