use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed relation between two works, as reported by the metadata provider.
///
/// Every table below is an exhaustive `match` without a wildcard arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    Sequel,
    Prequel,
    SideStory,
    ParentStory,
    Summary,
    FullStory,
    SpinOff,
    Adaptation,
    Character,
    AlternativeVersion,
    AlternativeSetting,
    Other,
}

impl RelationKind {
    pub const ALL: [Self; 12] = [
        Self::Sequel,
        Self::Prequel,
        Self::SideStory,
        Self::ParentStory,
        Self::Summary,
        Self::FullStory,
        Self::SpinOff,
        Self::Adaptation,
        Self::Character,
        Self::AlternativeVersion,
        Self::AlternativeSetting,
        Self::Other,
    ];

    /// Text stored in the `relation_kind` column and emitted by the provider.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sequel => "SEQUEL",
            Self::Prequel => "PREQUEL",
            Self::SideStory => "SIDE_STORY",
            Self::ParentStory => "PARENT_STORY",
            Self::Summary => "SUMMARY",
            Self::FullStory => "FULL_STORY",
            Self::SpinOff => "SPIN_OFF",
            Self::Adaptation => "ADAPTATION",
            Self::Character => "CHARACTER",
            Self::AlternativeVersion => "ALTERNATIVE_VERSION",
            Self::AlternativeSetting => "ALTERNATIVE_SETTING",
            Self::Other => "OTHER",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Sequel => "Sequel",
            Self::Prequel => "Prequel",
            Self::SideStory => "Side Story",
            Self::ParentStory => "Parent Story",
            Self::Summary => "Summary",
            Self::FullStory => "Full Story",
            Self::SpinOff => "Spin-off",
            Self::Adaptation => "Adaptation",
            Self::Character => "Character",
            Self::AlternativeVersion => "Alternative Version",
            Self::AlternativeSetting => "Alternative Setting",
            Self::Other => "Other",
        }
    }

    /// Parses provider or stored text. Case, spaces and dashes are ignored;
    /// anything unrecognized becomes `Other` instead of being rejected.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        let normalized = value.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "SPINOFF" => Self::SpinOff,
            _ => Self::ALL
                .into_iter()
                .find(|kind| kind.as_str() == normalized)
                .unwrap_or(Self::Other),
        }
    }

    /// Rank used when picking a single "what's next" target. Lower is better.
    #[must_use]
    pub const fn selection_priority(&self) -> u8 {
        match self {
            Self::Sequel => 0,
            Self::SideStory => 1,
            Self::SpinOff => 2,
            Self::ParentStory => 3,
            Self::FullStory => 4,
            Self::Summary => 10,
            Self::Prequel
            | Self::Adaptation
            | Self::Character
            | Self::AlternativeVersion
            | Self::AlternativeSetting
            | Self::Other => 100,
        }
    }

    /// Kinds that may ever be surfaced as the next thing to watch.
    #[must_use]
    pub const fn is_next_candidate(&self) -> bool {
        match self {
            Self::Sequel | Self::SideStory | Self::SpinOff | Self::ParentStory | Self::FullStory => {
                true
            }
            Self::Prequel
            | Self::Summary
            | Self::Adaptation
            | Self::Character
            | Self::AlternativeVersion
            | Self::AlternativeSetting
            | Self::Other => false,
        }
    }

    /// Position relative to the pivot in a watch-order view. Negative values
    /// come before the pivot, positive values after it.
    #[must_use]
    pub const fn display_priority(&self) -> i32 {
        match self {
            Self::Prequel => -100,
            Self::ParentStory => -50,
            Self::FullStory => 25,
            Self::SideStory => 50,
            Self::SpinOff => 75,
            Self::Sequel => 100,
            Self::AlternativeVersion => 150,
            Self::AlternativeSetting => 175,
            Self::Summary | Self::Adaptation | Self::Character | Self::Other => 200,
        }
    }

    /// Kind seen when the edge is walked from target back to source.
    ///
    /// Only the sequel/prequel pair is directional here; every other kind is
    /// treated as its own inverse.
    #[must_use]
    pub const fn inverse(&self) -> Self {
        match self {
            Self::Sequel => Self::Prequel,
            Self::Prequel => Self::Sequel,
            Self::SideStory => Self::SideStory,
            Self::ParentStory => Self::ParentStory,
            Self::Summary => Self::Summary,
            Self::FullStory => Self::FullStory,
            Self::SpinOff => Self::SpinOff,
            Self::Adaptation => Self::Adaptation,
            Self::Character => Self::Character,
            Self::AlternativeVersion => Self::AlternativeVersion,
            Self::AlternativeSetting => Self::AlternativeSetting,
            Self::Other => Self::Other,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Missing kinds sit next to the pivot.
#[must_use]
pub const fn display_priority_of(kind: Option<RelationKind>) -> i32 {
    match kind {
        Some(kind) => kind.display_priority(),
        None => 0,
    }
}

/// Picks the single best "next" candidate from a source's outgoing edges.
///
/// Edges outside the candidate set are never returned. On equal priority the
/// earliest edge in `edges` wins, so the caller's fetch order is the tie-break.
pub fn select_next<T, F>(edges: impl IntoIterator<Item = T>, kind_of: F) -> Option<T>
where
    F: Fn(&T) -> RelationKind,
{
    let mut best: Option<(u8, T)> = None;
    for edge in edges {
        let kind = kind_of(&edge);
        if !kind.is_next_candidate() {
            continue;
        }
        let priority = kind.selection_priority();
        match &best {
            Some((current, _)) if *current <= priority => {}
            _ => best = Some((priority, edge)),
        }
    }
    best.map(|(_, edge)| edge)
}
