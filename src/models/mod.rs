use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::servers::Server;

/// What kind of title a playback request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "series"),
        }
    }
}

/// Immutable input to a playback session, created when the user initiates
/// playback and never mutated afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackRequest {
    pub media_id: u64,
    pub kind: MediaKind,
    pub title: String,
    /// Initial season selection for series, carried from the route
    pub season: Option<u32>,
    /// Initial episode selection for series, carried from the route
    pub episode: Option<u32>,
}

impl PlaybackRequest {
    pub fn movie(media_id: u64, title: impl Into<String>) -> Self {
        Self {
            media_id,
            kind: MediaKind::Movie,
            title: title.into(),
            season: None,
            episode: None,
        }
    }

    pub fn series(media_id: u64, title: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            media_id,
            kind: MediaKind::Series,
            title: title.into(),
            season: Some(season),
            episode: Some(episode),
        }
    }
}

/// Verdict of the navigation policy engine for one candidate URL
///
/// Computed per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Block,
}

impl NavigationDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, NavigationDecision::Allow)
    }
}

/// Snapshot of the selection a playback session had when an asynchronous
/// lookup was started
///
/// A resolved lookup is applied only if the session's current key still
/// matches; anything else is stale and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionKey {
    pub server: Server,
    pub season: u32,
    pub episode: u32,
}

impl SelectionKey {
    /// Season-level staleness: episode changes do not invalidate season data
    pub fn same_season(&self, other: &SelectionKey) -> bool {
        self.server == other.server && self.season == other.season
    }
}

/// Catalog-internal identifiers backing a human-readable season/episode pair
///
/// Required by the one playback backend that addresses episodes by catalog
/// id instead of by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEpisodeIds {
    pub season_id: u64,
    pub episode_id: u64,
}

/// One season of a series as returned by the catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDetails {
    pub id: u64,
    #[serde(default)]
    pub episodes: Vec<EpisodeRef>,
}

/// One episode inside a season payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub id: u64,
    pub episode_number: u32,
}

/// Season summary inside a series payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRef {
    pub id: u64,
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
}

/// Series-level metadata from the catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub seasons: Vec<SeasonRef>,
}

/// Compact title record kept in local lists (watchlist, favorites)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub media_id: u64,
    pub kind: MediaKind,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Watch-history record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub media: MediaSummary,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub watched_at: DateTime<Utc>,
}

/// Search-history record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEntry {
    pub query: String,
    pub searched_at: DateTime<Utc>,
}
