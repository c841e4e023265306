//! Playback backend descriptors
//!
//! Each alternate third-party player site is one variant of a closed enum,
//! keyed `server1`..`server7` for route parameters and saved preferences.
//! Adding a backend is a reviewable change here rather than a mutation of a
//! keyed function map.
//!
//! Every variant is an opaque third-party page once loaded; the only
//! contract is the URL template below. `SuperEmbed` is the odd one out: its
//! series routes address episodes by the catalog service's internal ids, so
//! URL construction may consume a resolved id pair and falls back to the
//! numeric selection until (or unless) that lookup lands.

use serde::{Deserialize, Serialize};

use crate::models::{MediaKind, PlaybackRequest, ResolvedEpisodeIds};

/// One configured playback backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Server {
    Vidlink,
    VidsrcTo,
    VidsrcCc,
    EmbedSu,
    MultiEmbed,
    MoviesApi,
    SuperEmbed,
}

impl Server {
    /// All configured backends, in presentation order. The first entry is
    /// the default selection for a new playback session.
    pub const ALL: [Server; 7] = [
        Server::Vidlink,
        Server::VidsrcTo,
        Server::VidsrcCc,
        Server::EmbedSu,
        Server::MultiEmbed,
        Server::MoviesApi,
        Server::SuperEmbed,
    ];

    /// Stable key used in routes and saved preferences
    pub fn key(self) -> &'static str {
        match self {
            Server::Vidlink => "server1",
            Server::VidsrcTo => "server2",
            Server::VidsrcCc => "server3",
            Server::EmbedSu => "server4",
            Server::MultiEmbed => "server5",
            Server::MoviesApi => "server6",
            Server::SuperEmbed => "server7",
        }
    }

    /// Human-readable label for server pickers
    pub fn label(self) -> &'static str {
        match self {
            Server::Vidlink => "VidLink",
            Server::VidsrcTo => "VidSrc",
            Server::VidsrcCc => "VidSrc v2",
            Server::EmbedSu => "EmbedSu",
            Server::MultiEmbed => "MultiEmbed",
            Server::MoviesApi => "MoviesApi",
            Server::SuperEmbed => "AutoEmbed",
        }
    }

    pub fn from_key(key: &str) -> Option<Server> {
        Server::ALL.iter().copied().find(|s| s.key() == key)
    }

    /// True if series URLs for this backend are built from catalog-internal
    /// season/episode ids rather than the human-readable numbers
    pub fn requires_id_resolution(self) -> bool {
        matches!(self, Server::SuperEmbed)
    }

    /// Build the player page URL for a request and the current selection
    ///
    /// Pure: same inputs, same URL. `resolved` is consulted only by backends
    /// that address episodes by catalog id; when it is absent those backends
    /// degrade to the numeric selection so there is always a URL to load.
    pub fn player_url(
        self,
        request: &PlaybackRequest,
        season: u32,
        episode: u32,
        resolved: Option<&ResolvedEpisodeIds>,
    ) -> String {
        let id = request.media_id;
        match (self, request.kind) {
            (Server::Vidlink, MediaKind::Movie) => {
                format!("https://vidlink.pro/movie/{id}")
            }
            (Server::Vidlink, MediaKind::Series) => {
                format!("https://vidlink.pro/tv/{id}/{season}/{episode}")
            }
            (Server::VidsrcTo, MediaKind::Movie) => {
                format!("https://vidsrc.to/embed/movie/{id}")
            }
            (Server::VidsrcTo, MediaKind::Series) => {
                format!("https://vidsrc.to/embed/tv/{id}/{season}/{episode}")
            }
            (Server::VidsrcCc, MediaKind::Movie) => {
                format!("https://vidsrc.cc/v2/embed/movie/{id}")
            }
            (Server::VidsrcCc, MediaKind::Series) => {
                format!("https://vidsrc.cc/v2/embed/tv/{id}/{season}/{episode}")
            }
            (Server::EmbedSu, MediaKind::Movie) => {
                format!("https://embed.su/embed/movie/{id}")
            }
            (Server::EmbedSu, MediaKind::Series) => {
                format!("https://embed.su/embed/tv/{id}/{season}/{episode}")
            }
            (Server::MultiEmbed, MediaKind::Movie) => {
                format!(
                    "https://multiembed.mov/directstream.php?video_id={id}&tmdb=1&title={}",
                    urlencoding::encode(&request.title)
                )
            }
            (Server::MultiEmbed, MediaKind::Series) => {
                format!(
                    "https://multiembed.mov/directstream.php?video_id={id}&tmdb=1&s={season}&e={episode}&title={}",
                    urlencoding::encode(&request.title)
                )
            }
            (Server::MoviesApi, MediaKind::Movie) => {
                format!("https://moviesapi.club/movie/{id}")
            }
            (Server::MoviesApi, MediaKind::Series) => {
                format!("https://moviesapi.club/tv/{id}-{season}-{episode}")
            }
            (Server::SuperEmbed, MediaKind::Movie) => {
                format!("https://player.autoembed.cc/embed/movie/{id}")
            }
            (Server::SuperEmbed, MediaKind::Series) => match resolved {
                Some(ids) => format!(
                    "https://player.autoembed.cc/embed/tv/{id}/{}/{}",
                    ids.season_id, ids.episode_id
                ),
                None => format!("https://player.autoembed.cc/embed/tv/{id}/{season}/{episode}"),
            },
        }
    }
}

impl std::fmt::Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
