//! Playback session controller
//!
//! Owns all mutable state for one visit to a watch screen: the selected
//! playback backend, season/episode selection, the derived player URL, the
//! captured media links, and the loading flag. All transitions happen on
//! the caller's event loop; the hosted page runs behind a process boundary
//! and talks back only through the message bridge, so no locking is needed
//! here.
//!
//! The derived URL is recomputed from current fields on every read; it is
//! never cached, so it can never go stale. Any change to the server or the
//! season/episode selection clears the captured links and raises the
//! loading flag in the same transition.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bridge::{self, BridgeEvent};
use crate::models::{
    MediaKind, PlaybackRequest, ResolvedEpisodeIds, SeasonDetails, SelectionKey,
};
use crate::policy::ScreenProfile;
use crate::servers::Server;

/// Lifecycle state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No selection yet (a session constructed from route parameters never
    /// observes this state; it exists for unselected defaults)
    #[default]
    Idle,
    /// Selection active, hosted page not yet finished loading
    Loading,
    /// Hosted page reported load completion
    Ready,
}

/// Device-chrome operations the controller drives at screen boundaries
///
/// The embedding shell implements this; tests substitute a recorder.
pub trait ScreenHost {
    fn lock_landscape(&mut self);
    fn restore_portrait(&mut self);
    fn set_status_bar_hidden(&mut self, hidden: bool);
}

/// No-op host for headless use (CLI, tests that don't care)
#[derive(Debug, Default)]
pub struct NoopScreenHost;

impl ScreenHost for NoopScreenHost {
    fn lock_landscape(&mut self) {}
    fn restore_portrait(&mut self) {}
    fn set_status_bar_hidden(&mut self, _hidden: bool) {}
}

/// Per-screen playback session state machine
pub struct PlaybackController {
    session_id: Uuid,
    request: PlaybackRequest,
    profile: ScreenProfile,
    server: Server,
    season: u32,
    episode: u32,
    resolved_ids: Option<ResolvedEpisodeIds>,
    captured: Vec<String>,
    state: SessionState,
    host: Box<dyn ScreenHost>,
}

impl PlaybackController {
    /// Create a session from route parameters; this is the screen-mount
    /// point, so the fullscreen profile locks orientation here
    pub fn new(request: PlaybackRequest, profile: ScreenProfile, mut host: Box<dyn ScreenHost>) -> Self {
        if profile == ScreenProfile::Fullscreen {
            host.lock_landscape();
            host.set_status_bar_hidden(true);
        }
        let season = request.season.unwrap_or(1);
        let episode = request.episode.unwrap_or(1);
        let session_id = Uuid::new_v4();
        info!(
            %session_id,
            media_id = request.media_id,
            kind = %request.kind,
            "playback session started"
        );
        Self {
            session_id,
            request,
            profile,
            server: Server::ALL[0],
            season,
            episode,
            resolved_ids: None,
            captured: Vec::new(),
            state: SessionState::Loading,
            host,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn request(&self) -> &PlaybackRequest {
        &self.request
    }

    pub fn profile(&self) -> ScreenProfile {
        self.profile
    }

    pub fn server(&self) -> Server {
        self.server
    }

    pub fn season(&self) -> u32 {
        self.season
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    /// Captured media links, insertion-ordered and de-duplicated
    pub fn captured_links(&self) -> &[String] {
        &self.captured
    }

    /// Current selection, snapshotted for staleness checks on async lookups
    pub fn selection_key(&self) -> SelectionKey {
        SelectionKey {
            server: self.server,
            season: self.season,
            episode: self.episode,
        }
    }

    /// The player URL for the current selection
    ///
    /// Pure derivation from session fields; calling it twice with no
    /// intervening mutation yields the same URL.
    pub fn current_url(&self) -> String {
        self.server
            .player_url(&self.request, self.season, self.episode, self.resolved_ids.as_ref())
    }

    /// True if the current server wants a catalog id lookup for series
    /// playback; the shell should run the lookup and feed the result to
    /// [`apply_season_details`](Self::apply_season_details)
    pub fn needs_id_resolution(&self) -> bool {
        self.request.kind == MediaKind::Series && self.server.requires_id_resolution()
    }

    pub fn select_server(&mut self, server: Server) {
        debug!(session_id = %self.session_id, server = %server, "server selected");
        self.server = server;
        self.begin_selection_change();
    }

    /// Select a season; the episode selection always restarts at 1
    pub fn select_season(&mut self, season: u32) {
        debug!(session_id = %self.session_id, season, "season selected");
        self.season = season;
        self.episode = 1;
        self.begin_selection_change();
    }

    pub fn select_episode(&mut self, episode: u32) {
        debug!(session_id = %self.session_id, episode, "episode selected");
        self.episode = episode;
        self.begin_selection_change();
    }

    /// The hosted page finished loading
    pub fn on_page_load_end(&mut self) {
        if self.state == SessionState::Loading {
            self.state = SessionState::Ready;
        }
    }

    /// Consume one raw message from the bridge
    ///
    /// Malformed input is logged and dropped; this never fails and never
    /// disturbs session state on bad input.
    pub fn on_message(&mut self, raw: &str) {
        match bridge::decode(raw) {
            Ok(BridgeEvent::VideoLink(url)) => {
                if !self.captured.iter().any(|existing| *existing == url) {
                    debug!(session_id = %self.session_id, %url, "media link captured");
                    self.captured.push(url);
                }
            }
            Ok(BridgeEvent::RedirectBlocked(target)) => {
                debug!(session_id = %self.session_id, %target, "hosted page redirect suppressed");
            }
            Ok(BridgeEvent::Ignored(kind)) => {
                debug!(session_id = %self.session_id, %kind, "unhandled bridge message");
            }
            Err(error) => {
                warn!(session_id = %self.session_id, %error, "dropping malformed bridge message");
            }
        }
    }

    /// Apply season data that arrived from the catalog service
    ///
    /// `key` is the selection snapshot taken when the lookup started. A
    /// result for a season the user has already navigated away from is
    /// discarded; async results must never apply out of order.
    ///
    /// Two effects when fresh: a stale episode selection pointing past the
    /// end of the arriving episode list is clamped back to 1, and for
    /// id-addressed backends the catalog ids for the selected episode are
    /// resolved so the player URL can upgrade from its numeric fallback.
    pub fn apply_season_details(&mut self, key: SelectionKey, details: &SeasonDetails) {
        if !key.same_season(&self.selection_key()) {
            debug!(
                session_id = %self.session_id,
                stale_season = key.season,
                current_season = self.season,
                "discarding stale season lookup"
            );
            return;
        }

        let episode_count = details.episodes.len() as u32;
        if episode_count > 0 && self.episode > episode_count {
            debug!(
                session_id = %self.session_id,
                episode = self.episode,
                episode_count,
                "episode selection out of range, clamping"
            );
            self.select_episode(1);
        }

        self.resolved_ids = details
            .episodes
            .iter()
            .find(|episode| episode.episode_number == self.episode)
            .map(|episode| ResolvedEpisodeIds {
                season_id: details.id,
                episode_id: episode.id,
            });
    }

    /// Atomic selection-change reset: captured links, resolved ids and the
    /// loading flag always move together
    fn begin_selection_change(&mut self) {
        self.captured.clear();
        self.resolved_ids = None;
        self.state = SessionState::Loading;
    }
}

impl Drop for PlaybackController {
    /// Screen-unmount restore; runs unconditionally, including on unwind
    /// mid-load, so a rotated, chrome-less screen never leaks out of the
    /// watch screen
    fn drop(&mut self) {
        self.host.restore_portrait();
        self.host.set_status_bar_hidden(false);
        info!(session_id = %self.session_id, "playback session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EpisodeRef;

    fn series_controller() -> PlaybackController {
        PlaybackController::new(
            PlaybackRequest::series(1399, "Game of Thrones", 1, 1),
            ScreenProfile::Fullscreen,
            Box::new(NoopScreenHost),
        )
    }

    fn video_link(url: &str) -> String {
        format!(r#"{{"type":"VIDEO_LINK","payload":"{url}"}}"#)
    }

    #[test]
    fn test_initial_state_from_request() {
        let controller = series_controller();
        assert_eq!(controller.server(), Server::Vidlink);
        assert_eq!(controller.season(), 1);
        assert_eq!(controller.episode(), 1);
        assert!(controller.is_loading());
        assert!(controller.captured_links().is_empty());
    }

    #[test]
    fn test_captured_links_deduplicate_and_keep_order() {
        let mut controller = series_controller();
        controller.on_message(&video_link("https://a.example/1.mp4"));
        controller.on_message(&video_link("https://b.example/2.m3u8"));
        controller.on_message(&video_link("https://a.example/1.mp4"));
        assert_eq!(
            controller.captured_links(),
            ["https://a.example/1.mp4", "https://b.example/2.m3u8"]
        );
    }

    #[test]
    fn test_malformed_messages_leave_state_alone() {
        let mut controller = series_controller();
        controller.on_message(&video_link("https://a.example/1.mp4"));
        controller.on_message("garbage");
        controller.on_message(r#"{"type":"VIDEO_LINK","payload":17}"#);
        controller.on_message(r#"{"type":"SOMETHING_NEW","payload":"x"}"#);
        assert_eq!(controller.captured_links(), ["https://a.example/1.mp4"]);
    }

    #[test]
    fn test_server_change_resets_links_and_loading() {
        let mut controller = series_controller();
        controller.on_message(&video_link("https://a.example/1.mp4"));
        controller.on_page_load_end();
        assert!(!controller.is_loading());

        controller.select_server(Server::VidsrcCc);
        assert!(controller.captured_links().is_empty());
        assert!(controller.is_loading());
    }

    #[test]
    fn test_season_change_forces_episode_one() {
        let mut controller = series_controller();
        controller.select_episode(7);
        for n in 1..=10 {
            controller.on_message(&video_link(&format!("https://a.example/{n}.mp4")));
        }
        assert_eq!(controller.captured_links().len(), 10);

        controller.select_season(2);
        assert_eq!(controller.season(), 2);
        assert_eq!(controller.episode(), 1);
        assert!(controller.captured_links().is_empty());
        assert!(controller.is_loading());
    }

    #[test]
    fn test_current_url_tracks_selection() {
        let mut controller = series_controller();
        assert_eq!(controller.current_url(), "https://vidlink.pro/tv/1399/1/1");
        controller.select_season(2);
        controller.select_episode(3);
        assert_eq!(controller.current_url(), "https://vidlink.pro/tv/1399/2/3");
        assert_eq!(controller.current_url(), controller.current_url());
    }

    #[test]
    fn test_stale_season_lookup_discarded() {
        let mut controller = series_controller();
        controller.select_server(Server::SuperEmbed);
        controller.select_season(1);
        let stale_key = controller.selection_key();

        // user moves on before the lookup resolves
        controller.select_season(2);
        let url_before = controller.current_url();

        let details = SeasonDetails {
            id: 3624,
            episodes: vec![EpisodeRef {
                id: 63056,
                episode_number: 1,
            }],
        };
        controller.apply_season_details(stale_key, &details);
        assert_eq!(controller.current_url(), url_before);
    }

    #[test]
    fn test_fresh_season_lookup_upgrades_url() {
        let mut controller = series_controller();
        controller.select_server(Server::SuperEmbed);
        controller.select_season(2);
        controller.select_episode(3);
        assert!(controller.needs_id_resolution());
        assert_eq!(
            controller.current_url(),
            "https://player.autoembed.cc/embed/tv/1399/2/3"
        );

        let details = SeasonDetails {
            id: 3625,
            episodes: vec![
                EpisodeRef { id: 63056, episode_number: 1 },
                EpisodeRef { id: 63057, episode_number: 2 },
                EpisodeRef { id: 63058, episode_number: 3 },
            ],
        };
        controller.apply_season_details(controller.selection_key(), &details);
        assert_eq!(
            controller.current_url(),
            "https://player.autoembed.cc/embed/tv/1399/3625/63058"
        );
    }

    #[test]
    fn test_out_of_range_episode_clamps_to_one() {
        let mut controller = series_controller();
        controller.select_season(2);
        controller.select_episode(9);
        let details = SeasonDetails {
            id: 3625,
            episodes: vec![
                EpisodeRef { id: 63056, episode_number: 1 },
                EpisodeRef { id: 63057, episode_number: 2 },
            ],
        };
        controller.apply_season_details(controller.selection_key(), &details);
        assert_eq!(controller.episode(), 1);
        assert!(controller.is_loading());
    }

    #[test]
    fn test_load_end_transitions_once() {
        let mut controller = series_controller();
        controller.on_page_load_end();
        assert_eq!(controller.state(), SessionState::Ready);
        controller.on_page_load_end();
        assert_eq!(controller.state(), SessionState::Ready);
    }
}
