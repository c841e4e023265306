//! Navigation policy engine
//!
//! Decides, once per navigation or resource request the hosted page
//! attempts, whether the web view may follow it. Rules are evaluated in a
//! fixed order and the first match wins; the order is load-bearing. In
//! particular the deep-link carve-out must run before the related-hostname
//! heuristic, because the same host can be both a legitimate player
//! (marker sub-path) and a disallowed redirect target (root path).
//!
//! A candidate that cannot be parsed is Blocked: the engine fails closed.
//! Every Block is logged so a mis-detected legitimate resource can be
//! diagnosed; the accepted recovery for such a false positive is switching
//! servers, not loosening the rules here.

use tracing::debug;

use crate::classifier;
use crate::config::{FilteringConfig, SandboxConfig};
use crate::models::NavigationDecision;

/// Trust profile of the screen hosting the web view
///
/// The two watch screens run the same rule chain but at different trust
/// levels; they stay separate named profiles instead of being unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenProfile {
    /// Inline player embedded in a detail screen
    Embedded,
    /// Dedicated fullscreen watch screen; additionally trusts navigation
    /// that stays on the exact hostname currently loaded
    Fullscreen,
}

/// Policy engine for one hosting context
pub struct NavigationPolicy {
    profile: ScreenProfile,
    filtering: FilteringConfig,
}

impl NavigationPolicy {
    pub fn new(profile: ScreenProfile, config: &SandboxConfig) -> Self {
        Self {
            profile,
            filtering: config.filtering.clone(),
        }
    }

    pub fn profile(&self) -> ScreenProfile {
        self.profile
    }

    /// Decide whether the web view may follow `candidate`, requested from
    /// the page at `origin`
    ///
    /// Synchronous-callback-shaped: must return quickly and has no side
    /// effect beyond the verdict (and a log line on Block).
    pub fn decide(&self, candidate: &str, origin: &str) -> NavigationDecision {
        // 1. Internal URIs the web view itself produces
        if is_internal_uri(candidate) {
            return NavigationDecision::Allow;
        }

        let Some(candidate_host) = classifier::hostname(candidate) else {
            debug!(candidate, origin, reason = "unparseable", "blocking navigation");
            return NavigationDecision::Block;
        };
        let origin_host = classifier::hostname(origin);

        // 2. Deep-link carve-out: root path blocked, marker sub-path allowed.
        // Must precede the related-hostname check or the root path would be
        // allowed as "related" to the player page that linked to it.
        for rule in &self.filtering.deep_link_rules {
            if candidate_host.contains(rule.host_fragment.as_str()) {
                let path_allowed = candidate_path_contains(candidate, &rule.path_marker);
                if !path_allowed {
                    debug!(
                        candidate,
                        origin,
                        rule = %rule.host_fragment,
                        reason = "deep-link-root",
                        "blocking navigation"
                    );
                    return NavigationDecision::Block;
                }
                return NavigationDecision::Allow;
            }
        }

        // 3. Resource classes playback depends on
        if classifier::is_media_file(candidate)
            || classifier::is_subtitle_file(candidate)
            || classifier::is_tracker_proxy(candidate, &self.filtering.tracker_proxy_fragments)
            || classifier::is_catalog_request(candidate, &self.filtering.catalog_hosts)
            || classifier::is_proxy_with_destination(candidate)
        {
            return NavigationDecision::Allow;
        }

        if let Some(origin_host) = origin_host.as_deref() {
            // Fullscreen screens additionally trust exact-host navigation
            if self.profile == ScreenProfile::Fullscreen && origin_host == candidate_host {
                return NavigationDecision::Allow;
            }

            // 4. Heuristic relatedness between origin and candidate
            if classifier::related_hostnames(origin_host, &candidate_host) {
                return NavigationDecision::Allow;
            }
        }

        // 5. CDN allowlist
        if self
            .filtering
            .cdn_host_fragments
            .iter()
            .any(|fragment| candidate_host.contains(fragment.as_str()))
        {
            return NavigationDecision::Allow;
        }

        // 6. Ad-network blocklist
        if classifier::is_ad_domain(candidate, &self.filtering.ad_host_fragments) {
            debug!(candidate, origin, reason = "ad-domain", "blocking navigation");
            return NavigationDecision::Block;
        }

        // 7. Default deny
        debug!(candidate, origin, reason = "default", "blocking navigation");
        NavigationDecision::Block
    }
}

/// Schemes the web view generates internally while juggling player frames
fn is_internal_uri(candidate: &str) -> bool {
    candidate.starts_with("about:")
        || candidate.starts_with("data:")
        || candidate.starts_with("blob:")
}

fn candidate_path_contains(candidate: &str, marker: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(parsed) => parsed.path().contains(marker),
        Err(_) => false,
    }
}
