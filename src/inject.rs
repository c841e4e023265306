//! Injected runtime patcher payloads
//!
//! The hosted player pages are opaque third-party apps. The only leverage
//! the sandbox has inside them is script injected into their execution
//! context: once before any content loads and once after each navigation.
//! The payloads are carried as versioned templates and parameterized from
//! configuration at build time; nothing is derived at runtime inside the
//! page beyond the substitutions made here.
//!
//! Both payloads follow the same survival rules: every operation sits in
//! its own try/catch, a hostile page redefining a global degrades one
//! feature silently instead of crashing the page or the host, and nothing
//! alters response bodies, timing or error behavior of the traffic it
//! observes.

use crate::classifier;
use crate::config::{CleanupConfig, FilteringConfig};

/// Version of the script contract. Bump when the payload shape or the
/// message vocabulary changes so stored crash reports can be correlated.
pub const PATCHER_VERSION: u32 = 3;

/// Both payloads for one page load
#[derive(Debug, Clone)]
pub struct PatcherScripts {
    /// Injected before the document starts loading
    pub pre_load: String,
    /// Injected after load completes, and again after each navigation
    pub post_load: String,
}

/// Build both payloads from configuration
pub fn build_scripts(filtering: &FilteringConfig, cleanup: &CleanupConfig) -> PatcherScripts {
    PatcherScripts {
        pre_load: pre_load_script(filtering),
        post_load: cleanup_script(cleanup),
    }
}

/// Pre-load payload: popup/alert neutralization, fetch/XHR observation,
/// script-driven redirect suppression
pub fn pre_load_script(filtering: &FilteringConfig) -> String {
    PRE_LOAD_TEMPLATE
        .replace("__PATCHER_VERSION__", &PATCHER_VERSION.to_string())
        .replace("__MEDIA_EXTS__", &classifier::MEDIA_EXTENSIONS.join("|"))
        .replace(
            "__TRACKER_FRAGMENTS__",
            &json_string_array(&filtering.tracker_proxy_fragments),
        )
}

/// Post-load payload: continuous DOM cleanup of ad overlays and
/// back-navigation traps
pub fn cleanup_script(cleanup: &CleanupConfig) -> String {
    CLEANUP_TEMPLATE
        .replace("__PATCHER_VERSION__", &PATCHER_VERSION.to_string())
        .replace(
            "__OVERLAY_FRAGMENTS__",
            &json_string_array(&cleanup.overlay_class_fragments),
        )
        .replace("__CLEAN_INTERVAL_MS__", &cleanup.interval_ms.to_string())
}

fn json_string_array(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

const PRE_LOAD_TEMPLATE: &str = r#"(function () {
  if (window.__vgPatched) return;
  window.__vgPatched = __PATCHER_VERSION__;

  function emit(type, payload) {
    try {
      var msg = JSON.stringify({ type: type, payload: payload });
      if (window.ReactNativeWebView && window.ReactNativeWebView.postMessage) {
        window.ReactNativeWebView.postMessage(msg);
      } else if (window.ipc && window.ipc.postMessage) {
        window.ipc.postMessage(msg);
      } else if (window.webkit && window.webkit.messageHandlers && window.webkit.messageHandlers.host) {
        window.webkit.messageHandlers.host.postMessage(msg);
      }
    } catch (e) {}
  }

  var trackers = __TRACKER_FRAGMENTS__;
  function isMediaUrl(u) {
    try {
      var s = String(u);
      var path = s.split('?')[0].split('#')[0];
      if (/\.(__MEDIA_EXTS__)$/i.test(path)) return true;
      for (var i = 0; i < trackers.length; i++) {
        if (s.indexOf(trackers[i]) !== -1) return true;
      }
    } catch (e) {}
    return false;
  }

  try { window.open = function () { return null; }; } catch (e) {}
  try { window.alert = function () {}; } catch (e) {}

  // Observe fetch responses without altering them
  try {
    var origFetch = window.fetch;
    if (origFetch) {
      window.fetch = function (input) {
        var result = origFetch.apply(this, arguments);
        try {
          var requested = (input && input.url) ? input.url : String(input);
          result.then(function (res) {
            var resolved = (res && res.url) || requested;
            if (isMediaUrl(resolved)) emit('VIDEO_LINK', String(resolved));
          }).catch(function () {});
        } catch (e) {}
        return result;
      };
    }
  } catch (e) {}

  // Observe XHR the same way
  try {
    var origOpen = XMLHttpRequest.prototype.open;
    XMLHttpRequest.prototype.open = function (method, url) {
      try {
        this.__vgUrl = url;
        this.addEventListener('load', function () {
          try {
            var resolved = this.responseURL || this.__vgUrl;
            if (isMediaUrl(resolved)) emit('VIDEO_LINK', String(resolved));
          } catch (e) {}
        });
      } catch (e) {}
      return origOpen.apply(this, arguments);
    };
  } catch (e) {}

  // Suppress script-driven redirects; report instead of navigating
  try {
    window.location.assign = function (u) { emit('REDIRECT_BLOCKED', String(u)); };
  } catch (e) {}
  try {
    window.location.replace = function (u) { emit('REDIRECT_BLOCKED', String(u)); };
  } catch (e) {}
  try {
    Object.defineProperty(window.location, 'href', {
      set: function (u) { emit('REDIRECT_BLOCKED', String(u)); },
      get: function () { return document.URL; }
    });
  } catch (e) {}
})();"#;

const CLEANUP_TEMPLATE: &str = r#"(function () {
  if (window.__vgCleaner) return;
  window.__vgCleaner = __PATCHER_VERSION__;

  var fragments = __OVERLAY_FRAGMENTS__;

  function classMatches(el) {
    var cls = '';
    try { cls = String(el.className || '').toLowerCase(); } catch (e) { return false; }
    for (var i = 0; i < fragments.length; i++) {
      if (cls.indexOf(fragments[i]) !== -1) return true;
    }
    return false;
  }

  // Fixed-to-top containers that hold no video element are overlay chrome,
  // not the player
  function isTopOverlay(el) {
    try {
      var style = window.getComputedStyle(el);
      if (style.position !== 'fixed') return false;
      var rect = el.getBoundingClientRect();
      if (rect.top > 1) return false;
      return !el.querySelector('video');
    } catch (e) {
      return false;
    }
  }

  function sweep() {
    try {
      var nodes = document.querySelectorAll('div,section,aside,iframe,a');
      for (var i = 0; i < nodes.length; i++) {
        var el = nodes[i];
        if (classMatches(el) || (el.tagName !== 'IFRAME' && isTopOverlay(el))) {
          try { el.remove(); } catch (e) {}
        }
      }
    } catch (e) {}
  }

  sweep();
  var timer = setInterval(sweep, __CLEAN_INTERVAL_MS__);
  var observer = null;
  try {
    observer = new MutationObserver(sweep);
    observer.observe(document.documentElement, { childList: true, subtree: true });
  } catch (e) {}

  // Teardown so timers and observers never leak across page loads
  window.addEventListener('unload', function () {
    try { clearInterval(timer); } catch (e) {}
    try { if (observer) observer.disconnect(); } catch (e) {}
  });
})();"#;
