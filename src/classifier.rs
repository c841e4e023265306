//! URL classification predicates
//!
//! Pure, stateless predicates over URL strings, consumed by the navigation
//! policy engine, the injected runtime patcher and the session controller.
//!
//! Every function here is total: a URL that fails to parse is simply a
//! non-match. Classification never returns an error and never panics, so the
//! policy engine can fail closed on top of it.

use url::Url;

/// Streamable container/extension suffixes, matched case-insensitively
/// against the path component of a URL
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "webm", "avi", "mov", "wmv", "flv", "ts", "m3u8", "m3u", "ogv",
];

/// Subtitle file extensions
pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "vtt", "ass", "ssa", "sub", "sbv", "ttml"];

/// Query parameter names that proxy endpoints use to carry their real
/// destination
const DESTINATION_PARAMS: &[&str] = &["url", "src", "source", "link", "destination"];

/// Extract the lowercase extension of a URL's path component, ignoring query
/// string and fragment
fn path_extension(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path();
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// True if the URL's path names a known streamable media file
///
/// The query string is ignored for the match, but callers report the raw URL
/// downstream, query and all.
pub fn is_media_file(url: &str) -> bool {
    match path_extension(url) {
        Some(ext) => MEDIA_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// True if the URL's path names a subtitle file
pub fn is_subtitle_file(url: &str) -> bool {
    match path_extension(url) {
        Some(ext) => SUBTITLE_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// True if the URL contains a known relay-hosting substring
///
/// Player pages route media through throwaway worker/relay deployments; the
/// hosting platforms are recognizable by substring anywhere in the URL.
pub fn is_tracker_proxy(url: &str, relay_fragments: &[String]) -> bool {
    let lowered = url.to_ascii_lowercase();
    relay_fragments
        .iter()
        .any(|fragment| lowered.contains(fragment.as_str()))
}

/// True if the URL's hostname belongs to the catalog metadata service
pub fn is_catalog_request(url: &str, catalog_hosts: &[String]) -> bool {
    let Some(host) = hostname(url) else {
        return false;
    };
    catalog_hosts
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

/// True if the URL's hostname contains a blocklisted ad-network substring
pub fn is_ad_domain(url: &str, ad_fragments: &[String]) -> bool {
    let Some(host) = hostname(url) else {
        return false;
    };
    ad_fragments
        .iter()
        .any(|fragment| host.contains(fragment.as_str()))
}

/// True if the URL is a proxy endpoint carrying an absolute http(s)
/// destination in a well-known query parameter
pub fn is_proxy_with_destination(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    parsed.query_pairs().any(|(key, value)| {
        DESTINATION_PARAMS.contains(&key.as_ref())
            && (value.starts_with("http://") || value.starts_with("https://"))
    })
}

/// Lowercase hostname of a URL, None if it does not parse
pub fn hostname(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}

/// Label fragments carrying no identity: TLD-like tokens and the www prefix
const GENERIC_TOKENS: &[&str] = &[
    "www", "com", "net", "org", "info", "biz", "online", "site", "club", "live", "icu", "wtf",
    "lat", "win", "app", "dev", "pro", "xyz", "top", "mov", "stream", "cloud", "cdn",
];

/// Tokenize a hostname for the relatedness heuristic: split labels on
/// separators, keep tokens of length >= 3 that are not purely numeric and
/// not generic TLD-like noise
fn host_tokens(host: &str) -> Vec<String> {
    host.split(['.', '-', '_'])
        .map(|label| label.to_ascii_lowercase())
        .filter(|label| label.len() >= 3)
        .filter(|label| !label.chars().all(|c| c.is_ascii_digit()))
        .filter(|label| !GENERIC_TOKENS.contains(&label.as_str()))
        .collect()
}

/// Heuristic hostname relatedness
///
/// Two hostnames are considered related if any identity token of one is a
/// substring of an identity token of the other, in either direction. The
/// relation is symmetric but NOT transitive, and it is an approximation, not
/// exact domain matching: lexically similar strangers can over-match, and
/// genuinely related hosts with dissimilar names under-match. Downstream
/// policy behavior depends on this exact shape; do not tighten it.
pub fn related_hostnames(host_a: &str, host_b: &str) -> bool {
    let tokens_a = host_tokens(host_a);
    let tokens_b = host_tokens(host_b);
    tokens_a.iter().any(|a| {
        tokens_b
            .iter()
            .any(|b| a.contains(b.as_str()) || b.contains(a.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_media_file_extensions() {
        assert!(is_media_file("https://cdn.example.com/video.mp4"));
        assert!(is_media_file("https://cdn.example.com/video.MKV"));
        assert!(is_media_file("https://cdn.example.com/hls/master.m3u8"));
        assert!(is_media_file("https://cdn.example.com/seg/00042.ts"));
        assert!(!is_media_file("https://cdn.example.com/video.html"));
        assert!(!is_media_file("https://cdn.example.com/video"));
    }

    #[test]
    fn test_media_file_ignores_query_and_fragment() {
        assert!(is_media_file(
            "https://cdn.example.com/video.mp4?token=abc&expires=123"
        ));
        assert!(is_media_file("https://cdn.example.com/video.mp4#t=30"));
        // extension hiding inside the query string is not a match
        assert!(!is_media_file("https://cdn.example.com/page?file=video.mp4"));
    }

    #[test]
    fn test_media_file_is_deterministic() {
        let url = "https://cdn.example.com/video.webm?sig=1";
        assert_eq!(is_media_file(url), is_media_file(url));
    }

    #[test]
    fn test_subtitle_file() {
        assert!(is_subtitle_file("https://subs.example.com/ep1.srt"));
        assert!(is_subtitle_file("https://subs.example.com/ep1.vtt?lang=en"));
        assert!(!is_subtitle_file("https://subs.example.com/ep1.mp4"));
    }

    #[test]
    fn test_malformed_urls_never_match() {
        for bad in ["", "not a url", "http://", "://missing.scheme/x.mp4"] {
            assert!(!is_media_file(bad));
            assert!(!is_subtitle_file(bad));
            assert!(!is_catalog_request(bad, &fragments(&["themoviedb.org"])));
            assert!(!is_ad_domain(bad, &fragments(&["doubleclick"])));
            assert!(!is_proxy_with_destination(bad));
        }
    }

    #[test]
    fn test_tracker_proxy_substring() {
        let relays = fragments(&["workers.dev", "corsproxy"]);
        assert!(is_tracker_proxy(
            "https://quiet-dawn-1234.workers.dev/fetch",
            &relays
        ));
        assert!(!is_tracker_proxy("https://example.com/fetch", &relays));
    }

    #[test]
    fn test_catalog_request() {
        let hosts = fragments(&["themoviedb.org", "tmdb.org"]);
        assert!(is_catalog_request(
            "https://api.themoviedb.org/3/tv/1399",
            &hosts
        ));
        assert!(is_catalog_request(
            "https://image.tmdb.org/t/p/w500/x.jpg",
            &hosts
        ));
        assert!(!is_catalog_request("https://themoviedb.org.evil.com/", &hosts));
    }

    #[test]
    fn test_ad_domain() {
        let ads = fragments(&["doubleclick", "popads"]);
        assert!(is_ad_domain("https://ad.doubleclick.net/ddm/clk", &ads));
        assert!(is_ad_domain("https://c1.popads.net/pop.js", &ads));
        assert!(!is_ad_domain("https://vidlink.pro/movie/550", &ads));
    }

    #[test]
    fn test_proxy_with_destination() {
        assert!(is_proxy_with_destination(
            "https://relay.example.com/p?url=https://cdn.example.com/v.mp4"
        ));
        assert!(is_proxy_with_destination(
            "https://relay.example.com/p?src=http://cdn.example.com/v"
        ));
        assert!(!is_proxy_with_destination(
            "https://relay.example.com/p?url=video.mp4"
        ));
        assert!(!is_proxy_with_destination("https://relay.example.com/p"));
    }

    #[test]
    fn test_related_hostnames_overlap() {
        assert!(related_hostnames("vidlink.pro", "vidlink.pro"));
        assert!(related_hostnames("vidsrc.cc", "vidsrc-cdn-7.example.net"));
        assert!(related_hostnames("cdn.vidlink.pro", "vidlink.pro"));
        assert!(!related_hostnames("vidlink.pro", "doubleclick.net"));
    }

    #[test]
    fn test_related_hostnames_symmetry() {
        let pairs = [
            ("vidlink.pro", "cdn.vidlink.pro"),
            ("vidsrc.cc", "doubleclick.net"),
            ("multiembed.mov", "streamingnow.example"),
        ];
        for (a, b) in pairs {
            assert_eq!(related_hostnames(a, b), related_hostnames(b, a));
        }
    }

    #[test]
    fn test_related_hostnames_ignores_numeric_and_short_tokens() {
        // "123" is purely numeric, "s1" is too short; neither may relate hosts
        assert!(!related_hostnames("123.cdn-a.example", "123.cdn-b.other"));
        assert!(!related_hostnames("s1.alpha.example", "s1.beta.other"));
    }
}
