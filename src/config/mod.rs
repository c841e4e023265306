use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable configuration for the playback sandbox
///
/// Constructed once at startup and injected into the policy engine, the
/// injected-script builder and the session controller. Nothing here is
/// ambient global state, so tests substitute their own instances freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub proxy: ProxyConfig,
    pub gate: GateConfig,
    pub filtering: FilteringConfig,
    pub cleanup: CleanupConfig,
    pub storage: StorageConfig,
}

/// Thin backend proxy in front of the catalog metadata service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Base URL; the proxy injects the catalog API key server-side
    pub base_url: String,
}

/// Remote feature-gate document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub url: String,
    /// JSON field to read from the document
    pub field: String,
    /// Value the field must equal for the gate to be open
    pub expected: String,
}

/// Domain lists consumed by the URL classifier and the policy engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilteringConfig {
    /// Hostname substrings that mark ad/popup/gambling networks
    pub ad_host_fragments: Vec<String>,
    /// Hostname substrings for CDNs legitimate players pull assets from
    pub cdn_host_fragments: Vec<String>,
    /// URL substrings for relay/worker deployments that front media
    pub tracker_proxy_fragments: Vec<String>,
    /// Domains of the catalog metadata service
    pub catalog_hosts: Vec<String>,
    /// Hosts that are both a player host and a redirect target, split by path
    pub deep_link_rules: Vec<DeepLinkRule>,
}

/// Carve-out for a host whose root path must be blocked while sub-paths
/// containing the marker must be allowed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLinkRule {
    /// Hostname substring the rule applies to
    pub host_fragment: String,
    /// Path marker that distinguishes the legitimate player sub-path
    pub path_marker: String,
}

/// DOM-cleanup behavior of the injected runtime patcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Re-run interval for the cleanup sweep inside the hosted page
    pub interval_ms: u64,
    /// Class-name substrings that mark ad overlays and back-navigation traps
    pub overlay_class_fragments: Vec<String>,
}

/// Local list persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig::default(),
            gate: GateConfig::default(),
            filtering: FilteringConfig::default(),
            cleanup: CleanupConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://catalog.vidgate.app/3".to_string(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            url: "https://vidgate.app/gate.json".to_string(),
            field: "status".to_string(),
            expected: "open".to_string(),
        }
    }
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            ad_host_fragments: Self::default_ad_host_fragments(),
            cdn_host_fragments: Self::default_cdn_host_fragments(),
            tracker_proxy_fragments: Self::default_tracker_proxy_fragments(),
            catalog_hosts: Self::default_catalog_hosts(),
            deep_link_rules: Self::default_deep_link_rules(),
        }
    }
}

impl FilteringConfig {
    /// Shipped ad-network blocklist; overridable via configuration
    pub fn default_ad_host_fragments() -> Vec<String> {
        [
            "doubleclick",
            "googlesyndication",
            "adservice",
            "adsterra",
            "adsco",
            "popads",
            "popcash",
            "propeller",
            "exoclick",
            "juicyads",
            "trafficjunky",
            "clickadu",
            "hilltopads",
            "onclicka",
            "betting",
            "1xbet",
            "casino",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    /// Shipped CDN allowlist; overridable via configuration
    pub fn default_cdn_host_fragments() -> Vec<String> {
        [
            "cloudflare",
            "cloudfront",
            "akamai",
            "fastly",
            "jsdelivr",
            "cdnjs",
            "unpkg",
            "gstatic",
            "googleapis",
            "bootstrapcdn",
            "bunny",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn default_tracker_proxy_fragments() -> Vec<String> {
        ["workers.dev", "corsproxy", "m3u8-proxy"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn default_catalog_hosts() -> Vec<String> {
        ["themoviedb.org", "tmdb.org"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// The multi-embed host serves its player under the directstream
    /// sub-path; everything at its root is redirect bait
    pub fn default_deep_link_rules() -> Vec<DeepLinkRule> {
        vec![DeepLinkRule {
            host_fragment: "multiembed".to_string(),
            path_marker: "directstream".to_string(),
        }]
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_ms: 800,
            overlay_class_fragments: Self::default_overlay_class_fragments(),
        }
    }
}

impl CleanupConfig {
    pub fn default_overlay_class_fragments() -> Vec<String> {
        [
            "popup",
            "pop-up",
            "ad-container",
            "ad-overlay",
            "adsbox",
            "banner-ad",
            "interstitial",
            "back-button",
            "redirect-notice",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/lists"),
        }
    }
}

impl SandboxConfig {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::create_dir_all(&default_config.storage.data_dir)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }
}
