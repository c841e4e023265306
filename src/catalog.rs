//! Catalog metadata service client
//!
//! Read-only client for the TMDB-compatible catalog API, reached through
//! the thin backend proxy that injects the API key server-side. The
//! sandbox consumes it for two things: resolving human-readable
//! season/episode numbers to the catalog's internal ids (one playback
//! backend addresses episodes by id), and episode counts for clamping a
//! stale episode selection.
//!
//! Any non-success status surfaces as [`CatalogError::Http`] with the
//! status embedded, per the proxy contract.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::errors::CatalogError;
use crate::models::{MediaKind, MediaSummary, SeasonDetails, SeriesDetails};

/// Seam over the catalog service so controllers and tests can substitute
/// their own implementation
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Series-level metadata, including the season list
    async fn series(&self, media_id: u64) -> Result<SeriesDetails, CatalogError>;

    /// One season with its episode list
    async fn season(&self, media_id: u64, season_number: u32)
        -> Result<SeasonDetails, CatalogError>;

    /// Multi-type title search
    async fn search(&self, query: &str) -> Result<Vec<MediaSummary>, CatalogError>;
}

/// reqwest-backed client against the proxy backend
pub struct ProxyCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyCatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Endpoint path for series metadata
    pub fn series_url(&self, media_id: u64) -> String {
        format!("{}/tv/{media_id}", self.base_url)
    }

    /// Endpoint path for one season of a series
    pub fn season_url(&self, media_id: u64, season_number: u32) -> String {
        format!("{}/tv/{media_id}/season/{season_number}", self.base_url)
    }

    /// Endpoint path for multi search
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search/multi?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        debug!(url, "catalog request");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::http(status.as_u16(), url));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogService for ProxyCatalogClient {
    async fn series(&self, media_id: u64) -> Result<SeriesDetails, CatalogError> {
        self.get_json(&self.series_url(media_id)).await
    }

    async fn season(
        &self,
        media_id: u64,
        season_number: u32,
    ) -> Result<SeasonDetails, CatalogError> {
        self.get_json(&self.season_url(media_id, season_number)).await
    }

    async fn search(&self, query: &str) -> Result<Vec<MediaSummary>, CatalogError> {
        let page: RawSearchPage = self.get_json(&self.search_url(query)).await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(RawSearchResult::into_summary)
            .collect())
    }
}

#[derive(Deserialize)]
struct RawSearchPage {
    #[serde(default)]
    results: Vec<RawSearchResult>,
}

/// Raw multi-search hit; people and unknown media types are dropped during
/// conversion
#[derive(Deserialize)]
struct RawSearchResult {
    id: u64,
    #[serde(default)]
    media_type: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

impl RawSearchResult {
    fn into_summary(self) -> Option<MediaSummary> {
        let kind = match self.media_type.as_str() {
            "movie" => MediaKind::Movie,
            "tv" => MediaKind::Series,
            _ => return None,
        };
        let title = self.title.or(self.name)?;
        Some(MediaSummary {
            media_id: self.id,
            kind,
            title,
            poster_path: self.poster_path,
        })
    }
}
