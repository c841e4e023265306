//! Local list persistence
//!
//! User lists (watchlist, favorites, watch history, search history) are
//! simple keyed JSON blobs on disk. This is deliberately not a database:
//! each list is one file, read and written whole.
//!
//! Reads are forgiving: a missing file is an empty list, and a corrupt
//! blob is logged and treated as empty rather than surfaced to the caller,
//! so a bad write can never brick the screens that render these lists.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::errors::StorageError;
use crate::models::{HistoryEntry, MediaSummary, SearchEntry};

/// Fixed keys the app stores lists under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    Watchlist,
    Favorites,
    History,
    SearchHistory,
}

impl ListKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKey::Watchlist => "watchlist",
            ListKey::Favorites => "favorites",
            ListKey::History => "history",
            ListKey::SearchHistory => "search_history",
        }
    }

    fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

/// Watch history keeps the most recent entries only
const HISTORY_CAP: usize = 100;
/// Search history is a short recall aid, not a log
const SEARCH_HISTORY_CAP: usize = 25;

/// File-backed JSON list store
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn path_for(&self, key: ListKey) -> PathBuf {
        self.data_dir.join(key.file_name())
    }

    /// Read a list; missing or corrupt data yields an empty list
    pub fn get<T: DeserializeOwned>(&self, key: ListKey) -> Vec<T> {
        let path = self.path_for(key);
        if !Path::new(&path).exists() {
            return Vec::new();
        }
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(key = key.as_str(), %error, "failed to read list, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(items) => items,
            Err(error) => {
                warn!(key = key.as_str(), %error, "corrupt list blob, treating as empty");
                Vec::new()
            }
        }
    }

    /// Replace a list wholesale
    pub fn set<T: Serialize>(&self, key: ListKey, items: &[T]) -> Result<(), StorageError> {
        let contents = serde_json::to_string(items)?;
        fs::write(self.path_for(key), contents)?;
        Ok(())
    }

    /// Toggle a title in the watchlist or favorites; returns whether the
    /// title is present after the call
    pub fn toggle_media(&self, key: ListKey, item: &MediaSummary) -> Result<bool, StorageError> {
        let mut items: Vec<MediaSummary> = self.get(key);
        let before = items.len();
        items.retain(|existing| existing.media_id != item.media_id || existing.kind != item.kind);
        let now_present = items.len() == before;
        if now_present {
            items.insert(0, item.clone());
        }
        self.set(key, &items)?;
        Ok(now_present)
    }

    /// Record a watch event, newest first, de-duplicated on
    /// (title, season, episode) and capped
    pub fn push_history(&self, entry: &HistoryEntry) -> Result<(), StorageError> {
        let mut items: Vec<HistoryEntry> = self.get(ListKey::History);
        items.retain(|existing| {
            existing.media.media_id != entry.media.media_id
                || existing.media.kind != entry.media.kind
                || existing.season != entry.season
                || existing.episode != entry.episode
        });
        items.insert(0, entry.clone());
        items.truncate(HISTORY_CAP);
        self.set(ListKey::History, &items)
    }

    /// Record a search query, newest first, de-duplicated and capped
    pub fn push_search(&self, query: &str) -> Result<(), StorageError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        let mut items: Vec<SearchEntry> = self.get(ListKey::SearchHistory);
        items.retain(|existing| existing.query != query);
        items.insert(
            0,
            SearchEntry {
                query: query.to_string(),
                searched_at: Utc::now(),
            },
        );
        items.truncate(SEARCH_HISTORY_CAP);
        self.set(ListKey::SearchHistory, &items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;

    fn temp_store() -> JsonFileStore {
        let dir = std::env::temp_dir().join(format!("vidgate-store-{}", uuid::Uuid::new_v4()));
        JsonFileStore::new(dir).unwrap()
    }

    fn summary(media_id: u64, title: &str) -> MediaSummary {
        MediaSummary {
            media_id,
            kind: MediaKind::Movie,
            title: title.to_string(),
            poster_path: None,
        }
    }

    #[test]
    fn test_missing_list_is_empty() {
        let store = temp_store();
        let items: Vec<MediaSummary> = store.get(ListKey::Watchlist);
        assert!(items.is_empty());
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let store = temp_store();
        let items = vec![summary(550, "Fight Club"), summary(680, "Pulp Fiction")];
        store.set(ListKey::Favorites, &items).unwrap();
        let loaded: Vec<MediaSummary> = store.get(ListKey::Favorites);
        assert_eq!(loaded, items);
    }

    #[test]
    fn test_corrupt_blob_treated_as_empty() {
        let store = temp_store();
        fs::write(store.path_for(ListKey::Watchlist), "{ not json").unwrap();
        let items: Vec<MediaSummary> = store.get(ListKey::Watchlist);
        assert!(items.is_empty());
    }

    #[test]
    fn test_toggle_media_adds_then_removes() {
        let store = temp_store();
        let item = summary(550, "Fight Club");
        assert!(store.toggle_media(ListKey::Watchlist, &item).unwrap());
        assert!(!store.toggle_media(ListKey::Watchlist, &item).unwrap());
        let items: Vec<MediaSummary> = store.get(ListKey::Watchlist);
        assert!(items.is_empty());
    }

    #[test]
    fn test_history_dedupes_and_moves_to_front() {
        let store = temp_store();
        let first = HistoryEntry {
            media: summary(550, "Fight Club"),
            season: None,
            episode: None,
            watched_at: Utc::now(),
        };
        let second = HistoryEntry {
            media: summary(680, "Pulp Fiction"),
            season: None,
            episode: None,
            watched_at: Utc::now(),
        };
        store.push_history(&first).unwrap();
        store.push_history(&second).unwrap();
        store.push_history(&first).unwrap();
        let items: Vec<HistoryEntry> = store.get(ListKey::History);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].media.media_id, 550);
        assert_eq!(items[1].media.media_id, 680);
    }

    #[test]
    fn test_search_history_dedupes_and_ignores_blank() {
        let store = temp_store();
        store.push_search("fight club").unwrap();
        store.push_search("dune").unwrap();
        store.push_search("fight club").unwrap();
        store.push_search("   ").unwrap();
        let items: Vec<SearchEntry> = store.get(ListKey::SearchHistory);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].query, "fight club");
        assert_eq!(items[1].query, "dune");
    }
}
