use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    path::PathBuf,
};

use crate::{classify::SaveTag, error::AdvisorError, model::SavedOutfit};

pub const FAVORITES_KEY: &str = "favoriteLocations";
pub const SAVED_OUTFITS_KEY: &str = "savedOutfits";

pub const DEFAULT_FAVORITES: [&str; 4] = ["Edinburgh, UK", "London, UK", "Bristol, UK", "York, UK"];

/// String key-value persistence. Values are JSON documents.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>, AdvisorError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AdvisorError>;
}

pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, AdvisorError> {
    store.get(key)?.map(|raw| serde_json::from_str(&raw)).transpose().map_err(Into::into)
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), AdvisorError> {
    store.set(key, &serde_json::to_string(value)?)
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AdvisorError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AdvisorError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        tracing::debug!(key, dir = %self.dir.display(), "Stored value");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AdvisorError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AdvisorError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// User's bookmarked locations, persisted under [`FAVORITES_KEY`].
#[derive(Debug)]
pub struct FavoriteLocations<'s> {
    store: &'s dyn KeyValueStore,
    items: Vec<String>,
}

impl<'s> FavoriteLocations<'s> {
    /// Load stored favourites, or the built-in defaults when none are stored.
    pub fn load(store: &'s dyn KeyValueStore) -> Result<Self, AdvisorError> {
        let items: Vec<String> = load_json(store, FAVORITES_KEY)?.unwrap_or_else(default_favorites);
        Ok(Self { store, items })
    }

    /// Like [`load`](Self::load), but unreadable data yields the defaults
    /// plus the error to report.
    pub fn load_or_default(store: &'s dyn KeyValueStore) -> (Self, Option<AdvisorError>) {
        match Self::load(store) {
            Ok(favorites) => (favorites, None),
            Err(e) => {
                tracing::warn!(error = %e, key = FAVORITES_KEY, "Using default favourites");
                (Self { store, items: default_favorites() }, Some(e))
            }
        }
    }

    pub fn list(&self) -> &[String] {
        &self.items
    }

    pub fn contains(&self, location: &str) -> bool {
        self.items.iter().any(|l| l == location)
    }

    /// Returns `false` if the location was already a favourite.
    pub fn add(&mut self, location: &str) -> Result<bool, AdvisorError> {
        if self.contains(location) {
            return Ok(false);
        }
        self.items.push(location.to_string());
        save_json(self.store, FAVORITES_KEY, &self.items)?;
        Ok(true)
    }

    pub fn remove(&mut self, location: &str) -> Result<bool, AdvisorError> {
        if !self.contains(location) {
            return Ok(false);
        }
        self.items.retain(|l| l != location);
        save_json(self.store, FAVORITES_KEY, &self.items)?;
        Ok(true)
    }
}

fn default_favorites() -> Vec<String> {
    DEFAULT_FAVORITES.iter().map(|s| s.to_string()).collect()
}

/// Bookmarked outfits, persisted under [`SAVED_OUTFITS_KEY`].
#[derive(Debug)]
pub struct SavedOutfits<'s> {
    store: &'s dyn KeyValueStore,
    items: Vec<SavedOutfit>,
}

impl<'s> SavedOutfits<'s> {
    pub fn load(store: &'s dyn KeyValueStore) -> Result<Self, AdvisorError> {
        let items: Vec<SavedOutfit> = load_json(store, SAVED_OUTFITS_KEY)?.unwrap_or_default();
        Ok(Self { store, items })
    }

    /// Like [`load`](Self::load), but unreadable data yields an empty list
    /// plus the error to report.
    pub fn load_or_default(store: &'s dyn KeyValueStore) -> (Self, Option<AdvisorError>) {
        match Self::load(store) {
            Ok(saved) => (saved, None),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = SAVED_OUTFITS_KEY,
                    "Starting with no saved outfits"
                );
                (Self { store, items: Vec::new() }, Some(e))
            }
        }
    }

    pub fn list(&self) -> &[SavedOutfit] {
        &self.items
    }

    /// Insert, or replace the record with the same id in place.
    pub fn save(&mut self, outfit: SavedOutfit) -> Result<(), AdvisorError> {
        match self.items.iter_mut().find(|o| o.id == outfit.id) {
            Some(existing) => *existing = outfit,
            None => self.items.push(outfit),
        }
        self.persist()
    }

    pub fn remove(&mut self, id: &str) -> Result<bool, AdvisorError> {
        let before = self.items.len();
        self.items.retain(|o| o.id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn is_saved(&self, location: &str, condition: &str) -> bool {
        let id = SavedOutfit::outfit_id(location, condition);
        self.items.iter().any(|o| o.id == id)
    }

    /// Remove the outfit if already saved, otherwise save it. Returns
    /// whether the outfit is saved afterwards.
    pub fn toggle(&mut self, outfit: SavedOutfit) -> Result<bool, AdvisorError> {
        if self.items.iter().any(|o| o.id == outfit.id) {
            self.remove(&outfit.id)?;
            Ok(false)
        } else {
            self.save(outfit)?;
            Ok(true)
        }
    }

    /// Wardrobe category filter; `None` means all.
    pub fn by_tag(&self, tag: Option<SaveTag>) -> Vec<&SavedOutfit> {
        self.items
            .iter()
            .filter(|o| tag.is_none_or(|t| o.weather_type == t))
            .collect()
    }

    fn persist(&self) -> Result<(), AdvisorError> {
        save_json(self.store, SAVED_OUTFITS_KEY, &self.items)
    }
}
