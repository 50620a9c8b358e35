//! Favorited heroes.
//!
//! [`FavoritesStore`] is the single owner of the favorites set for a session.
//! It keeps full hero snapshots so the favorites tab renders without a fetch,
//! and rewrites the whole persisted payload after every toggle.
//!
//! Persistence is behind [`FavoritesBackend`]. Backend failures never reach
//! the caller: a failed load starts from an empty set, a failed save leaves
//! the in-memory set correct and is reported through [`FavoritesStore::last_save`].

mod backend;
mod sqlite;

pub use backend::{FavoritesBackend, MemoryFavoritesBackend, StoreError, StoreResult};
pub use sqlite::{SqliteFavoritesBackend, CURRENT_SCHEMA_VERSION};

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::Hero;

/// Key under which the favorites payload is stored.
pub const FAVORITES_KEY: &str = "favoriteHeroes";

/// What happened when the store read its backend at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Nothing had been saved yet.
    NeverSaved,
    /// Payload decoded; number of favorites restored.
    Loaded(usize),
    /// Payload existed but did not decode. It is replaced on the next toggle.
    Corrupt(String),
    /// The backend itself failed to read.
    Unavailable(String),
}

/// Result of the most recent write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SaveStatus {
    NotAttempted,
    Saved,
    /// In-memory state is correct but the change was not persisted.
    Failed(String),
}

pub struct FavoritesStore {
    backend: Box<dyn FavoritesBackend>,
    favorites: IndexMap<String, Hero>,
    load_outcome: LoadOutcome,
    last_save: SaveStatus,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("backend", &self.backend.describe())
            .field("favorites", &self.favorites.len())
            .field("load_outcome", &self.load_outcome)
            .field("last_save", &self.last_save)
            .finish()
    }
}

impl FavoritesStore {
    /// Build the store from whatever the backend holds.
    ///
    /// Never fails. Malformed payloads reset to an empty set; the outcome is
    /// kept in [`load_outcome`](Self::load_outcome) so callers can tell a
    /// fresh start from lost data.
    pub fn open(backend: impl FavoritesBackend + 'static) -> Self {
        Self::open_boxed(Box::new(backend))
    }

    pub fn open_boxed(backend: Box<dyn FavoritesBackend>) -> Self {
        let (favorites, load_outcome) = match backend.load() {
            Ok(None) => (IndexMap::new(), LoadOutcome::NeverSaved),
            Ok(Some(bytes)) => match decode(&bytes) {
                Ok(favorites) => {
                    let count = favorites.len();
                    (favorites, LoadOutcome::Loaded(count))
                }
                Err(err) => {
                    tracing::warn!(
                        backend = %backend.describe(),
                        error = %err,
                        "favorites payload is malformed, starting empty"
                    );
                    (IndexMap::new(), LoadOutcome::Corrupt(err.to_string()))
                }
            },
            Err(err) => {
                tracing::warn!(
                    backend = %backend.describe(),
                    error = %err,
                    "failed to read favorites, starting empty"
                );
                (IndexMap::new(), LoadOutcome::Unavailable(err.to_string()))
            }
        };
        tracing::debug!(count = favorites.len(), outcome = ?load_outcome, "favorites loaded");

        Self { backend, favorites, load_outcome, last_save: SaveStatus::NotAttempted }
    }

    /// Store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::open(MemoryFavoritesBackend::new())
    }

    /// Add `hero` if absent, remove it if present. Returns whether it is now a favorite.
    ///
    /// The full set is persisted afterwards.
    pub fn toggle_favorite(&mut self, hero: &Hero) -> bool {
        let now_favorite = if self.favorites.shift_remove(&hero.id).is_some() {
            false
        } else {
            self.favorites.insert(hero.id.clone(), hero.clone());
            true
        };
        tracing::debug!(id = %hero.id, favorite = now_favorite, "toggled favorite");
        self.persist();
        now_favorite
    }

    /// Remove every favorite and persist the empty set.
    pub fn clear(&mut self) {
        self.favorites.clear();
        self.persist();
    }

    pub fn is_favorite(&self, hero: &Hero) -> bool {
        self.is_favorite_id(&hero.id)
    }

    pub fn is_favorite_id(&self, id: &str) -> bool {
        self.favorites.contains_key(id)
    }

    /// Favorites in the order they were added.
    pub fn favorites(&self) -> impl ExactSizeIterator<Item = &Hero> + '_ {
        self.favorites.values()
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    /// Share of `total_heroes` that are favorites, in percent. Zero when `total_heroes` is zero.
    pub fn favorite_percentage(&self, total_heroes: u64) -> f64 {
        if total_heroes == 0 {
            return 0.0;
        }
        self.favorites.len() as f64 / total_heroes as f64 * 100.0
    }

    /// Display form, e.g. `"4.00% of total"`.
    pub fn percentage_label(&self, total_heroes: u64) -> String {
        format!("{:.2}% of total", self.favorite_percentage(total_heroes))
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn last_save(&self) -> &SaveStatus {
        &self.last_save
    }

    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }

    /// Serialized form of the current set, as written to the backend.
    pub fn payload(&self) -> Vec<u8> {
        // Serializing plain structs into a Vec cannot fail.
        serde_json::to_vec(&self.favorites.values().collect::<Vec<_>>()).unwrap_or_default()
    }

    fn persist(&mut self) {
        let payload = self.payload();
        self.last_save = match self.backend.save(&payload) {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                tracing::warn!(
                    backend = %self.backend.describe(),
                    error = %err,
                    "failed to persist favorites"
                );
                SaveStatus::Failed(err.to_string())
            }
        };
    }
}

fn decode(bytes: &[u8]) -> serde_json::Result<IndexMap<String, Hero>> {
    let heroes: Vec<Hero> = serde_json::from_slice(bytes)?;
    let mut favorites = IndexMap::with_capacity(heroes.len());
    for hero in heroes {
        // First snapshot wins if an older payload carries duplicates.
        favorites.entry(hero.id.clone()).or_insert(hero);
    }
    Ok(favorites)
}
