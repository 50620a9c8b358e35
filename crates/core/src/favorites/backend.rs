use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Error type for favorites persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable slot holding the serialized favorites payload.
///
/// Every `save` replaces the whole value; implementations must not expose a
/// partially written payload to a later `load`.
pub trait FavoritesBackend: Send {
    /// Read the stored payload, `None` if nothing was ever saved.
    fn load(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Replace the stored payload.
    fn save(&self, payload: &[u8]) -> StoreResult<()>;

    /// Short label for logs and `info` output.
    fn describe(&self) -> String;
}

/// In-memory backend. Clones share the same slot, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoritesBackend {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
    fail_saves: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl MemoryFavoritesBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with a payload, as if saved by an earlier session.
    pub fn with_payload(payload: impl Into<Vec<u8>>) -> Self {
        let backend = Self::default();
        *backend.lock() = Some(payload.into());
        backend
    }

    /// Current raw payload.
    pub fn payload(&self) -> Option<Vec<u8>> {
        self.lock().clone()
    }

    /// Current payload as text, for assertions.
    pub fn payload_string(&self) -> Option<String> {
        self.payload().map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Make subsequent saves fail with an I/O error.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<u8>>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FavoritesBackend for MemoryFavoritesBackend {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.payload())
    }

    fn save(&self, payload: &[u8]) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("memory backend is read-only").into());
        }
        *self.lock() = Some(payload.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
