use std::path::{Path, PathBuf};

/// Logical layout of a client workspace on disk.
///
/// Derived from a chosen root path. It does *not* perform any IO itself;
/// frontends create directories and files based on it.
#[derive(Debug, Clone)]
pub struct ClientLayout {
    /// Root directory of the workspace.
    pub root: PathBuf,
    /// Directory for internal metadata (.heroes).
    pub meta_dir: PathBuf,
    /// Path to the client config file (JSON).
    pub config_path: PathBuf,
    /// Path to the favorites database file.
    pub favorites_db_path: PathBuf,
}

impl ClientLayout {
    /// Compute the default layout for a workspace rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".heroes");
        let config_path = meta_dir.join("config.json");
        let favorites_db_path = meta_dir.join("favorites.db");

        Self { root, meta_dir, config_path, favorites_db_path }
    }

    /// Favorites database path suitable for storing in `ClientConfig`,
    /// relative to `root` when possible.
    pub fn favorites_path_relative_string(&self) -> String {
        match self.favorites_db_path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => self.favorites_db_path.to_string_lossy().to_string(),
        }
    }

    /// Resolve a path from the config against `root` unless it is absolute.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.config_path.is_file()
    }
}
