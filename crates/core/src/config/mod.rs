//! Client workspace configuration.
//!
//! A workspace is a directory holding `.heroes/config.json` and the favorites
//! database. [`ClientLayout`] computes the paths, [`ClientConfig`] is the
//! serialized settings, and [`ClientContext`] opens everything for a session.

mod layout;
mod settings;
mod util;

pub use layout::ClientLayout;
pub use settings::{ClientConfig, FavoritesConfig, API_URL_ENV, DEFAULT_API_URL};
pub use util::{load_client_config, open_favorites_backend, save_client_config};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{HeroApi, HttpHeroApi};
use crate::browser::HeroBrowser;
use crate::favorites::{FavoritesStore, SqliteFavoritesBackend};

/// Layout, config, and the opened favorites database for one workspace.
#[derive(Debug)]
pub struct ClientContext {
    pub layout: ClientLayout,
    pub config: ClientConfig,
    pub favorites_path: PathBuf,
    pub backend: SqliteFavoritesBackend,
}

impl ClientContext {
    /// Load the config and open the favorites database for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ClientLayout::new(root);
        let config = load_client_config(&layout)?;
        let (favorites_path, backend) = open_favorites_backend(&layout, &config)?;
        Ok(Self { layout, config, favorites_path, backend })
    }

    /// HTTP client for the configured (or overridden) server.
    pub fn http_api(&self) -> Result<HttpHeroApi> {
        let url = self.config.effective_api_url();
        HttpHeroApi::new(&url).with_context(|| format!("Invalid API base URL: {url}"))
    }

    /// Favorites store over this workspace's database.
    pub fn into_favorites(self) -> FavoritesStore {
        FavoritesStore::open(self.backend)
    }

    /// Browsing session over `api` with this workspace's favorites and cache policy.
    pub fn into_browser(self, api: Arc<dyn HeroApi>) -> HeroBrowser {
        let policy = self.config.fetch_policy();
        HeroBrowser::new(api, FavoritesStore::open(self.backend), policy)
    }
}
