use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{ClientConfig, ClientLayout};
use crate::favorites::SqliteFavoritesBackend;

/// Load the client config JSON from disk for a given layout.
pub fn load_client_config(layout: &ClientLayout) -> Result<ClientConfig> {
    let config_json = std::fs::read_to_string(&layout.config_path).with_context(|| {
        format!("Failed to read client config at {}", layout.config_path.display())
    })?;
    let config: ClientConfig =
        serde_json::from_str(&config_json).context("Failed to parse client config JSON")?;
    Ok(config)
}

/// Write `config` to the layout's config path, creating the metadata directory.
pub fn save_client_config(layout: &ClientLayout, config: &ClientConfig) -> Result<()> {
    std::fs::create_dir_all(&layout.meta_dir).with_context(|| {
        format!("Failed to create metadata directory {}", layout.meta_dir.display())
    })?;
    let json = serde_json::to_string_pretty(config).context("Failed to serialize client config")?;
    std::fs::write(&layout.config_path, json).with_context(|| {
        format!("Failed to write client config to {}", layout.config_path.display())
    })?;
    Ok(())
}

/// Resolve the favorites DB path (relative or absolute) and open it.
pub fn open_favorites_backend(
    layout: &ClientLayout,
    config: &ClientConfig,
) -> Result<(PathBuf, SqliteFavoritesBackend)> {
    let db_path = layout.resolve(&config.favorites.path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let backend = SqliteFavoritesBackend::open(&db_path)
        .with_context(|| format!("Failed to open favorites database at {}", db_path.display()))?;
    Ok((db_path, backend))
}
