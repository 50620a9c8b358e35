use std::fs;

use anyhow::{Context, Result};
use hero_core::config::{save_client_config, ClientConfig, ClientLayout, API_URL_ENV};
use hero_core::favorites::{LoadOutcome, SqliteFavoritesBackend};
use serde::Serialize;

use crate::commands::{open_context, print_dir_status, print_json};
use crate::{canonicalize_or_current, infer_workspace_name};

#[derive(Serialize)]
pub struct WorkspaceInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub api_base_url: String,
    pub effective_api_url: String,
    pub stale_time_secs: u64,
    pub keep_previous_on_error: bool,
    pub favorites_db: String,
    pub favorites_schema_version: i32,
    pub favorite_count: usize,
    pub favorites_load: LoadOutcome,
}

/// Initialize a new workspace at `root`.
pub fn init_command(root: &str, name: Option<String>, api_url: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ClientLayout::new(&root_path);

    let workspace_name = match name {
        Some(n) => n,
        None => infer_workspace_name(&root_path),
    };

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;

    let mut config = ClientConfig::new(&workspace_name, layout.favorites_path_relative_string());
    if let Some(url) = api_url {
        config = config.with_api_base_url(url);
    }
    save_client_config(&layout, &config)?;

    // Create the favorites database now so later commands can rely on it.
    SqliteFavoritesBackend::open(&layout.favorites_db_path).with_context(|| {
        format!("Failed to initialize favorites database at {}", layout.favorites_db_path.display())
    })?;

    println!("Initialized hero-browser workspace:");
    println!("  Name: {}", workspace_name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  API: {}", config.api_base_url);
    println!("  Favorites DB (relative): {}", config.favorites.path);

    Ok(())
}

/// Show basic information about an existing workspace.
pub fn info_command(root: &str, json: bool) -> Result<()> {
    let ctx = open_context(root)?;
    let schema_version = ctx.backend.schema_version().context("Failed to read schema version")?;
    let layout = ctx.layout.clone();
    let config = ctx.config.clone();
    let favorites_path = ctx.favorites_path.clone();
    let store = ctx.into_favorites();

    if json {
        let snapshot = WorkspaceInfoSnapshot {
            name: config.name.clone(),
            root: layout.root.display().to_string(),
            config_file: layout.config_path.display().to_string(),
            config_version: config.config_version.clone(),
            api_base_url: config.api_base_url.clone(),
            effective_api_url: config.effective_api_url(),
            stale_time_secs: config.stale_time_secs,
            keep_previous_on_error: config.keep_previous_on_error,
            favorites_db: favorites_path.display().to_string(),
            favorites_schema_version: schema_version,
            favorite_count: store.favorite_count(),
            favorites_load: store.load_outcome().clone(),
        };
        return print_json(&snapshot);
    }

    println!("Hero Browser Workspace Info");
    println!("===========================");
    println!("Name: {}", config.name);
    println!("Root: {}", layout.root.display());
    println!("Config file: {}", layout.config_path.display());
    println!("Config version: {}", config.config_version);
    println!("API base URL (config): {}", config.api_base_url);
    let effective = config.effective_api_url();
    if effective != config.api_base_url {
        println!("API base URL ({API_URL_ENV}): {}", effective);
    }
    println!("Stale time: {}s", config.stale_time_secs);
    println!("Keep previous on error: {}", config.keep_previous_on_error);
    println!();
    println!("Paths:");
    print_dir_status("Meta dir (.heroes)", &layout.meta_dir);
    print_dir_status("Favorites DB", &favorites_path);
    println!();
    println!("Favorites: {} (schema v{})", store.favorite_count(), schema_version);
    if let LoadOutcome::Corrupt(reason) = store.load_outcome() {
        println!("Warning: stored favorites were unreadable and will be replaced: {reason}");
    }

    Ok(())
}
