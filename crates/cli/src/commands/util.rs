use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use hero_core::api::HeroApi;
use hero_core::browser::HeroBrowser;
use hero_core::cache::Snapshot;
use hero_core::config::{ClientContext, ClientLayout};
use hero_core::model::Hero;
use hero_core::pagination::{PageToken, PaginationWindow};
use serde::Serialize;

use crate::canonicalize_or_current;

/// Open the workspace at `root`, with a friendly error when it was never initialized.
pub fn open_context(root: &str) -> Result<ClientContext> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ClientLayout::new(&root_path);
    if !layout.is_initialized() {
        return Err(anyhow!(
            "No hero-browser workspace at {} (run `hero-browser init` first)",
            root_path.display()
        ));
    }
    tracing::debug!(root = %root_path.display(), "opening workspace");
    ClientContext::from_root(&root_path)
}

/// Browsing session over HTTP for the workspace at `root`.
pub fn open_browser(root: &str) -> Result<HeroBrowser> {
    let ctx = open_context(root)?;
    let api = ctx.http_api()?;
    tracing::debug!(endpoint = %api.endpoint(), "using hero backend");
    let api: Arc<dyn HeroApi> = Arc::new(api);
    Ok(ctx.into_browser(api))
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.exists();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Print `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", serialized);
    Ok(())
}

/// Turn a finished snapshot into its value, or the fetch error.
pub fn settled_value<T: Clone>(snapshot: &Snapshot<T>, what: &str) -> Result<T> {
    if let Some(err) = &snapshot.error {
        return Err(anyhow!("Failed to load {what}: {err}"));
    }
    snapshot.data().cloned().ok_or_else(|| anyhow!("No {what} available"))
}

/// One-line summary of a hero: `[*] Clark Kent (Superman) #1 Hero str 10 int 9`.
pub fn hero_line(hero: &Hero, favorite: bool) -> String {
    let marker = if favorite { "*" } else { " " };
    let alias = if hero.alias.is_empty() { String::new() } else { format!(" ({})", hero.alias) };
    format!(
        "[{marker}] {}{alias} #{} {:?} str {} int {}",
        hero.name, hero.id, hero.category, hero.strength, hero.intelligence
    )
}

/// Text pager: `< 1 ... 4 [5] 6 ... 10 >`, with unavailable arrows shown as `-`.
pub fn pager_line(window: &PaginationWindow) -> String {
    let mut parts = vec![if window.has_previous { "<" } else { "-" }.to_string()];
    for token in &window.tokens {
        parts.push(match token {
            PageToken::Page(page) if window.is_current(*page) => format!("[{page}]"),
            PageToken::Page(page) => page.to_string(),
            PageToken::Ellipsis => "...".to_string(),
        });
    }
    parts.push(if window.has_next { ">" } else { "-" }.to_string());
    parts.join(" ")
}
