use anyhow::{anyhow, Result};
use hero_core::browser::HeroBrowser;
use hero_core::favorites::{FavoritesStore, SaveStatus};
use hero_core::model::Hero;
use serde::Serialize;

use crate::commands::{hero_line, open_browser, open_context, print_json, settled_value};

#[derive(Debug, Serialize)]
pub struct ToggleOutput {
    pub id: String,
    pub name: String,
    pub favorite: bool,
    pub favorite_count: usize,
    pub saved: bool,
}

pub fn favorites_list_command(root: &str, json: bool) -> Result<()> {
    let store = open_context(root)?.into_favorites();
    let favorites: Vec<&Hero> = store.favorites().collect();
    if json {
        return print_json(&favorites);
    }

    if favorites.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }
    println!("Favorites ({}):", favorites.len());
    for hero in favorites {
        println!("{}", hero_line(hero, true));
    }
    Ok(())
}

/// Toggle `id_or_slug`. A current favorite is removed without contacting the
/// backend; anything else is fetched first so the full record is stored.
pub async fn toggle_favorite(browser: &mut HeroBrowser, id_or_slug: &str) -> Result<ToggleOutput> {
    let existing = browser
        .favorites()
        .favorites()
        .find(|hero| hero.id == id_or_slug || hero.slug == id_or_slug)
        .cloned();

    let hero = match existing {
        Some(hero) => {
            tracing::debug!(id = %hero.id, "already a favorite, removing without a fetch");
            hero
        }
        None => {
            let view = browser.hero_view_settled(id_or_slug).await;
            settled_value(&view.hero, &format!("hero '{id_or_slug}'"))?
        }
    };

    let favorite = browser.toggle_favorite(&hero);
    let store = browser.favorites();
    Ok(ToggleOutput {
        id: hero.id.clone(),
        name: hero.name.clone(),
        favorite,
        favorite_count: store.favorite_count(),
        saved: matches!(store.last_save(), SaveStatus::Saved),
    })
}

pub async fn favorites_toggle_command(root: &str, id_or_slug: &str, json: bool) -> Result<()> {
    let mut browser = open_browser(root)?;
    let output = toggle_favorite(&mut browser, id_or_slug).await?;
    if !output.saved {
        return Err(anyhow!("Favorite changed in memory but could not be saved"));
    }
    if json {
        return print_json(&output);
    }

    let verb = if output.favorite { "Added" } else { "Removed" };
    println!("{verb} {} (#{}). Favorites: {}", output.name, output.id, output.favorite_count);
    Ok(())
}

pub fn favorites_clear_command(root: &str) -> Result<()> {
    let mut store: FavoritesStore = open_context(root)?.into_favorites();
    let removed = store.favorite_count();
    store.clear();
    if let SaveStatus::Failed(reason) = store.last_save() {
        return Err(anyhow!("Failed to clear favorites: {reason}"));
    }
    println!("Removed {removed} favorite(s).");
    Ok(())
}
