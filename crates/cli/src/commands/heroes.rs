use anyhow::Result;
use hero_core::browser::HeroBrowser;
use hero_core::model::{Hero, SummaryInformation};
use hero_core::pagination::PaginationWindow;
use hero_core::params::Tab;
use serde::Serialize;

use crate::commands::{hero_line, open_browser, pager_line, print_json, settled_value};

/// Result of `list`, as printed with `--json`.
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub query: String,
    pub tab: Tab,
    pub page: u32,
    pub limit: u32,
    pub category: String,
    pub total: u32,
    pub heroes: Vec<ListedHero>,
    pub pagination: PaginationWindow,
    pub total_heroes: u32,
    pub favorite_count: usize,
    pub favorite_percentage: String,
}

#[derive(Debug, Serialize)]
pub struct ListedHero {
    #[serde(flatten)]
    pub hero: Hero,
    pub favorite: bool,
}

/// Result of `search`, as printed with `--json`.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub filters: hero_core::search::SearchFilters,
    pub heroes: Vec<ListedHero>,
}

/// Load the home listing for an address query.
pub async fn list_output(browser: &mut HeroBrowser, query: Option<&str>) -> Result<ListOutput> {
    if let Some(query) = query {
        browser.navigate(query);
    }
    let view = browser.home_view_settled().await;
    if view.params.tab != Tab::Favorites {
        settled_value(&view.list, "heroes")?;
    }

    let heroes = view
        .visible_heroes()
        .iter()
        .map(|hero| ListedHero { hero: hero.clone(), favorite: view.is_favorite(hero) })
        .collect();

    Ok(ListOutput {
        query: browser.query_string(),
        tab: view.params.tab,
        page: view.params.page,
        limit: view.params.limit,
        category: view.params.category.clone(),
        total: view.list.data().map(|page| page.total).unwrap_or(0),
        heroes,
        pagination: view.pagination.clone(),
        total_heroes: view.stats.total_heroes,
        favorite_count: view.stats.favorite_count,
        favorite_percentage: view.stats.favorite_percentage.clone(),
    })
}

/// Load search results for an address query, with optional overrides.
pub async fn search_output(
    browser: &mut HeroBrowser,
    query: Option<&str>,
    name: Option<&str>,
    strength: Option<&str>,
) -> Result<SearchOutput> {
    if let Some(query) = query {
        browser.navigate(query);
    }
    if let Some(name) = name {
        browser.set_search_text(name);
    }
    if strength.is_some() {
        browser.set_strength(strength);
    }

    let view = browser.search_view_settled().await;
    let found = settled_value(&view.results, "search results")?;
    let heroes = found
        .into_iter()
        .map(|hero| {
            let favorite = browser.favorites().is_favorite(&hero);
            ListedHero { hero, favorite }
        })
        .collect();

    Ok(SearchOutput { query: browser.query_string(), filters: view.filters, heroes })
}

pub async fn list_command(root: &str, query: Option<&str>, json: bool) -> Result<()> {
    let mut browser = open_browser(root)?;
    let output = list_output(&mut browser, query).await?;
    if json {
        return print_json(&output);
    }

    println!(
        "Tab: {} | Category: {} | Page {} of {} | {} per page",
        output.tab.as_str(),
        output.category,
        output.pagination.current_page,
        output.pagination.total_pages,
        output.limit
    );
    println!(
        "Total heroes: {} | Favorites: {} ({})",
        output.total_heroes, output.favorite_count, output.favorite_percentage
    );
    println!();
    if output.heroes.is_empty() {
        println!("(no heroes)");
    }
    for listed in &output.heroes {
        println!("{}", hero_line(&listed.hero, listed.favorite));
    }
    if output.tab != Tab::Favorites && output.pagination.total_pages > 0 {
        println!();
        println!("{}", pager_line(&output.pagination));
    }

    Ok(())
}

pub async fn show_command(root: &str, id_or_slug: &str, json: bool) -> Result<()> {
    let browser = open_browser(root)?;
    let view = browser.hero_view_settled(id_or_slug).await;
    let hero = settled_value(&view.hero, &format!("hero '{id_or_slug}'"))?;

    if json {
        return print_json(&ListedHero { hero, favorite: view.is_favorite });
    }

    println!("{}", hero_line(&hero, view.is_favorite));
    println!("  Slug: {}", hero.slug);
    if !hero.description.is_empty() {
        println!("  {}", hero.description);
    }
    println!(
        "  Strength {} | Intelligence {} | Speed {} | Durability {}",
        hero.strength, hero.intelligence, hero.speed, hero.durability
    );
    if !hero.powers.is_empty() {
        println!("  Powers: {}", hero.powers.join(", "));
    }
    println!("  Team: {} | Universe: {} | Status: {}", hero.team, hero.universe, hero.status);
    println!("  First appearance: {}", hero.first_appearance);
    println!("  Image: {}", hero.image);

    Ok(())
}

pub async fn search_command(
    root: &str,
    query: Option<&str>,
    name: Option<&str>,
    strength: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut browser = open_browser(root)?;
    let output = search_output(&mut browser, query, name, strength).await?;
    if json {
        return print_json(&output);
    }

    if output.filters.name.is_none() && output.filters.strength.is_none() {
        println!("No search filters given.");
        return Ok(());
    }
    println!("{} result(s)", output.heroes.len());
    for listed in &output.heroes {
        println!("{}", hero_line(&listed.hero, listed.favorite));
    }

    Ok(())
}

pub async fn summary_command(root: &str, json: bool) -> Result<()> {
    let browser = open_browser(root)?;
    let snapshot = browser.summary_settled().await;
    let summary: SummaryInformation = settled_value(&snapshot, "summary")?;

    if json {
        return print_json(&summary);
    }

    println!("Total heroes: {}", summary.total_heroes);
    println!("Heroes: {} | Villains: {}", summary.hero_count, summary.villain_count);
    if let Some(hero) = &summary.strongest_hero {
        println!("Strongest: {} ({})", hero.name, hero.strength);
    }
    if let Some(hero) = &summary.smartest_hero {
        println!("Smartest: {} ({})", hero.name, hero.intelligence);
    }
    println!(
        "Favorites: {} ({})",
        browser.favorites().favorite_count(),
        browser.favorites().percentage_label(u64::from(summary.total_heroes))
    );

    Ok(())
}
