use std::sync::Arc;

use hero_browser::commands::{list_output, search_output, toggle_favorite};
use hero_core::api::{HeroApi, MockHeroApi, RecordedRequest};
use hero_core::browser::HeroBrowser;
use hero_core::cache::FetchPolicy;
use hero_core::error::HeroError;
use hero_core::favorites::FavoritesStore;
use hero_core::model::Hero;
use hero_core::params::Tab;

const BASE: &str = "http://localhost:3000";

fn roster() -> Vec<Hero> {
    let mut clark = Hero::new("1", "Clark Kent").with_slug("clark-kent").with_image("1.jpg");
    clark.alias = "Superman".into();
    clark.strength = 10;
    let mut bruce = Hero::new("2", "Bruce Wayne").with_slug("bruce-wayne").with_image("2.jpg");
    bruce.alias = "Batman".into();
    bruce.strength = 5;
    let mut diana = Hero::new("3", "Diana Prince").with_slug("diana-prince").with_image("3.jpg");
    diana.alias = "Wonder Woman".into();
    diana.strength = 9;
    vec![clark, bruce, diana]
}

fn browser_for(api: &MockHeroApi) -> HeroBrowser {
    let api: Arc<dyn HeroApi> = Arc::new(api.clone());
    HeroBrowser::new(api, FavoritesStore::in_memory(), FetchPolicy::default())
}

#[tokio::test]
async fn list_output_reports_page_and_stats() {
    let api = MockHeroApi::new(BASE).with_heroes(roster());
    let mut browser = browser_for(&api);

    let output = list_output(&mut browser, Some("?limit=2")).await.unwrap();
    assert_eq!(output.tab, Tab::All);
    assert_eq!(output.page, 1);
    assert_eq!(output.limit, 2);
    assert_eq!(output.total, 3);
    assert_eq!(output.heroes.len(), 2);
    assert_eq!(output.heroes[0].hero.image, "http://localhost:3000/images/1.jpeg");
    assert!(!output.heroes[0].favorite);
    assert_eq!(output.pagination.total_pages, 2);
    assert_eq!(output.favorite_percentage, "0.00% of total");
    assert_eq!(output.query, "limit=2");
}

#[tokio::test]
async fn list_output_marks_favorites_and_shows_favorites_tab() {
    let api = MockHeroApi::new(BASE).with_heroes(roster());
    let mut browser = browser_for(&api);
    let bruce = roster()[1].clone();
    browser.toggle_favorite(&bruce);

    let all = list_output(&mut browser, None).await.unwrap();
    assert!(all.heroes.iter().any(|listed| listed.hero.id == "2" && listed.favorite));
    assert_eq!(all.favorite_count, 1);

    let favorites = list_output(&mut browser, Some("?tab=favorites")).await.unwrap();
    assert_eq!(favorites.tab, Tab::Favorites);
    assert_eq!(favorites.heroes.len(), 1);
    assert_eq!(favorites.heroes[0].hero.name, "Bruce Wayne");
    assert!(favorites.heroes[0].favorite);
}

#[tokio::test]
async fn list_output_propagates_fetch_errors() {
    let api = MockHeroApi::new(BASE).with_heroes(roster());
    api.fail("list", HeroError::Network("connection refused".into()));
    let mut browser = browser_for(&api);

    let err = list_output(&mut browser, None).await.unwrap_err();
    assert!(err.to_string().starts_with("Failed to load heroes"));
}

#[tokio::test]
async fn search_output_applies_overrides_to_query() {
    let api = MockHeroApi::new(BASE).with_heroes(roster());
    let mut browser = browser_for(&api);

    let output = search_output(&mut browser, None, Some("man"), Some("9")).await.unwrap();
    assert_eq!(output.query, "q=man&strength=9");
    assert_eq!(output.filters.name.as_deref(), Some("man"));
    assert_eq!(output.filters.strength.as_deref(), Some("9"));
    let names: Vec<&str> = output.heroes.iter().map(|listed| listed.hero.name.as_str()).collect();
    assert_eq!(names, vec!["Clark Kent", "Diana Prince"]);
}

#[tokio::test]
async fn search_output_without_filters_skips_backend() {
    let api = MockHeroApi::new(BASE).with_heroes(roster());
    let mut browser = browser_for(&api);

    let output = search_output(&mut browser, Some("?q="), None, None).await.unwrap();
    assert!(output.heroes.is_empty());
    assert!(!api.history().iter().any(|req| matches!(req, RecordedRequest::Search(_))));
}

#[tokio::test]
async fn toggle_favorite_fetches_unknown_hero_then_removes_locally() {
    let api = MockHeroApi::new(BASE).with_heroes(roster());
    let mut browser = browser_for(&api);

    let added = toggle_favorite(&mut browser, "diana-prince").await.unwrap();
    assert!(added.favorite);
    assert!(added.saved);
    assert_eq!(added.id, "3");
    assert_eq!(added.favorite_count, 1);
    assert_eq!(api.request_count(), 1);

    let removed = toggle_favorite(&mut browser, "3").await.unwrap();
    assert!(!removed.favorite);
    assert_eq!(removed.favorite_count, 0);
    assert_eq!(api.request_count(), 1);
}

#[tokio::test]
async fn toggle_favorite_reports_missing_hero() {
    let api = MockHeroApi::new(BASE).with_heroes(roster());
    let mut browser = browser_for(&api);

    let err = toggle_favorite(&mut browser, "nobody").await.unwrap_err();
    assert!(err.to_string().contains("hero 'nobody'"));
    assert_eq!(browser.favorites().favorite_count(), 0);
}
