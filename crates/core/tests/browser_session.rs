use std::sync::Arc;
use std::time::Duration;

use hero_core::api::{HeroApi, MockHeroApi, PageRequest, RecordedRequest};
use hero_core::browser::HeroBrowser;
use hero_core::cache::{CacheStatus, FetchPolicy, ManualClock};
use hero_core::error::HeroError;
use hero_core::favorites::{FavoritesStore, MemoryFavoritesBackend};
use hero_core::model::{Hero, HeroCategory};
use hero_core::params::Tab;

const BASE: &str = "http://localhost:3000";

fn roster(count: usize) -> Vec<Hero> {
    (1..=count)
        .map(|i| {
            let category = if i % 3 == 0 { HeroCategory::Villain } else { HeroCategory::Hero };
            let mut hero = Hero::new(i.to_string(), format!("Hero {i}"))
                .with_slug(format!("hero-{i}"))
                .with_image(format!("{i}.jpg"))
                .with_category(category);
            hero.strength = (i % 10) as u8;
            hero
        })
        .collect()
}

fn session(api: &MockHeroApi) -> HeroBrowser {
    let api: Arc<dyn HeroApi> = Arc::new(api.clone());
    HeroBrowser::new(api, FavoritesStore::in_memory(), FetchPolicy::default())
}

fn list_requests(api: &MockHeroApi) -> Vec<PageRequest> {
    api.history()
        .into_iter()
        .filter_map(|req| match req {
            RecordedRequest::List(page) => Some(page),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn default_home_view_requests_first_page() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let browser = session(&api);

    let view = browser.home_view_settled().await;
    assert_eq!(view.tab(), Tab::All);
    assert_eq!(view.list.status, CacheStatus::Success);
    assert_eq!(view.visible_heroes().len(), 5);
    assert_eq!(view.visible_heroes()[0].image, "http://localhost:3000/images/1.jpeg");
    assert_eq!(view.pagination.total_pages, 3);
    assert!(!view.pagination.has_previous);
    assert!(view.pagination.has_next);
    assert_eq!(view.stats.total_heroes, 12);

    assert_eq!(
        list_requests(&api),
        vec![PageRequest { offset: 0, limit: 5, category: "all".into() }]
    );
    assert!(api.history().contains(&RecordedRequest::Summary));
}

#[tokio::test]
async fn invalid_page_falls_back_to_first_page() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let mut browser = session(&api);
    browser.navigate("/?page=abc&limit=5&category=all");

    let view = browser.home_view_settled().await;
    assert_eq!(view.params.page, 1);
    assert_eq!(list_requests(&api)[0].offset, 0);
}

#[tokio::test]
async fn first_view_is_loading_until_fetch_completes() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(3));
    let browser = session(&api);

    let view = browser.home_view();
    assert!(view.list.is_loading());
    assert!(view.visible_heroes().is_empty());
    assert_eq!(view.pagination.total_pages, 0);

    let settled = browser.home_view_settled().await;
    assert_eq!(settled.visible_heroes().len(), 3);
}

#[tokio::test]
async fn repeated_views_within_window_fetch_once() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let browser = session(&api);

    browser.home_view_settled().await;
    browser.home_view_settled().await;
    browser.home_view();

    assert_eq!(list_requests(&api).len(), 1);
}

#[tokio::test]
async fn stale_view_shows_previous_page_while_refetching() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let clock = Arc::new(ManualClock::default());
    let browser = HeroBrowser::with_clock(
        Arc::new(api.clone()),
        FavoritesStore::in_memory(),
        FetchPolicy::default(),
        clock.clone(),
    );

    browser.home_view_settled().await;
    clock.advance(Duration::from_secs(5 * 60 + 1));

    let stale = browser.home_view();
    assert_eq!(stale.visible_heroes().len(), 5);
    assert!(stale.list.is_fetching);

    browser.home_view_settled().await;
    assert_eq!(list_requests(&api).len(), 2);
}

#[tokio::test]
async fn select_tab_writes_category_and_resets_page() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let mut browser = session(&api);
    browser.navigate("?page=3&limit=5&q=keep");

    let query = browser.select_tab(Tab::Villains);
    assert_eq!(query, "page=1&limit=5&q=keep&tab=villains&category=villain");

    let view = browser.home_view_settled().await;
    assert!(view.visible_heroes().iter().all(|h| h.category == HeroCategory::Villain));
    assert_eq!(list_requests(&api)[0].category, "villain");

    browser.go_to_page(2);
    let query = browser.select_tab(Tab::Favorites);
    assert_eq!(query, "page=2&limit=5&q=keep&tab=favorites&category=villain");
}

#[tokio::test]
async fn favorites_tab_lists_local_favorites_with_percentage() {
    let heroes = roster(25);
    let api = MockHeroApi::new(BASE).with_heroes(heroes.clone());
    let mut browser = session(&api);

    assert!(browser.toggle_favorite(&heroes[4]));
    browser.select_tab(Tab::Favorites);

    let view = browser.home_view_settled().await;
    assert_eq!(view.visible_heroes().len(), 1);
    assert_eq!(view.visible_heroes()[0].id, "5");
    assert_eq!(view.stats.favorite_count, 1);
    assert_eq!(view.stats.favorite_percentage, "4.00% of total");
}

#[tokio::test]
async fn next_and_previous_page_respect_bounds() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let mut browser = session(&api);

    // Total unknown until the first page has loaded.
    assert!(!browser.next_page());
    browser.home_view_settled().await;

    assert!(!browser.previous_page());
    assert!(browser.next_page());
    browser.home_view_settled().await;
    assert!(browser.next_page());
    let view = browser.home_view_settled().await;
    assert_eq!(view.params.page, 3);
    assert!(!view.pagination.has_next);
    assert!(!browser.next_page());
    assert!(browser.previous_page());
    assert_eq!(browser.params().home_params().page, 2);
}

#[tokio::test]
async fn out_of_range_page_is_clamped_for_display_only() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let mut browser = session(&api);
    browser.navigate("?page=9");

    let view = browser.home_view_settled().await;
    assert_eq!(view.pagination.current_page, 3);
    assert_eq!(browser.params().get("page"), Some("9"));
}

#[tokio::test]
async fn result_for_abandoned_key_is_kept_for_reuse() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    api.set_delay(Duration::from_millis(20));
    let mut browser = session(&api);

    let first = browser.home_view();
    assert!(first.list.is_loading());

    browser.go_to_page(2);
    let second = browser.home_view_settled().await;
    assert_eq!(second.visible_heroes()[0].id, "6");

    browser.go_to_page(1);
    let back = browser.home_view_settled().await;
    assert_eq!(back.visible_heroes()[0].id, "1");
    assert_eq!(list_requests(&api).len(), 2);
}

#[tokio::test]
async fn search_view_sends_text_as_name() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let mut browser = session(&api);
    browser.navigate("/search?q=Hero%2011");

    let view = browser.search_view_settled().await;
    assert_eq!(view.heroes().len(), 1);
    assert_eq!(view.heroes()[0].image, "http://localhost:3000/images/11.jpeg");
    assert!(api
        .history()
        .contains(&RecordedRequest::Search(vec![("name".into(), "Hero 11".into())])));
}

#[tokio::test]
async fn empty_search_resolves_without_request() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let mut browser = session(&api);
    browser.navigate("/search?q=");

    let view = browser.search_view_settled().await;
    assert_eq!(view.results.status, CacheStatus::Success);
    assert!(view.heroes().is_empty());
    assert!(!api.history().iter().any(|req| matches!(req, RecordedRequest::Search(_))));
}

#[tokio::test]
async fn blank_search_text_in_address_sends_nothing() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    let mut browser = session(&api);
    browser.navigate("/search?q=%20%20&strength=%20");

    let view = browser.search_view_settled().await;
    assert_eq!(view.filters.name, None);
    assert_eq!(view.filters.strength, None);
    assert!(view.heroes().is_empty());
    assert!(!api.history().iter().any(|req| matches!(req, RecordedRequest::Search(_))));
}

#[tokio::test]
async fn search_navigation_edits_only_its_keys() {
    let api = MockHeroApi::new(BASE);
    let mut browser = session(&api);
    browser.navigate("?page=2&tab=heroes");

    browser.set_search_text("bat");
    browser.set_strength(Some("7"));
    assert_eq!(browser.query_string(), "page=2&tab=heroes&q=bat&strength=7");

    browser.toggle_accordion("advanced-filters");
    assert!(browser.params().search_params().is_accordion_open("advanced-filters"));
    browser.toggle_accordion("advanced-filters");
    assert!(browser.params().get("active-accordion").is_none());

    browser.set_search_text("  ");
    browser.set_strength(None);
    assert_eq!(browser.query_string(), "page=2&tab=heroes");
}

#[tokio::test]
async fn missing_hero_surfaces_not_found() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(3));
    let browser = session(&api);

    let view = browser.hero_view_settled("invalid-hero-slug").await;
    assert!(view.is_not_found());
    assert!(view.hero.data().is_none());

    let found = browser.hero_view_settled("hero-2").await;
    assert_eq!(
        found.hero.data().map(|h| h.image.as_str()),
        Some("http://localhost:3000/images/2.jpeg")
    );
}

#[tokio::test]
async fn errors_wait_for_explicit_retry() {
    let api = MockHeroApi::new(BASE).with_heroes(roster(12));
    api.fail("list", HeroError::Server { status: 503, message: "busy".into() });
    let browser = session(&api);

    let failed = browser.home_view_settled().await;
    assert!(failed.list.is_error());
    assert!(failed.list.error.as_ref().is_some_and(HeroError::is_retryable));

    api.clear_failures();
    browser.home_view_settled().await;
    assert_eq!(list_requests(&api).len(), 1);

    browser.retry_home();
    let recovered = browser.home_view_settled().await;
    assert!(recovered.list.is_success());
    assert_eq!(list_requests(&api).len(), 2);
}

#[tokio::test]
async fn toggling_twice_restores_empty_payload() {
    let backend = MemoryFavoritesBackend::new();
    let api = MockHeroApi::new(BASE).with_heroes(roster(3));
    let mut browser = HeroBrowser::new(
        Arc::new(api.clone()),
        FavoritesStore::open(backend.clone()),
        FetchPolicy::default(),
    );

    let hero = browser.hero_view_settled("1").await.hero.data().cloned().unwrap();
    assert!(browser.toggle_favorite(&hero));
    assert!(browser.hero_view("1").is_favorite);
    assert!(!browser.toggle_favorite(&hero));

    assert_eq!(browser.favorites().favorite_count(), 0);
    assert_eq!(backend.payload_string().as_deref(), Some("[]"));
}
