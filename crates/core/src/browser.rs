//! Browsing session.
//!
//! [`HeroBrowser`] ties the pieces together for one user session: the
//! address parameters say what is being looked at, the request caches hold
//! what has been fetched, and the favorites store holds what the user kept.
//! Views are plain snapshots; a frontend renders one, lets the user act
//! through the navigation methods, then asks for a fresh view.
//!
//! View methods start background fetches and must run inside a Tokio runtime.

use std::sync::Arc;

use serde::Serialize;

use crate::actions;
use crate::api::HeroApi;
use crate::cache::{CacheKey, Clock, FetchPolicy, RequestCache, Snapshot, SystemClock};
use crate::favorites::FavoritesStore;
use crate::model::{Hero, PagedHeroes, SummaryInformation};
use crate::pagination::{pagination_window, PaginationWindow};
use crate::params::{
    HomeParams, ParamMutation, QueryParamStateAdapter, SearchParams, Tab, ACTIVE_ACCORDION,
    CATEGORY, PAGE, SEARCH_TEXT, STRENGTH, TAB,
};
use crate::search::SearchFilters;

pub const HEROES_DOMAIN: &str = "heroes";
pub const SUMMARY_DOMAIN: &str = "summary-information";
pub const SEARCH_DOMAIN: &str = "search-heroes";
pub const HERO_DOMAIN: &str = "hero";

/// `["heroes", category, page, limit]`
pub fn heroes_key(params: &HomeParams) -> CacheKey {
    CacheKey::new(HEROES_DOMAIN).with(&params.category).with(params.page).with(params.limit)
}

/// `["summary-information"]`
pub fn summary_key() -> CacheKey {
    CacheKey::new(SUMMARY_DOMAIN)
}

/// `["search-heroes", name, strength]`
pub fn search_key(filters: &SearchFilters) -> CacheKey {
    CacheKey::new(SEARCH_DOMAIN)
        .with_opt(filters.name.as_deref())
        .with_opt(filters.strength.as_deref())
}

/// `["hero", idOrSlug]`
pub fn hero_key(id_or_slug: &str) -> CacheKey {
    CacheKey::new(HERO_DOMAIN).with(id_or_slug)
}

/// Header counters on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeStats {
    pub total_heroes: u32,
    pub hero_count: u32,
    pub villain_count: u32,
    pub favorite_count: usize,
    /// e.g. `"4.00% of total"`
    pub favorite_percentage: String,
}

#[derive(Debug, Clone)]
pub struct HomeView {
    pub params: HomeParams,
    pub list: Snapshot<PagedHeroes>,
    pub summary: Snapshot<SummaryInformation>,
    /// Favorites at the time of the view, in insertion order.
    pub favorites: Vec<Hero>,
    pub pagination: PaginationWindow,
    pub stats: HomeStats,
}

impl HomeView {
    pub fn tab(&self) -> Tab {
        self.params.tab
    }

    /// Heroes to show for the selected tab: favorites, or the fetched page.
    pub fn visible_heroes(&self) -> &[Hero] {
        match self.params.tab {
            Tab::Favorites => &self.favorites,
            _ => self.list.data().map(|page| page.heroes.as_slice()).unwrap_or_default(),
        }
    }

    /// Whether `hero` is in the favorites captured by this view.
    pub fn is_favorite(&self, hero: &Hero) -> bool {
        self.favorites.iter().any(|fav| fav.id == hero.id)
    }
}

#[derive(Debug, Clone)]
pub struct SearchView {
    pub params: SearchParams,
    pub filters: SearchFilters,
    pub results: Snapshot<Vec<Hero>>,
    pub summary: Snapshot<SummaryInformation>,
}

impl SearchView {
    pub fn heroes(&self) -> &[Hero] {
        self.results.data().map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct HeroView {
    pub id_or_slug: String,
    pub hero: Snapshot<Hero>,
    pub is_favorite: bool,
}

impl HeroView {
    /// Lookup finished and the backend has no such hero.
    pub fn is_not_found(&self) -> bool {
        self.hero.error.as_ref().is_some_and(|err| err.is_not_found())
    }
}

/// One browsing session against a hero backend.
pub struct HeroBrowser {
    api: Arc<dyn HeroApi>,
    params: QueryParamStateAdapter,
    favorites: FavoritesStore,
    policy: FetchPolicy,
    heroes: RequestCache<PagedHeroes>,
    summary: RequestCache<SummaryInformation>,
    search: RequestCache<Vec<Hero>>,
    hero: RequestCache<Hero>,
}

impl std::fmt::Debug for HeroBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeroBrowser")
            .field("params", &self.params)
            .field("favorites", &self.favorites)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl HeroBrowser {
    pub fn new(api: Arc<dyn HeroApi>, favorites: FavoritesStore, policy: FetchPolicy) -> Self {
        Self::with_clock(api, favorites, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        api: Arc<dyn HeroApi>,
        favorites: FavoritesStore,
        policy: FetchPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            params: QueryParamStateAdapter::new(),
            favorites,
            policy,
            heroes: RequestCache::with_clock(Arc::clone(&clock)),
            summary: RequestCache::with_clock(Arc::clone(&clock)),
            search: RequestCache::with_clock(Arc::clone(&clock)),
            hero: RequestCache::with_clock(clock),
        }
    }

    /// Replace the parameter state with the query of `address`.
    pub fn navigate(&mut self, address: &str) {
        self.params = QueryParamStateAdapter::from_address(address);
        tracing::debug!(query = %self.params.to_query_string(), "navigated");
    }

    pub fn params(&self) -> &QueryParamStateAdapter {
        &self.params
    }

    /// Current address query, without the leading `?`.
    pub fn query_string(&self) -> String {
        self.params.to_query_string()
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoritesStore {
        &mut self.favorites
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    // Views

    pub fn home_view(&self) -> HomeView {
        let params = self.params.home_params();
        let list = self.fetch_page(&params);
        let summary = self.fetch_summary();
        self.assemble_home(params, list, summary)
    }

    /// Home view once its fetches have finished.
    pub async fn home_view_settled(&self) -> HomeView {
        let params = self.params.home_params();
        self.fetch_page(&params);
        self.fetch_summary();
        let list = self.heroes.settled(&heroes_key(&params)).await;
        let summary = self.summary.settled(&summary_key()).await;
        self.assemble_home(params, list, summary)
    }

    pub fn search_view(&self) -> SearchView {
        let params = self.params.search_params();
        let filters = params.to_filters();
        let results = self.fetch_search(&filters);
        let summary = self.fetch_summary();
        SearchView { params, filters, results, summary }
    }

    pub async fn search_view_settled(&self) -> SearchView {
        let params = self.params.search_params();
        let filters = params.to_filters();
        self.fetch_search(&filters);
        self.fetch_summary();
        let results = self.search.settled(&search_key(&filters)).await;
        let summary = self.summary.settled(&summary_key()).await;
        SearchView { params, filters, results, summary }
    }

    /// Summary statistics once fetched.
    pub async fn summary_settled(&self) -> Snapshot<SummaryInformation> {
        self.fetch_summary();
        self.summary.settled(&summary_key()).await
    }

    pub fn hero_view(&self, id_or_slug: &str) -> HeroView {
        let hero = self.fetch_hero(id_or_slug);
        self.assemble_hero(id_or_slug, hero)
    }

    pub async fn hero_view_settled(&self, id_or_slug: &str) -> HeroView {
        self.fetch_hero(id_or_slug);
        let hero = self.hero.settled(&hero_key(id_or_slug)).await;
        self.assemble_hero(id_or_slug, hero)
    }

    // Navigation

    /// Switch tabs. Category tabs also set the category and go back to page 1;
    /// the favorites tab only changes `tab`.
    pub fn select_tab(&mut self, tab: Tab) -> String {
        let mut mutations = vec![(TAB.name, ParamMutation::set(tab.as_str()))];
        if let Some(category) = tab.category() {
            mutations.push((CATEGORY.name, ParamMutation::set(category)));
            mutations.push((PAGE.name, ParamMutation::set("1")));
        }
        self.params.write(mutations)
    }

    pub fn go_to_page(&mut self, page: u32) -> String {
        self.params.write([(PAGE.name, ParamMutation::set(page.max(1).to_string()))])
    }

    /// Move forward one page if the current listing has one. Returns whether it moved.
    pub fn next_page(&mut self) -> bool {
        let params = self.params.home_params();
        let total = self.known_total_pages(&params);
        match total {
            Some(total) if params.page < total => {
                self.go_to_page(params.page + 1);
                true
            }
            _ => false,
        }
    }

    /// Move back one page. Returns whether it moved.
    pub fn previous_page(&mut self) -> bool {
        let page = self.params.home_params().page;
        if page > 1 {
            self.go_to_page(page - 1);
            true
        } else {
            false
        }
    }

    /// Set the free-text search. Empty text removes the parameter.
    pub fn set_search_text(&mut self, text: &str) -> String {
        let text = text.trim();
        let mutation =
            if text.is_empty() { ParamMutation::Delete } else { ParamMutation::set(text) };
        self.params.write([(SEARCH_TEXT.name, mutation)])
    }

    pub fn set_strength(&mut self, strength: Option<&str>) -> String {
        let mutation = match strength {
            Some(value) if !value.is_empty() => ParamMutation::set(value),
            _ => ParamMutation::Delete,
        };
        self.params.write([(STRENGTH.name, mutation)])
    }

    /// Open accordion `id`, or close it if it is already the open one.
    pub fn toggle_accordion(&mut self, id: &str) -> String {
        let mutation = if self.params.search_params().is_accordion_open(id) {
            ParamMutation::Delete
        } else {
            ParamMutation::set(id)
        };
        self.params.write([(ACTIVE_ACCORDION.name, mutation)])
    }

    /// Toggle `hero` in the favorites store. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, hero: &Hero) -> bool {
        self.favorites.toggle_favorite(hero)
    }

    // Retries

    /// Refetch the current page and the summary.
    pub fn retry_home(&self) {
        let params = self.params.home_params();
        self.heroes.invalidate(&heroes_key(&params));
        self.summary.invalidate(&summary_key());
    }

    pub fn retry_search(&self) {
        let filters = self.params.search_params().to_filters();
        self.search.invalidate(&search_key(&filters));
    }

    pub fn retry_hero(&self, id_or_slug: &str) {
        self.hero.invalidate(&hero_key(id_or_slug));
    }

    // Internals

    fn fetch_page(&self, params: &HomeParams) -> Snapshot<PagedHeroes> {
        let api = Arc::clone(&self.api);
        let (page, limit, category) = (params.page, params.limit, params.category.clone());
        self.heroes.get(
            &heroes_key(params),
            move || async move {
                actions::get_heroes_by_page(api.as_ref(), page, limit, &category).await
            },
            &self.policy,
        )
    }

    fn fetch_summary(&self) -> Snapshot<SummaryInformation> {
        let api = Arc::clone(&self.api);
        self.summary.get(
            &summary_key(),
            move || async move { actions::get_summary(api.as_ref()).await },
            &self.policy,
        )
    }

    fn fetch_search(&self, filters: &SearchFilters) -> Snapshot<Vec<Hero>> {
        let api = Arc::clone(&self.api);
        let owned = filters.clone();
        self.search.get(
            &search_key(filters),
            move || async move { actions::search_heroes(api.as_ref(), &owned).await },
            &self.policy,
        )
    }

    fn fetch_hero(&self, id_or_slug: &str) -> Snapshot<Hero> {
        let api = Arc::clone(&self.api);
        let id = id_or_slug.to_string();
        self.hero.get(
            &hero_key(id_or_slug),
            move || async move { actions::get_hero(api.as_ref(), &id).await },
            &self.policy,
        )
    }

    fn known_total_pages(&self, params: &HomeParams) -> Option<u32> {
        self.heroes.snapshot(&heroes_key(params)).data().map(|page| page.pages)
    }

    fn assemble_home(
        &self,
        params: HomeParams,
        list: Snapshot<PagedHeroes>,
        summary: Snapshot<SummaryInformation>,
    ) -> HomeView {
        let total_pages = list.data().map(|page| page.pages).unwrap_or(0);
        let pagination = pagination_window(params.page, total_pages);

        let totals = summary.data().cloned().unwrap_or_default();
        let stats = HomeStats {
            total_heroes: totals.total_heroes,
            hero_count: totals.hero_count,
            villain_count: totals.villain_count,
            favorite_count: self.favorites.favorite_count(),
            favorite_percentage: self.favorites.percentage_label(u64::from(totals.total_heroes)),
        };

        HomeView {
            params,
            list,
            summary,
            favorites: self.favorites.favorites().cloned().collect(),
            pagination,
            stats,
        }
    }

    fn assemble_hero(&self, id_or_slug: &str, hero: Snapshot<Hero>) -> HeroView {
        let is_favorite = match hero.data() {
            Some(found) => self.favorites.is_favorite(found),
            None => self.favorites.is_favorite_id(id_or_slug),
        };
        HeroView { id_or_slug: id_or_slug.to_string(), hero, is_favorite }
    }
}
