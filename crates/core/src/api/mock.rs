use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::{HeroApi, PageRequest};
use crate::error::{HeroError, HeroResult};
use crate::model::{Hero, PagedHeroes, SummaryInformation};

/// One call made against a [`MockHeroApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    List(PageRequest),
    Hero(String),
    Search(Vec<(String, String)>),
    Summary,
}

#[derive(Debug, Default)]
struct MockState {
    heroes: Vec<Hero>,
    summary: Option<SummaryInformation>,
    page_override: Option<HeroResult<PagedHeroes>>,
    search_override: Option<HeroResult<Vec<Hero>>>,
    failures: HashMap<&'static str, HeroError>,
    history: Vec<RecordedRequest>,
    delay: Option<Duration>,
}

/// In-process [`HeroApi`] that serves a fixed roster and records every request.
///
/// Listing, lookup, and search are answered from the roster the way the
/// backend would (offset/limit/category paging, id-or-slug lookup, substring
/// name match). Any endpoint can be forced to fail.
#[derive(Debug, Clone)]
pub struct MockHeroApi {
    base_url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockHeroApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), state: Arc::default() }
    }

    pub fn with_heroes(self, heroes: Vec<Hero>) -> Self {
        self.lock().heroes = heroes;
        self
    }

    pub fn with_summary(self, summary: SummaryInformation) -> Self {
        self.lock().summary = Some(summary);
        self
    }

    /// Answer every listing request with this result instead of paging the roster.
    pub fn set_page_response(&self, response: HeroResult<PagedHeroes>) {
        self.lock().page_override = Some(response);
    }

    /// Answer every search with this result instead of filtering the roster.
    pub fn set_search_response(&self, response: HeroResult<Vec<Hero>>) {
        self.lock().search_override = Some(response);
    }

    /// Make an endpoint (`"list"`, `"hero"`, `"search"`, `"summary"`) fail until cleared.
    pub fn fail(&self, endpoint: &'static str, error: HeroError) {
        self.lock().failures.insert(endpoint, error);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Sleep this long before answering, to exercise in-flight states.
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    pub fn history(&self) -> Vec<RecordedRequest> {
        self.lock().history.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().history.len()
    }

    pub fn reset_history(&self) {
        self.lock().history.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the request and return the configured failure and delay.
    fn begin(
        &self,
        endpoint: &'static str,
        request: RecordedRequest,
    ) -> (Option<HeroError>, Option<Duration>) {
        let mut state = self.lock();
        state.history.push(request);
        (state.failures.get(endpoint).cloned(), state.delay)
    }

    async fn pause(delay: Option<Duration>) {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl HeroApi for MockHeroApi {
    async fn list_heroes(&self, request: &PageRequest) -> HeroResult<PagedHeroes> {
        let (failure, delay) = self.begin("list", RecordedRequest::List(request.clone()));
        Self::pause(delay).await;
        if let Some(err) = failure {
            return Err(err);
        }

        let state = self.lock();
        if let Some(response) = &state.page_override {
            return response.clone();
        }

        let matching: Vec<&Hero> = state
            .heroes
            .iter()
            .filter(|hero| {
                request.category == "all" || hero.category.as_param() == request.category
            })
            .collect();
        let total = matching.len() as u32;
        let pages = if request.limit == 0 { 0 } else { total.div_ceil(request.limit) };
        let heroes = matching
            .into_iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .cloned()
            .collect();
        Ok(PagedHeroes { total, pages, heroes })
    }

    async fn get_hero(&self, id_or_slug: &str) -> HeroResult<Hero> {
        let (failure, delay) = self.begin("hero", RecordedRequest::Hero(id_or_slug.to_string()));
        Self::pause(delay).await;
        if let Some(err) = failure {
            return Err(err);
        }

        self.lock()
            .heroes
            .iter()
            .find(|hero| hero.id == id_or_slug || hero.slug == id_or_slug)
            .cloned()
            .ok_or_else(|| HeroError::not_found(id_or_slug))
    }

    async fn search_heroes(&self, pairs: &[(&'static str, String)]) -> HeroResult<Vec<Hero>> {
        let recorded = pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        let (failure, delay) = self.begin("search", RecordedRequest::Search(recorded));
        Self::pause(delay).await;
        if let Some(err) = failure {
            return Err(err);
        }

        let state = self.lock();
        if let Some(response) = &state.search_override {
            return response.clone();
        }

        let name = pairs.iter().find(|(k, _)| *k == "name").map(|(_, v)| v.to_lowercase());
        let min_strength =
            pairs.iter().find(|(k, _)| *k == "strength").and_then(|(_, v)| v.parse::<u8>().ok());
        Ok(state
            .heroes
            .iter()
            .filter(|hero| match &name {
                Some(needle) => {
                    hero.name.to_lowercase().contains(needle)
                        || hero.alias.to_lowercase().contains(needle)
                }
                None => true,
            })
            .filter(|hero| min_strength.map_or(true, |min| hero.strength >= min))
            .cloned()
            .collect())
    }

    async fn summary(&self) -> HeroResult<SummaryInformation> {
        let (failure, delay) = self.begin("summary", RecordedRequest::Summary);
        Self::pause(delay).await;
        if let Some(err) = failure {
            return Err(err);
        }

        let state = self.lock();
        if let Some(summary) = &state.summary {
            return Ok(summary.clone());
        }
        let hero_count =
            state.heroes.iter().filter(|h| h.category.as_param() == "hero").count() as u32;
        Ok(SummaryInformation {
            total_heroes: state.heroes.len() as u32,
            strongest_hero: state.heroes.iter().max_by_key(|h| h.strength).cloned(),
            smartest_hero: state.heroes.iter().max_by_key(|h| h.intelligence).cloned(),
            hero_count,
            villain_count: state.heroes.len() as u32 - hero_count,
        })
    }

    fn image_base_url(&self) -> &str {
        &self.base_url
    }
}
